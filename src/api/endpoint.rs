pub type Endpoint = str;

/// Relative to the host, not to the base URL.
pub const API_VERSION: &Endpoint = "solar_api/GetAPIVersion.cgi";

pub const INVERTER_REALTIME_DATA: &Endpoint = "GetInverterRealtimeData.cgi";
pub const METER_REALTIME_DATA: &Endpoint = "GetMeterRealtimeData.cgi";
pub const POWER_FLOW_REALTIME_DATA: &Endpoint = "GetPowerFlowRealtimeData.fcgi";
pub const INVERTER_INFO: &Endpoint = "GetInverterInfo.cgi";
pub const LOGGER_INFO: &Endpoint = "GetLoggerInfo.cgi";
pub const LOGGER_LED_INFO: &Endpoint = "GetLoggerLEDInfo.cgi";
pub const ACTIVE_DEVICE_INFO: &Endpoint = "GetActiveDeviceInfo.cgi";
pub const SENSOR_REALTIME_DATA: &Endpoint = "GetSensorRealtimeData.cgi";
pub const STRING_REALTIME_DATA: &Endpoint = "GetStringRealtimeData.cgi";
pub const STORAGE_REALTIME_DATA: &Endpoint = "GetStorageRealtimeData.cgi";
pub const OHMPILOT_REALTIME_DATA: &Endpoint = "GetOhmPilotRealtimeData.cgi";

/// Only the first inverter and meter are queried.
pub const DEVICE_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCollection {
    CommonInverterData,
    CumulationInverterData,
    ThreePhaseInverterData,
    MinMaxInverterData,
}

impl DataCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataCollection::CommonInverterData => "CommonInverterData",
            DataCollection::CumulationInverterData => "CumulationInverterData",
            DataCollection::ThreePhaseInverterData => "3PInverterData",
            DataCollection::MinMaxInverterData => "MinMaxInverterData",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Inverter,
    Storage,
    OhmPilot,
    SensorCard,
    StringControl,
    Meter,
    System,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Inverter => "Inverter",
            DeviceClass::Storage => "Storage",
            DeviceClass::OhmPilot => "OhmPilot",
            DeviceClass::SensorCard => "SensorCard",
            DeviceClass::StringControl => "StringControl",
            DeviceClass::Meter => "Meter",
            DeviceClass::System => "System",
        }
    }

    pub fn from_name(name: &str) -> Option<DeviceClass> {
        [
            DeviceClass::Inverter,
            DeviceClass::Storage,
            DeviceClass::OhmPilot,
            DeviceClass::SensorCard,
            DeviceClass::StringControl,
            DeviceClass::Meter,
            DeviceClass::System,
        ]
        .iter()
        .copied()
        .find(|class| class.as_str().eq_ignore_ascii_case(name))
    }
}

/// A GET on a data endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub endpoint: &'static Endpoint,
    pub query: Vec<(&'static str, String)>,
}

impl Request {
    pub fn new(endpoint: &'static Endpoint) -> Self {
        Request {
            endpoint,
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    fn device(endpoint: &'static Endpoint) -> Self {
        Request::new(endpoint)
            .param("Scope", "Device")
            .param("DeviceID", DEVICE_ID)
    }

    pub fn inverter_realtime(collection: DataCollection) -> Self {
        Request::device(INVERTER_REALTIME_DATA).param("DataCollection", collection.as_str())
    }

    pub fn meter_realtime() -> Self {
        Request::device(METER_REALTIME_DATA)
    }

    pub fn active_devices(class: DeviceClass) -> Self {
        Request::new(ACTIVE_DEVICE_INFO).param("DeviceClass", class.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn three_phase_query() {
        let request = Request::inverter_realtime(DataCollection::ThreePhaseInverterData);
        assert_eq!(request.endpoint, INVERTER_REALTIME_DATA);
        assert_eq!(
            request.query,
            vec![
                ("Scope", String::from("Device")),
                ("DeviceID", String::from("1")),
                ("DataCollection", String::from("3PInverterData")),
            ]
        );
    }

    #[test]
    fn meter_query() {
        let request = Request::meter_realtime();
        assert_eq!(request.endpoint, METER_REALTIME_DATA);
        assert_eq!(
            request.query,
            vec![
                ("Scope", String::from("Device")),
                ("DeviceID", String::from("1")),
            ]
        );
    }

    #[test]
    fn device_class_names() {
        assert_eq!(DeviceClass::from_name("Meter"), Some(DeviceClass::Meter));
        assert_eq!(DeviceClass::from_name("Ohmpilot"), Some(DeviceClass::OhmPilot));
        assert_eq!(DeviceClass::from_name("Toaster"), None);
    }
}
