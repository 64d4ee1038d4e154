use super::container;
use crate::api::endpoint::DeviceClass;
use crate::api::Error;
use crate::model::ActiveDevice;
use serde_json::{Map, Value};

const NAME: &str = "ActiveDeviceInfo";

fn devices(class: DeviceClass, entries: &Map<String, Value>) -> Vec<ActiveDevice> {
    entries
        .iter()
        .map(|(id, entry)| ActiveDevice {
            class,
            id: id.to_owned(),
            device_type: entry.get("DT").and_then(Value::as_i64),
            serial: entry.get("Serial").and_then(|s| match s {
                Value::String(s) => Some(s.to_owned()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
        })
        .collect()
}

/// Devices listed in the `Body` of `GetActiveDeviceInfo.cgi`.
///
/// With `DeviceClass=System` the data is grouped by class name; otherwise it maps device ids
/// directly. Classes this client does not know are skipped.
pub fn map(class: DeviceClass, body: &Value) -> Result<Vec<ActiveDevice>, Error> {
    let data = container(body, &["Data"], NAME)?;

    if class != DeviceClass::System {
        return Ok(devices(class, data));
    }

    let mut all = Vec::new();
    for (name, entries) in data {
        match (DeviceClass::from_name(name), entries.as_object()) {
            (Some(class), Some(entries)) => all.extend(devices(class, entries)),
            _ => log::debug!("skipping active devices of class {}", name),
        }
    }
    Ok(all)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn system() {
        let body = json!({"Data": {
            "Inverter": {"1": {"DT": 102, "Serial": "28136344"}},
            "Meter": {"0": {"DT": -1, "Serial": "16110118"}},
            "Ohmpilot": {},
            "SensorCard": {},
            "Storage": {},
            "StringControl": {},
            "Toaster": {"0": {}}
        }});
        let mut devices = map(DeviceClass::System, &body).unwrap();
        devices.sort_by_key(|d| d.class.as_str());

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].class, DeviceClass::Inverter);
        assert_eq!(devices[0].id, "1");
        assert_eq!(devices[0].device_type, Some(102));
        assert_eq!(devices[1].class, DeviceClass::Meter);
        assert_eq!(devices[1].serial.as_deref(), Some("16110118"));
    }

    #[test]
    fn single_class() {
        let body = json!({"Data": {"1": {"DT": 102}}});
        let devices = map(DeviceClass::Inverter, &body).unwrap();
        assert_eq!(
            devices,
            vec![ActiveDevice {
                class: DeviceClass::Inverter,
                id: String::from("1"),
                device_type: Some(102),
                serial: None,
            }]
        );
    }
}
