use crate::api::endpoint::{self, Endpoint};
use crate::currency;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

pub type Watts = f64;
pub type WattHours = f64;
pub type Volts = f64;
pub type Amperes = f64;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CURRENCY_TTL: Duration = Duration::from_secs(90);

/// Connection settings for one device.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub use_https: bool,
    pub http_timeout: Duration,
    /// Maximum age of a cached value. `Duration::ZERO` means every read refetches.
    pub currency_ttl: Duration,
    /// Fetch every group once while connecting.
    pub prefetch: bool,
}

impl Settings {
    pub fn new(host: impl Into<String>) -> Self {
        Settings {
            host: host.into(),
            use_https: false,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            currency_ttl: DEFAULT_CURRENCY_TTL,
            prefetch: true,
        }
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Any value is accepted; zero or negative TTLs disable caching.
    pub fn with_currency_ttl_secs(mut self, secs: i64) -> Self {
        self.currency_ttl = if secs > 0 {
            Duration::from_secs(secs as u64)
        } else {
            Duration::ZERO
        };
        self
    }

    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    pub fn protocol(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }
}

/// Answer of `GetAPIVersion.cgi`, the only endpoint without a common response header.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiVersion {
    #[serde(rename = "APIVersion")]
    pub api_version: i64,
    #[serde(rename = "BaseURL")]
    pub base_url: String,
    #[serde(rename = "CompatibilityRange", default)]
    pub compatibility_range: String,
}

/// A device whose API version has been validated.
#[derive(Debug)]
pub struct Session {
    pub protocol: &'static str,
    pub host: String,
    pub version: ApiVersion,
    pub client: reqwest::Client,
}

impl Session {
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}://{}/{}/{}",
            self.protocol,
            self.host,
            self.version.base_url.trim_matches('/'),
            endpoint
        )
    }
}

/// A type that can be read from a vendor JSON value, with a placeholder for absent fields.
pub trait FieldValue: Clone + fmt::Debug + Send + Sync + 'static {
    fn sentinel() -> Self;

    /// `None` when the JSON value has an incompatible type.
    fn from_json(value: &Value) -> Option<Self>;
}

impl FieldValue for f64 {
    fn sentinel() -> Self {
        0.0
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FieldValue for i64 {
    fn sentinel() -> Self {
        0
    }

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
    }
}

impl FieldValue for bool {
    fn sentinel() -> Self {
        false
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            /* some firmwares report flags as 0/1 */
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn sentinel() -> Self {
        String::from("NA")
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.to_owned()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Meter serial. A meter that reports none reads as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialNumber(pub String);

impl SerialNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SerialNumber {
    fn from(serial: &str) -> Self {
        SerialNumber(serial.to_owned())
    }
}

impl PartialEq<&str> for SerialNumber {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FieldValue for SerialNumber {
    fn sentinel() -> Self {
        SerialNumber::from("0")
    }

    fn from_json(value: &Value) -> Option<Self> {
        String::from_json(value).map(SerialNumber)
    }
}

/// Nested status objects are decoded with serde; missing members keep their defaults.
macro_rules! object_field_value {
    ($t:ty) => {
        impl FieldValue for $t {
            fn sentinel() -> Self {
                <$t>::default()
            }

            fn from_json(value: &Value) -> Option<Self> {
                if value.is_object() {
                    serde_json::from_value(value.to_owned()).ok()
                } else {
                    None
                }
            }
        }
    };
}

/// One cached vendor field.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<T> {
    pub value: T,
    pub unit: Option<String>,
    /// Vendor key the value was read from.
    pub source: Option<&'static str>,
    /// Fetch instant; `None` if the field has never been delivered or was absent last time.
    pub updated: Option<Instant>,
}

impl<T: FieldValue> Measurement<T> {
    pub fn absent() -> Self {
        Measurement {
            value: T::sentinel(),
            unit: None,
            source: None,
            updated: None,
        }
    }

    pub fn fresh(value: T, unit: Option<String>, source: &'static str, now: Instant) -> Self {
        Measurement {
            value,
            unit,
            source: Some(source),
            updated: Some(now),
        }
    }

    pub fn is_current(&self, ttl: Duration, now: Instant) -> bool {
        currency::is_current(self.updated, ttl, now)
    }

    pub fn snapshot(&self, stale: bool) -> Reading<T> {
        Reading {
            value: self.value.clone(),
            unit: self.unit.clone(),
            updated: self.updated,
            stale,
        }
    }

    pub fn reading(&self, ttl: Duration, now: Instant) -> Reading<T> {
        self.snapshot(!self.is_current(ttl, now))
    }
}

impl<T: FieldValue> Default for Measurement<T> {
    fn default() -> Self {
        Measurement::absent()
    }
}

/// Value handed out by the accessors.
///
/// `stale` is set when the latest refresh did not deliver the field, or when the refresh failed
/// and the last known value is handed out instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading<T> {
    pub value: T,
    pub unit: Option<String>,
    pub updated: Option<Instant>,
    pub stale: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DeviceStatus {
    pub status_code: i64,
    pub error_code: i64,
    #[serde(rename = "LEDColor")]
    pub led_color: i64,
    #[serde(rename = "LEDState")]
    pub led_state: i64,
    pub mgmt_timer_remaining_time: i64,
    pub state_to_reset: bool,
}

object_field_value!(DeviceStatus);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Led {
    pub color: String,
    pub state: String,
}

object_field_value!(Led);

/* DataCollection=CommonInverterData */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonInverterValues {
    pub pac: Measurement<Watts>,
    pub sac: Measurement<f64>,
    pub iac: Measurement<Amperes>,
    pub uac: Measurement<Volts>,
    pub fac: Measurement<f64>,
    pub idc: Measurement<Amperes>,
    pub udc: Measurement<Volts>,
    pub day_energy: Measurement<WattHours>,
    pub year_energy: Measurement<WattHours>,
    pub total_energy: Measurement<WattHours>,
    pub device_status: Measurement<DeviceStatus>,
}

/* DataCollection=CumulationInverterData */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulationValues {
    pub pac: Measurement<Watts>,
    pub day_energy: Measurement<WattHours>,
    pub year_energy: Measurement<WattHours>,
    pub total_energy: Measurement<WattHours>,
    pub device_status: Measurement<DeviceStatus>,
}

/* DataCollection=3PInverterData */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreePhaseValues {
    pub iac_l1: Measurement<Amperes>,
    pub iac_l2: Measurement<Amperes>,
    pub iac_l3: Measurement<Amperes>,
    pub uac_l1: Measurement<Volts>,
    pub uac_l2: Measurement<Volts>,
    pub uac_l3: Measurement<Volts>,
    pub t_ambient: Measurement<f64>,
    pub rotation_speed_fan_fl: Measurement<f64>,
    pub rotation_speed_fan_fr: Measurement<f64>,
    pub rotation_speed_fan_bl: Measurement<f64>,
    pub rotation_speed_fan_br: Measurement<f64>,
}

/* DataCollection=MinMaxInverterData, not delivered by hybrid inverters */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinMaxValues {
    pub day_pmax: Measurement<Watts>,
    pub day_uacmax: Measurement<Volts>,
    pub day_uacmin: Measurement<Volts>,
    pub day_udcmax: Measurement<Volts>,
    pub year_pmax: Measurement<Watts>,
    pub year_uacmax: Measurement<Volts>,
    pub year_uacmin: Measurement<Volts>,
    pub year_udcmax: Measurement<Volts>,
    pub total_pmax: Measurement<Watts>,
    pub total_uacmax: Measurement<Volts>,
    pub total_uacmin: Measurement<Volts>,
    pub total_udcmax: Measurement<Volts>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterRealtimeValues {
    pub manufacturer: Measurement<String>,
    pub model: Measurement<String>,
    pub serial: Measurement<SerialNumber>,
    pub enable: Measurement<i64>,
    pub visible: Measurement<i64>,
    pub timestamp: Measurement<i64>,
    pub meter_location_current: Measurement<f64>,
    pub current_ac_phase_1: Measurement<Amperes>,
    pub current_ac_phase_2: Measurement<Amperes>,
    pub current_ac_phase_3: Measurement<Amperes>,
    pub energy_reactive_var_ac_sum_consumed: Measurement<f64>,
    pub energy_reactive_var_ac_sum_produced: Measurement<f64>,
    pub energy_real_wac_minus_absolute: Measurement<WattHours>,
    pub energy_real_wac_plus_absolute: Measurement<WattHours>,
    pub energy_real_wac_sum_consumed: Measurement<WattHours>,
    pub energy_real_wac_sum_produced: Measurement<WattHours>,
    pub frequency_phase_average: Measurement<f64>,
    pub power_apparent_s_phase_1: Measurement<f64>,
    pub power_apparent_s_phase_2: Measurement<f64>,
    pub power_apparent_s_phase_3: Measurement<f64>,
    pub power_apparent_s_sum: Measurement<f64>,
    pub power_factor_phase_1: Measurement<f64>,
    pub power_factor_phase_2: Measurement<f64>,
    pub power_factor_phase_3: Measurement<f64>,
    pub power_factor_sum: Measurement<f64>,
    pub power_reactive_q_phase_1: Measurement<f64>,
    pub power_reactive_q_phase_2: Measurement<f64>,
    pub power_reactive_q_phase_3: Measurement<f64>,
    pub power_reactive_q_sum: Measurement<f64>,
    pub power_real_p_phase_1: Measurement<Watts>,
    pub power_real_p_phase_2: Measurement<Watts>,
    pub power_real_p_phase_3: Measurement<Watts>,
    pub power_real_p_sum: Measurement<Watts>,
    pub voltage_ac_phase_to_phase_12: Measurement<Volts>,
    pub voltage_ac_phase_to_phase_23: Measurement<Volts>,
    pub voltage_ac_phase_to_phase_31: Measurement<Volts>,
    pub voltage_ac_phase_1: Measurement<Volts>,
    pub voltage_ac_phase_2: Measurement<Volts>,
    pub voltage_ac_phase_3: Measurement<Volts>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerFlowSite {
    pub battery_standby: Measurement<bool>,
    pub e_day: Measurement<WattHours>,
    pub e_year: Measurement<WattHours>,
    pub e_total: Measurement<WattHours>,
    pub meter_location: Measurement<String>,
    pub mode: Measurement<String>,
    pub p_akku: Measurement<Watts>,
    pub p_grid: Measurement<Watts>,
    pub p_load: Measurement<Watts>,
    pub p_pv: Measurement<Watts>,
    pub rel_autonomy: Measurement<f64>,
    pub rel_self_consumption: Measurement<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerFlowInverter {
    pub device_type: Measurement<i64>,
    pub p: Measurement<Watts>,
    pub soc: Measurement<f64>,
    pub e_day: Measurement<WattHours>,
    pub e_year: Measurement<WattHours>,
    pub e_total: Measurement<WattHours>,
}

/// Both halves of one `GetPowerFlowRealtimeData` answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerFlowValues {
    pub site: PowerFlowSite,
    pub inverter: PowerFlowInverter,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerInfo {
    pub co2_factor: Measurement<f64>,
    pub co2_unit: Measurement<String>,
    pub cash_currency: Measurement<String>,
    pub cash_factor: Measurement<f64>,
    pub default_language: Measurement<String>,
    pub delivery_factor: Measurement<f64>,
    pub hw_version: Measurement<String>,
    pub platform_id: Measurement<String>,
    pub product_id: Measurement<String>,
    pub sw_version: Measurement<String>,
    pub timezone_location: Measurement<String>,
    pub timezone_name: Measurement<String>,
    pub utc_offset: Measurement<i64>,
    pub unique_id: Measurement<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerLeds {
    pub power_led: Measurement<Led>,
    pub solar_net_led: Measurement<Led>,
    pub solar_web_led: Measurement<Led>,
    pub wlan_led: Measurement<Led>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InverterInfo {
    pub custom_name: Measurement<String>,
    pub device_type: Measurement<i64>,
    pub error_code: Measurement<i64>,
    pub pv_power: Measurement<Watts>,
    pub show: Measurement<i64>,
    pub status_code: Measurement<i64>,
    pub unique_id: Measurement<String>,
}

/// Entry of `GetActiveDeviceInfo.cgi`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDevice {
    pub class: endpoint::DeviceClass,
    pub id: String,
    pub device_type: Option<i64>,
    pub serial: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn currency_ttl_from_seconds() {
        let settings = Settings::new("inverter.local");
        assert_eq!(settings.currency_ttl, DEFAULT_CURRENCY_TTL);
        assert_eq!(
            settings.clone().with_currency_ttl_secs(30).currency_ttl,
            Duration::from_secs(30)
        );
        assert_eq!(
            settings.clone().with_currency_ttl_secs(0).currency_ttl,
            Duration::ZERO
        );
        assert_eq!(
            settings.with_currency_ttl_secs(-1).currency_ttl,
            Duration::ZERO
        );
    }

    #[test]
    fn protocol() {
        let settings = Settings::new("inverter.local");
        assert_eq!(settings.protocol(), "http");
        assert_eq!(settings.with_https(true).protocol(), "https");
    }

    #[test]
    fn sentinels() {
        assert_eq!(f64::sentinel(), 0.0);
        assert_eq!(i64::sentinel(), 0);
        assert!(!bool::sentinel());
        assert_eq!(String::sentinel(), "NA");
        assert_eq!(SerialNumber::sentinel(), "0");
        assert_eq!(DeviceStatus::sentinel(), DeviceStatus::default());
    }

    #[test]
    fn field_values_from_json() {
        assert_eq!(i64::from_json(&json!(7.0)), Some(7));
        assert_eq!(i64::from_json(&json!(7.5)), None);
        assert_eq!(bool::from_json(&json!(1)), Some(true));
        assert_eq!(String::from_json(&json!(38183)), Some(String::from("38183")));
        assert_eq!(f64::from_json(&json!("3373")), None);
        assert_eq!(
            Led::from_json(&json!({"Color": "green", "State": "on"})),
            Some(Led {
                color: String::from("green"),
                state: String::from("on"),
            })
        );
        assert_eq!(Led::from_json(&json!("green")), None);
        assert_eq!(
            SerialNumber::from_json(&json!(16110118)),
            Some(SerialNumber::from("16110118"))
        );
    }

    #[test]
    fn absent_measurement_is_stale() {
        let now = Instant::now();
        let reading = Measurement::<f64>::absent().reading(DEFAULT_CURRENCY_TTL, now);
        assert_eq!(reading.value, 0.0);
        assert!(reading.stale);

        let fresh = Measurement::fresh(3373.0, Some(String::from("W")), "PAC", now);
        assert!(!fresh.reading(DEFAULT_CURRENCY_TTL, now).stale);
    }
}
