use super::{container, Fields, Group};
use crate::api::endpoint::{self, Request};
use crate::api::Error;
use crate::model::InverterInfo;
use serde_json::Value;
use std::time::Instant;

impl Group for InverterInfo {
    const NAME: &'static str = "InverterInfo";

    fn request() -> Request {
        Request::new(endpoint::INVERTER_INFO)
    }

    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let data = container(body, &["Data"], Self::NAME)?;
        let f = match data.get(&endpoint::DEVICE_ID.to_string()) {
            Some(Value::Object(inverter)) => Fields::new(inverter, now, Self::NAME),
            _ => Fields::empty(now, Self::NAME),
        };

        Ok(InverterInfo {
            custom_name: f.plain(&["CustomName"])?,
            device_type: f.plain(&["DT"])?,
            error_code: f.plain(&["ErrorCode"])?,
            pv_power: f.plain(&["PVPower"])?,
            show: f.plain(&["Show"])?,
            status_code: f.plain(&["StatusCode"])?,
            unique_id: f.plain(&["UniqueID"])?,
        })
    }
}
