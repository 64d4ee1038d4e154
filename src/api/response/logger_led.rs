use super::{container, Fields, Group};
use crate::api::endpoint::{self, Request};
use crate::api::Error;
use crate::model::LoggerLeds;
use serde_json::Value;
use std::time::Instant;

impl Group for LoggerLeds {
    const NAME: &'static str = "LoggerLEDInfo";

    fn request() -> Request {
        Request::new(endpoint::LOGGER_LED_INFO)
    }

    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["Data"], Self::NAME)?, now, Self::NAME);

        Ok(LoggerLeds {
            power_led: f.plain(&["PowerLED"])?,
            solar_net_led: f.plain(&["SolarNetLED"])?,
            solar_web_led: f.plain(&["SolarWebLED"])?,
            wlan_led: f.plain(&["WLANLED"])?,
        })
    }
}
