use super::{container, Fields, Group};
use crate::api::endpoint::{self, Request};
use crate::api::Error;
use crate::model::LoggerInfo;
use serde_json::Value;
use std::time::Instant;

impl Group for LoggerInfo {
    const NAME: &'static str = "LoggerInfo";

    fn request() -> Request {
        Request::new(endpoint::LOGGER_INFO)
    }

    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["LoggerInfo"], Self::NAME)?, now, Self::NAME);

        Ok(LoggerInfo {
            co2_factor: f.plain(&["CO2Factor"])?,
            co2_unit: f.plain(&["CO2Unit"])?,
            cash_currency: f.plain(&["CashCurrency"])?,
            cash_factor: f.plain(&["CashFactor"])?,
            default_language: f.plain(&["DefaultLanguage"])?,
            delivery_factor: f.plain(&["DeliveryFactor"])?,
            hw_version: f.plain(&["HWVersion"])?,
            platform_id: f.plain(&["PlatformID"])?,
            product_id: f.plain(&["ProductID"])?,
            sw_version: f.plain(&["SWVersion"])?,
            timezone_location: f.plain(&["TimezoneLocation"])?,
            timezone_name: f.plain(&["TimezoneName"])?,
            utc_offset: f.plain(&["UTCOffset"])?,
            unique_id: f.plain(&["UniqueID"])?,
        })
    }
}
