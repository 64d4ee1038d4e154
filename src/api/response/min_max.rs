use super::{container, Fields, Group};
use crate::api::endpoint::{DataCollection, Request};
use crate::api::Error;
use crate::model::MinMaxValues;
use serde_json::Value;
use std::time::Instant;

impl Group for MinMaxValues {
    const NAME: &'static str = "MinMaxInverterData";

    fn request() -> Request {
        Request::inverter_realtime(DataCollection::MinMaxInverterData)
    }

    /* Some firmwares misspell the UACMIN and UDCMAX keys */
    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["Data"], Self::NAME)?, now, Self::NAME);

        Ok(MinMaxValues {
            day_pmax: f.unit_value(&["DAY_PMAX"])?,
            day_uacmax: f.unit_value(&["DAY_UACMAX"])?,
            day_uacmin: f.unit_value(&["DAY_UACMIN", "DAY_UACMNIN"])?,
            day_udcmax: f.unit_value(&["DAY_UDCMAX", "DAY_UDCMax"])?,
            year_pmax: f.unit_value(&["YEAR_PMAX"])?,
            year_uacmax: f.unit_value(&["YEAR_UACMAX"])?,
            year_uacmin: f.unit_value(&["YEAR_UACMIN", "YEAR_UACMNIN"])?,
            year_udcmax: f.unit_value(&["YEAR_UDCMAX", "YEAR_UDCMax"])?,
            total_pmax: f.unit_value(&["TOTAL_PMAX"])?,
            total_uacmax: f.unit_value(&["TOTAL_UACMAX"])?,
            total_uacmin: f.unit_value(&["TOTAL_UACMIN", "TOTAL_UACMNIN"])?,
            total_udcmax: f.unit_value(&["TOTAL_UDCMAX", "TOTAL_UDCMax"])?,
        })
    }
}
