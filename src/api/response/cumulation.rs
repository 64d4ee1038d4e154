use super::{container, Fields, Group};
use crate::api::endpoint::{DataCollection, Request};
use crate::api::Error;
use crate::model::CumulationValues;
use serde_json::Value;
use std::time::Instant;

impl Group for CumulationValues {
    const NAME: &'static str = "CumulationInverterData";

    fn request() -> Request {
        Request::inverter_realtime(DataCollection::CumulationInverterData)
    }

    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["Data"], Self::NAME)?, now, Self::NAME);

        Ok(CumulationValues {
            pac: f.unit_value(&["PAC"])?,
            day_energy: f.unit_value(&["DAY_ENERGY"])?,
            year_energy: f.unit_value(&["YEAR_ENERGY"])?,
            total_energy: f.unit_value(&["TOTAL_ENERGY"])?,
            device_status: f.plain(&["DeviceStatus"])?,
        })
    }
}
