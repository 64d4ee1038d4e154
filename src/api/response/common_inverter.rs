use super::{container, Fields, Group};
use crate::api::endpoint::{DataCollection, Request};
use crate::api::Error;
use crate::model::CommonInverterValues;
use serde_json::Value;
use std::time::Instant;

impl Group for CommonInverterValues {
    const NAME: &'static str = "CommonInverterData";

    fn request() -> Request {
        Request::inverter_realtime(DataCollection::CommonInverterData)
    }

    /* AC values disappear from the payload while the inverter is not feeding in */
    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["Data"], Self::NAME)?, now, Self::NAME);

        Ok(CommonInverterValues {
            pac: f.unit_value(&["PAC"])?,
            sac: f.unit_value(&["SAC"])?,
            iac: f.unit_value(&["IAC"])?,
            uac: f.unit_value(&["UAC"])?,
            fac: f.unit_value(&["FAC"])?,
            idc: f.unit_value(&["IDC"])?,
            udc: f.unit_value(&["UDC"])?,
            day_energy: f.unit_value(&["DAY_ENERGY"])?,
            year_energy: f.unit_value(&["YEAR_ENERGY"])?,
            total_energy: f.unit_value(&["TOTAL_ENERGY"])?,
            device_status: f.plain(&["DeviceStatus"])?,
        })
    }
}
