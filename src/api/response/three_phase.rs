use super::{container, Fields, Group};
use crate::api::endpoint::{DataCollection, Request};
use crate::api::Error;
use crate::model::ThreePhaseValues;
use serde_json::Value;
use std::time::Instant;

impl Group for ThreePhaseValues {
    const NAME: &'static str = "3PInverterData";

    fn request() -> Request {
        Request::inverter_realtime(DataCollection::ThreePhaseInverterData)
    }

    /* Temperature and fan speeds are only reported by the larger models */
    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let f = Fields::new(container(body, &["Data"], Self::NAME)?, now, Self::NAME);

        Ok(ThreePhaseValues {
            iac_l1: f.unit_value(&["IAC_L1"])?,
            iac_l2: f.unit_value(&["IAC_L2"])?,
            iac_l3: f.unit_value(&["IAC_L3"])?,
            uac_l1: f.unit_value(&["UAC_L1"])?,
            uac_l2: f.unit_value(&["UAC_L2"])?,
            uac_l3: f.unit_value(&["UAC_L3"])?,
            t_ambient: f.unit_value(&["T_AMBIENT", "T_Ambient"])?,
            rotation_speed_fan_fl: f
                .unit_value(&["ROTATION_SPEED_FAN_FL", "Rotation_Speed_Fan_FL"])?,
            rotation_speed_fan_fr: f
                .unit_value(&["ROTATION_SPEED_FAN_FR", "Rotation_Speed_Fan_FR"])?,
            rotation_speed_fan_bl: f
                .unit_value(&["ROTATION_SPEED_FAN_BL", "Rotation_Speed_Fan_BL"])?,
            rotation_speed_fan_br: f
                .unit_value(&["ROTATION_SPEED_FAN_BR", "Rotation_Speed_Fan_BR"])?,
        })
    }
}
