use super::{container, Fields, Group};
use crate::api::endpoint::Request;
use crate::api::Error;
use crate::model::MeterRealtimeValues;
use serde_json::Value;
use std::time::Instant;

impl Group for MeterRealtimeValues {
    const NAME: &'static str = "MeterRealtimeData";

    fn request() -> Request {
        Request::meter_realtime()
    }

    /// Readings are plain numbers without units; maker, model and serial live in `Details`.
    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let data = container(body, &["Data"], Self::NAME)?;
        let f = Fields::new(data, now, Self::NAME);
        let details = match data.get("Details") {
            Some(Value::Object(details)) => Fields::new(details, now, Self::NAME),
            None | Some(Value::Null) => Fields::empty(now, Self::NAME),
            Some(other) => {
                return Err(Error::MalformedPayload(format!(
                    "{}: Details is not an object: {}",
                    Self::NAME,
                    other
                )))
            }
        };

        Ok(MeterRealtimeValues {
            manufacturer: details.plain(&["Manufacturer"])?,
            model: details.plain(&["Model"])?,
            serial: details.plain(&["Serial"])?,
            enable: f.plain(&["Enable"])?,
            visible: f.plain(&["Visible"])?,
            timestamp: f.plain(&["TimeStamp"])?,
            meter_location_current: f.plain(&["Meter_Location_Current"])?,
            current_ac_phase_1: f.plain(&["Current_AC_Phase_1"])?,
            current_ac_phase_2: f.plain(&["Current_AC_Phase_2"])?,
            current_ac_phase_3: f.plain(&["Current_AC_Phase_3"])?,
            energy_reactive_var_ac_sum_consumed: f.plain(&["EnergyReactive_VArAC_Sum_Consumed"])?,
            energy_reactive_var_ac_sum_produced: f.plain(&["EnergyReactive_VArAC_Sum_Produced"])?,
            energy_real_wac_minus_absolute: f.plain(&["EnergyReal_WAC_Minus_Absolute"])?,
            energy_real_wac_plus_absolute: f.plain(&["EnergyReal_WAC_Plus_Absolute"])?,
            energy_real_wac_sum_consumed: f.plain(&["EnergyReal_WAC_Sum_Consumed"])?,
            energy_real_wac_sum_produced: f.plain(&["EnergyReal_WAC_Sum_Produced"])?,
            frequency_phase_average: f.plain(&["Frequency_Phase_Average"])?,
            power_apparent_s_phase_1: f.plain(&["PowerApparent_S_Phase_1"])?,
            power_apparent_s_phase_2: f.plain(&["PowerApparent_S_Phase_2"])?,
            power_apparent_s_phase_3: f.plain(&["PowerApparent_S_Phase_3"])?,
            power_apparent_s_sum: f.plain(&["PowerApparent_S_Sum"])?,
            power_factor_phase_1: f.plain(&["PowerFactor_Phase_1"])?,
            power_factor_phase_2: f.plain(&["PowerFactor_Phase_2"])?,
            power_factor_phase_3: f.plain(&["PowerFactor_Phase_3"])?,
            power_factor_sum: f.plain(&["PowerFactor_Sum"])?,
            power_reactive_q_phase_1: f.plain(&["PowerReactive_Q_Phase_1"])?,
            power_reactive_q_phase_2: f.plain(&["PowerReactive_Q_Phase_2"])?,
            power_reactive_q_phase_3: f.plain(&["PowerReactive_Q_Phase_3"])?,
            power_reactive_q_sum: f.plain(&["PowerReactive_Q_Sum"])?,
            power_real_p_phase_1: f.plain(&["PowerReal_P_Phase_1"])?,
            power_real_p_phase_2: f.plain(&["PowerReal_P_Phase_2"])?,
            power_real_p_phase_3: f.plain(&["PowerReal_P_Phase_3"])?,
            power_real_p_sum: f.plain(&["PowerReal_P_Sum"])?,
            voltage_ac_phase_to_phase_12: f.plain(&["Voltage_AC_PhaseToPhase_12"])?,
            voltage_ac_phase_to_phase_23: f.plain(&["Voltage_AC_PhaseToPhase_23"])?,
            voltage_ac_phase_to_phase_31: f.plain(&["Voltage_AC_PhaseToPhase_31"])?,
            voltage_ac_phase_1: f.plain(&["Voltage_AC_Phase_1"])?,
            voltage_ac_phase_2: f.plain(&["Voltage_AC_Phase_2"])?,
            voltage_ac_phase_3: f.plain(&["Voltage_AC_Phase_3"])?,
        })
    }
}
