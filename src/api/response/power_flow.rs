use super::{container, Fields, Group};
use crate::api::endpoint::{self, Request};
use crate::api::Error;
use crate::model::{PowerFlowInverter, PowerFlowSite, PowerFlowValues};
use serde_json::Value;
use std::time::Instant;

impl Group for PowerFlowValues {
    const NAME: &'static str = "PowerFlowRealtimeData";

    fn request() -> Request {
        Request::new(endpoint::POWER_FLOW_REALTIME_DATA)
    }

    /// `P_Akku`, `P_Grid` and `P_Load` are `null` when the component is not installed.
    fn map(body: &Value, now: Instant) -> Result<Self, Error> {
        let site = Fields::new(container(body, &["Data", "Site"], Self::NAME)?, now, Self::NAME);
        let device_id = endpoint::DEVICE_ID.to_string();
        let inverter = match body["Data"].get("Inverters").and_then(|i| i.get(&device_id)) {
            Some(Value::Object(inverter)) => Fields::new(inverter, now, Self::NAME),
            _ => Fields::empty(now, Self::NAME),
        };

        Ok(PowerFlowValues {
            site: PowerFlowSite {
                battery_standby: site.plain(&["BatteryStandby"])?,
                e_day: site.plain(&["E_Day"])?,
                e_year: site.plain(&["E_Year"])?,
                e_total: site.plain(&["E_Total"])?,
                meter_location: site.plain(&["Meter_Location"])?,
                mode: site.plain(&["Mode"])?,
                p_akku: site.plain(&["P_Akku"])?,
                p_grid: site.plain(&["P_Grid"])?,
                p_load: site.plain(&["P_Load"])?,
                p_pv: site.plain(&["P_PV"])?,
                rel_autonomy: site.plain(&["rel_Autonomy"])?,
                rel_self_consumption: site.plain(&["rel_SelfConsumption"])?,
            },
            inverter: PowerFlowInverter {
                device_type: inverter.plain(&["DT"])?,
                p: inverter.plain(&["P"])?,
                soc: inverter.plain(&["SOC"])?,
                e_day: inverter.plain(&["E_Day"])?,
                e_year: inverter.plain(&["E_Year"])?,
                e_total: inverter.plain(&["E_Total"])?,
            },
        })
    }
}
