use fronius_rs::model::Reading;
use fronius_rs::{Error, Fronius};
use prometheus::{Encoder, Gauge, GaugeVec, TextEncoder};

lazy_static! {
    static ref AC_POWER_GAUGE: Gauge = register_gauge!(opts!(
        "fronius_ac_power_watts",
        "AC power currently fed in by the inverter",
    ))
    .unwrap();
    static ref ENERGY_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "fronius_energy_watt_hours",
            "energy produced by the inverter in the current period",
        ),
        &["period"],
    )
    .unwrap();
    static ref AC_VOLTAGE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("fronius_ac_voltage_volts", "inverter AC voltage per phase",),
        &["phase"],
    )
    .unwrap();
    static ref AC_CURRENT_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("fronius_ac_current_amperes", "inverter AC current per phase",),
        &["phase"],
    )
    .unwrap();
    static ref METER_POWER_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "fronius_meter_power_watts",
            "real power measured by the smart meter, positive when consuming from the grid",
        ),
        &["phase"],
    )
    .unwrap();
    static ref POWER_FLOW_GAUGE: GaugeVec = register_gauge_vec!(
        opts!("fronius_power_flow_watts", "site power flow"),
        &["flow"],
    )
    .unwrap();
}

/// Value to export for `name`. Devices without e.g. a meter answer with a device status error,
/// which only skips the metric.
fn value(name: &str, reading: Result<Reading<f64>, Error>) -> Result<Option<f64>, Error> {
    match reading {
        Ok(reading) => {
            if reading.stale {
                log::debug!("{}: exporting stale value", name);
            }
            Ok(Some(reading.value))
        }
        Err(e) if e.is_recoverable() => {
            log::warn!("{}: {}", name, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn set_labelled(
    gauge: &GaugeVec,
    label: &str,
    reading: Result<Reading<f64>, Error>,
) -> Result<(), Error> {
    if let Some(v) = value(label, reading)? {
        gauge.with_label_values(&[label]).set(v);
    }
    Ok(())
}

async fn collect_inverter(fronius: &Fronius) -> Result<(), Error> {
    if let Some(v) = value("pac", fronius.pac().await)? {
        AC_POWER_GAUGE.set(v);
    }

    set_labelled(&ENERGY_GAUGE, "day", fronius.day_energy().await)?;
    set_labelled(&ENERGY_GAUGE, "year", fronius.year_energy().await)?;
    set_labelled(&ENERGY_GAUGE, "total", fronius.total_energy().await)?;

    set_labelled(&AC_VOLTAGE_GAUGE, "L1", fronius.uac_l1().await)?;
    set_labelled(&AC_VOLTAGE_GAUGE, "L2", fronius.uac_l2().await)?;
    set_labelled(&AC_VOLTAGE_GAUGE, "L3", fronius.uac_l3().await)?;
    set_labelled(&AC_CURRENT_GAUGE, "L1", fronius.iac_l1().await)?;
    set_labelled(&AC_CURRENT_GAUGE, "L2", fronius.iac_l2().await)?;
    set_labelled(&AC_CURRENT_GAUGE, "L3", fronius.iac_l3().await)?;

    Ok(())
}

async fn collect_meter(fronius: &Fronius) -> Result<(), Error> {
    set_labelled(&METER_POWER_GAUGE, "1", fronius.power_real_p_phase_1().await)?;
    set_labelled(&METER_POWER_GAUGE, "2", fronius.power_real_p_phase_2().await)?;
    set_labelled(&METER_POWER_GAUGE, "3", fronius.power_real_p_phase_3().await)?;
    set_labelled(&METER_POWER_GAUGE, "sum", fronius.power_real_p_sum().await)?;

    Ok(())
}

async fn collect_power_flow(fronius: &Fronius) -> Result<(), Error> {
    set_labelled(&POWER_FLOW_GAUGE, "grid", fronius.p_grid().await)?;
    set_labelled(&POWER_FLOW_GAUGE, "load", fronius.p_load().await)?;
    set_labelled(&POWER_FLOW_GAUGE, "pv", fronius.p_pv().await)?;
    set_labelled(&POWER_FLOW_GAUGE, "akku", fronius.p_akku().await)?;

    Ok(())
}

/// Update the Prometheus registry from `fronius`. Freshness is up to the client's cache.
pub async fn collect(fronius: &Fronius) -> Result<(), Error> {
    collect_inverter(fronius).await?;
    collect_meter(fronius).await?;
    collect_power_flow(fronius).await?;

    Ok(())
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::InternalError(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| Error::InternalError(e.to_string()))
}
