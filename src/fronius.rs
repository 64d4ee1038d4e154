use crate::api::endpoint::{self, DeviceClass, Request};
use crate::api::envelope::{self, ResponseEnvelope};
use crate::api::response::{active_device_info, Group};
use crate::api::{self, Error};
use crate::currency::{Clock, Slot, SystemClock};
use crate::model::*;
use serde_json::Value;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Instant;

/// Client for one Fronius device with a per-field freshness guarantee.
///
/// Every accessor hands out its cached value while it is younger than
/// `Settings::currency_ttl` and refreshes the group the field belongs to otherwise. Groups are
/// locked separately, so concurrent stale reads of one group share a single request.
#[derive(Debug)]
pub struct Fronius {
    settings: Settings,
    session: Session,
    clock: Arc<dyn Clock>,
    last_success: StdMutex<Option<Instant>>,
    last_envelope: StdMutex<Option<ResponseEnvelope>>,
    common: Slot<CommonInverterValues>,
    cumulation: Slot<CumulationValues>,
    three_phase: Slot<ThreePhaseValues>,
    min_max: Slot<MinMaxValues>,
    meter: Slot<MeterRealtimeValues>,
    power_flow: Slot<PowerFlowValues>,
    logger_info: Slot<LoggerInfo>,
    logger_leds: Slot<LoggerLeds>,
    inverter_info: Slot<InverterInfo>,
}

/// Discover the device's API version and, if `settings.prefetch` is set, fetch every group once.
pub async fn connect(settings: Settings) -> Result<Fronius, Error> {
    connect_with_clock(settings, Arc::new(SystemClock)).await
}

pub async fn connect_with_clock(
    settings: Settings,
    clock: Arc<dyn Clock>,
) -> Result<Fronius, Error> {
    let session = api::discover(&settings).await?;
    let fronius = Fronius {
        settings,
        session,
        clock,
        last_success: StdMutex::new(None),
        last_envelope: StdMutex::new(None),
        common: Slot::default(),
        cumulation: Slot::default(),
        three_phase: Slot::default(),
        min_max: Slot::default(),
        meter: Slot::default(),
        power_flow: Slot::default(),
        logger_info: Slot::default(),
        logger_leds: Slot::default(),
        inverter_info: Slot::default(),
    };

    if fronius.settings.prefetch {
        if let Err(e) = fronius.refresh_all().await {
            log::warn!("initial fetch incomplete: {}", e);
        }
    }

    Ok(fronius)
}

impl Fronius {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Instant of the last response whose header reported success.
    pub fn last_success(&self) -> Option<Instant> {
        *self
            .last_success
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Header of the last data response, successful or not.
    pub fn last_envelope(&self) -> Option<ResponseEnvelope> {
        self.last_envelope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `Body` of `request`, recording its response header.
    pub async fn raw_body(&self, request: &Request) -> Result<Value, Error> {
        let (envelope, json) = api::query(&self.session, request).await?;
        if envelope.is_success() {
            let now = self.clock.now();
            *self
                .last_success
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(now);
        }
        *self
            .last_envelope
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(envelope.clone());

        envelope::body(&envelope, json)
    }

    async fn fetch<G: Group>(&self) -> Result<(G, Instant), Error> {
        let body = self.raw_body(&G::request()).await?;
        let now = self.clock.now();
        let bundle = G::map(&body, now)?;
        log::debug!("{}: refreshed", G::NAME);
        Ok((bundle, now))
    }

    async fn refresh<G: Group>(&self, slot: &Slot<G>) -> Result<(), Error> {
        let mut cached = slot.lock().await;
        let (bundle, at) = self.fetch::<G>().await?;
        slot.store(&mut cached, bundle, at);
        Ok(())
    }

    /// Fetch every group. All groups are attempted; the first failure is returned.
    pub async fn refresh_all(&self) -> Result<(), Error> {
        let results = vec![
            (CommonInverterValues::NAME, self.refresh(&self.common).await),
            (CumulationValues::NAME, self.refresh(&self.cumulation).await),
            (ThreePhaseValues::NAME, self.refresh(&self.three_phase).await),
            (MinMaxValues::NAME, self.refresh(&self.min_max).await),
            (MeterRealtimeValues::NAME, self.refresh(&self.meter).await),
            (PowerFlowValues::NAME, self.refresh(&self.power_flow).await),
            (LoggerInfo::NAME, self.refresh(&self.logger_info).await),
            (LoggerLeds::NAME, self.refresh(&self.logger_leds).await),
            (InverterInfo::NAME, self.refresh(&self.inverter_info).await),
        ];

        let mut first = None;
        for (group, result) in results {
            if let Err(e) = result {
                log::warn!("{}: refresh failed: {}", group, e);
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Read one field of group `G` under the currency policy.
    ///
    /// A recoverable refresh failure falls back to the last delivered value, marked stale.
    async fn read<G, T, F>(&self, slot: &Slot<G>, field: F) -> Result<Reading<T>, Error>
    where
        G: Group,
        T: FieldValue,
        F: Fn(&G) -> &Measurement<T>,
    {
        let ttl = self.settings.currency_ttl;
        let seen = slot.refreshes();
        let mut cached = slot.lock().await;

        if field(&cached.bundle).is_current(ttl, self.clock.now()) {
            log::trace!("{}: cache hit", G::NAME);
            return Ok(field(&cached.bundle).snapshot(false));
        }

        /* a refresh that finished while waiting for the lock is fresh enough */
        if slot.refreshes() == seen {
            match self.fetch::<G>().await {
                Ok((bundle, at)) => slot.store(&mut cached, bundle, at),
                Err(e) if e.is_recoverable() && field(&cached.bundle).updated.is_some() => {
                    log::warn!("{}: serving last known value: {}", G::NAME, e);
                    return Ok(field(&cached.bundle).snapshot(true));
                }
                Err(e) => return Err(e),
            }
        }

        let measurement = field(&cached.bundle);
        Ok(measurement.snapshot(measurement.updated != cached.refreshed_at))
    }

    /// Devices currently known to the data logger. Not cached.
    pub async fn active_devices(&self, class: DeviceClass) -> Result<Vec<ActiveDevice>, Error> {
        let body = self.raw_body(&Request::active_devices(class)).await?;
        active_device_info::map(class, &body)
    }

    pub async fn sensor_realtime_data(&self) -> Result<Value, Error> {
        let request = Request::new(endpoint::SENSOR_REALTIME_DATA)
            .param("Scope", "System")
            .param("DataCollection", "NowSensorData");
        self.raw_body(&request).await
    }

    pub async fn string_realtime_data(&self) -> Result<Value, Error> {
        let request = Request::new(endpoint::STRING_REALTIME_DATA)
            .param("Scope", "Device")
            .param("DeviceID", endpoint::DEVICE_ID)
            .param("DataCollection", "NowStringControlData");
        self.raw_body(&request).await
    }

    pub async fn storage_realtime_data(&self) -> Result<Value, Error> {
        let request = Request::new(endpoint::STORAGE_REALTIME_DATA).param("Scope", "System");
        self.raw_body(&request).await
    }

    pub async fn ohmpilot_realtime_data(&self) -> Result<Value, Error> {
        let request = Request::new(endpoint::OHMPILOT_REALTIME_DATA).param("Scope", "System");
        self.raw_body(&request).await
    }
}

macro_rules! accessors {
    ($slot:ident: $group:ty { $($name:ident: $t:ty => $($path:ident).+;)* }) => {
        impl Fronius {
            $(
                pub async fn $name(&self) -> Result<Reading<$t>, Error> {
                    self.read::<$group, $t, _>(&self.$slot, |g| &g.$($path).+).await
                }
            )*
        }
    };
}

accessors!(common: CommonInverterValues {
    pac: Watts => pac;
    sac: f64 => sac;
    iac: Amperes => iac;
    uac: Volts => uac;
    fac: f64 => fac;
    idc: Amperes => idc;
    udc: Volts => udc;
    day_energy: WattHours => day_energy;
    year_energy: WattHours => year_energy;
    total_energy: WattHours => total_energy;
    device_status: DeviceStatus => device_status;
});

accessors!(cumulation: CumulationValues {
    cumulated_pac: Watts => pac;
    cumulated_day_energy: WattHours => day_energy;
    cumulated_year_energy: WattHours => year_energy;
    cumulated_total_energy: WattHours => total_energy;
    cumulated_device_status: DeviceStatus => device_status;
});

accessors!(three_phase: ThreePhaseValues {
    iac_l1: Amperes => iac_l1;
    iac_l2: Amperes => iac_l2;
    iac_l3: Amperes => iac_l3;
    uac_l1: Volts => uac_l1;
    uac_l2: Volts => uac_l2;
    uac_l3: Volts => uac_l3;
    t_ambient: f64 => t_ambient;
    rotation_speed_fan_fl: f64 => rotation_speed_fan_fl;
    rotation_speed_fan_fr: f64 => rotation_speed_fan_fr;
    rotation_speed_fan_bl: f64 => rotation_speed_fan_bl;
    rotation_speed_fan_br: f64 => rotation_speed_fan_br;
});

accessors!(min_max: MinMaxValues {
    day_pmax: Watts => day_pmax;
    day_uacmax: Volts => day_uacmax;
    day_uacmin: Volts => day_uacmin;
    day_udcmax: Volts => day_udcmax;
    year_pmax: Watts => year_pmax;
    year_uacmax: Volts => year_uacmax;
    year_uacmin: Volts => year_uacmin;
    year_udcmax: Volts => year_udcmax;
    total_pmax: Watts => total_pmax;
    total_uacmax: Volts => total_uacmax;
    total_uacmin: Volts => total_uacmin;
    total_udcmax: Volts => total_udcmax;
});

accessors!(meter: MeterRealtimeValues {
    meter_manufacturer: String => manufacturer;
    meter_model: String => model;
    meter_serial: SerialNumber => serial;
    meter_enable: i64 => enable;
    meter_visible: i64 => visible;
    meter_timestamp: i64 => timestamp;
    meter_location_current: f64 => meter_location_current;
    current_ac_phase_1: Amperes => current_ac_phase_1;
    current_ac_phase_2: Amperes => current_ac_phase_2;
    current_ac_phase_3: Amperes => current_ac_phase_3;
    energy_reactive_var_ac_sum_consumed: f64 => energy_reactive_var_ac_sum_consumed;
    energy_reactive_var_ac_sum_produced: f64 => energy_reactive_var_ac_sum_produced;
    energy_real_wac_minus_absolute: WattHours => energy_real_wac_minus_absolute;
    energy_real_wac_plus_absolute: WattHours => energy_real_wac_plus_absolute;
    energy_real_wac_sum_consumed: WattHours => energy_real_wac_sum_consumed;
    energy_real_wac_sum_produced: WattHours => energy_real_wac_sum_produced;
    frequency_phase_average: f64 => frequency_phase_average;
    power_apparent_s_phase_1: f64 => power_apparent_s_phase_1;
    power_apparent_s_phase_2: f64 => power_apparent_s_phase_2;
    power_apparent_s_phase_3: f64 => power_apparent_s_phase_3;
    power_apparent_s_sum: f64 => power_apparent_s_sum;
    power_factor_phase_1: f64 => power_factor_phase_1;
    power_factor_phase_2: f64 => power_factor_phase_2;
    power_factor_phase_3: f64 => power_factor_phase_3;
    power_factor_sum: f64 => power_factor_sum;
    power_reactive_q_phase_1: f64 => power_reactive_q_phase_1;
    power_reactive_q_phase_2: f64 => power_reactive_q_phase_2;
    power_reactive_q_phase_3: f64 => power_reactive_q_phase_3;
    power_reactive_q_sum: f64 => power_reactive_q_sum;
    power_real_p_phase_1: Watts => power_real_p_phase_1;
    power_real_p_phase_2: Watts => power_real_p_phase_2;
    power_real_p_phase_3: Watts => power_real_p_phase_3;
    power_real_p_sum: Watts => power_real_p_sum;
    voltage_ac_phase_to_phase_12: Volts => voltage_ac_phase_to_phase_12;
    voltage_ac_phase_to_phase_23: Volts => voltage_ac_phase_to_phase_23;
    voltage_ac_phase_to_phase_31: Volts => voltage_ac_phase_to_phase_31;
    voltage_ac_phase_1: Volts => voltage_ac_phase_1;
    voltage_ac_phase_2: Volts => voltage_ac_phase_2;
    voltage_ac_phase_3: Volts => voltage_ac_phase_3;
});

accessors!(power_flow: PowerFlowValues {
    battery_standby: bool => site.battery_standby;
    site_e_day: WattHours => site.e_day;
    site_e_year: WattHours => site.e_year;
    site_e_total: WattHours => site.e_total;
    meter_location: String => site.meter_location;
    mode: String => site.mode;
    p_akku: Watts => site.p_akku;
    p_grid: Watts => site.p_grid;
    p_load: Watts => site.p_load;
    p_pv: Watts => site.p_pv;
    rel_autonomy: f64 => site.rel_autonomy;
    rel_self_consumption: f64 => site.rel_self_consumption;
    flow_inverter_device_type: i64 => inverter.device_type;
    flow_inverter_p: Watts => inverter.p;
    flow_inverter_soc: f64 => inverter.soc;
    flow_inverter_e_day: WattHours => inverter.e_day;
    flow_inverter_e_year: WattHours => inverter.e_year;
    flow_inverter_e_total: WattHours => inverter.e_total;
});

accessors!(logger_info: LoggerInfo {
    co2_factor: f64 => co2_factor;
    co2_unit: String => co2_unit;
    cash_currency: String => cash_currency;
    cash_factor: f64 => cash_factor;
    default_language: String => default_language;
    delivery_factor: f64 => delivery_factor;
    hw_version: String => hw_version;
    platform_id: String => platform_id;
    product_id: String => product_id;
    sw_version: String => sw_version;
    timezone_location: String => timezone_location;
    timezone_name: String => timezone_name;
    utc_offset: i64 => utc_offset;
    logger_unique_id: String => unique_id;
});

accessors!(logger_leds: LoggerLeds {
    power_led: Led => power_led;
    solar_net_led: Led => solar_net_led;
    solar_web_led: Led => solar_web_led;
    wlan_led: Led => wlan_led;
});

accessors!(inverter_info: InverterInfo {
    custom_name: String => custom_name;
    inverter_device_type: i64 => device_type;
    inverter_error_code: i64 => error_code;
    inverter_pv_power: Watts => pv_power;
    inverter_show: i64 => show;
    inverter_status_code: i64 => status_code;
    inverter_unique_id: String => unique_id;
});
