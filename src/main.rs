#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use config::Config;
use fronius_rs::api::endpoint::DeviceClass;
use fronius_rs::model::Settings;
use fronius_rs::{api, Fronius};
use rocket::State;
use std::time::Duration;

mod metrics;

#[derive(Clone, serde::Deserialize)]
pub struct ExporterConfig {
    host: String,
    https: bool,
    http_timeout: u64,
    currency_ttl: i64,
}

pub fn read_settings() -> Result<Settings, config::ConfigError> {
    let mut settings = Config::default();
    settings
        .set_default("https", false)?
        .set_default("http_timeout", 10i64)?
        .set_default("currency_ttl", 90i64)?
        .merge(config::Environment::with_prefix("FRONIUS"))?;

    let config: ExporterConfig = settings.try_into()?;
    Ok(Settings::new(config.host)
        .with_https(config.https)
        .with_http_timeout(Duration::from_secs(config.http_timeout))
        .with_currency_ttl_secs(config.currency_ttl))
}

#[get("/metrics")]
async fn metrics_route(fronius: &State<Fronius>) -> Result<String, api::Error> {
    metrics::collect(fronius).await?;
    metrics::read()
}

#[get("/active-devices")]
async fn active_devices_route(fronius: &State<Fronius>) -> Result<String, api::Error> {
    let devices = fronius.active_devices(DeviceClass::System).await?;

    Ok(format!("{:#?}", devices))
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = read_settings()?;
    let fronius = fronius_rs::connect(settings).await?;

    let _ = rocket::build()
        .manage(fronius)
        .mount("/", routes![metrics_route, active_devices_route])
        .launch()
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
