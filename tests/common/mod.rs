//! Mock Fronius data logger on top of wiremock.

#![allow(dead_code)]

use fronius_rs::model::Settings;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BASE_URL: &str = "/solar_api/v1";

pub fn fixture(filename: &str) -> Value {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push(format!("resources/test/{}", filename));
    serde_json::from_str(&fs::read_to_string(d.as_path()).unwrap()).unwrap()
}

/// A complete data endpoint response with the given header code.
pub fn response(code: u64, body: Value) -> Value {
    json!({
        "Body": body,
        "Head": {
            "RequestArguments": {},
            "Status": {"Code": code, "Reason": "test", "UserMessage": ""},
            "Timestamp": "2019-06-12T15:31:03+02:00"
        }
    })
}

/// Data endpoints served by `MockDevice::mount_all`, with their `DataCollection`.
pub const GROUPS: &[(&str, Option<&str>, &str)] = &[
    (
        "GetInverterRealtimeData.cgi",
        Some("CommonInverterData"),
        "GetInverterRealtimeData_CommonInverterData.json",
    ),
    (
        "GetInverterRealtimeData.cgi",
        Some("CumulationInverterData"),
        "GetInverterRealtimeData_CumulationInverterData.json",
    ),
    (
        "GetInverterRealtimeData.cgi",
        Some("3PInverterData"),
        "GetInverterRealtimeData_3PInverterData.json",
    ),
    (
        "GetInverterRealtimeData.cgi",
        Some("MinMaxInverterData"),
        "GetInverterRealtimeData_MinMaxInverterData.json",
    ),
    ("GetMeterRealtimeData.cgi", None, "GetMeterRealtimeData.json"),
    (
        "GetPowerFlowRealtimeData.fcgi",
        None,
        "GetPowerFlowRealtimeData.json",
    ),
    ("GetLoggerInfo.cgi", None, "GetLoggerInfo.json"),
    ("GetLoggerLEDInfo.cgi", None, "GetLoggerLEDInfo.json"),
    ("GetInverterInfo.cgi", None, "GetInverterInfo.json"),
];

pub struct MockDevice {
    pub server: MockServer,
}

impl MockDevice {
    pub async fn start() -> Self {
        MockDevice {
            server: MockServer::start().await,
        }
    }

    /// Settings pointing at the mock, without prefetch.
    pub fn settings(&self) -> Settings {
        Settings::new(self.server.address().to_string()).with_prefetch(false)
    }

    pub async fn mount_version(&self, version: Value) {
        Mock::given(method("GET"))
            .and(path("/solar_api/GetAPIVersion.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(version))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_endpoint(
        &self,
        endpoint: &str,
        collection: Option<&str>,
        template: ResponseTemplate,
    ) {
        let mock = Mock::given(method("GET")).and(path(format!("{}/{}", BASE_URL, endpoint)));
        let mock = match collection {
            Some(collection) => mock.and(query_param("DataCollection", collection)),
            None => mock,
        };
        mock.respond_with(template).mount(&self.server).await;
    }

    pub async fn mount_json(&self, endpoint: &str, collection: Option<&str>, json: Value) {
        self.mount_endpoint(
            endpoint,
            collection,
            ResponseTemplate::new(200).set_body_json(json),
        )
        .await;
    }

    pub async fn mount_delayed(
        &self,
        endpoint: &str,
        collection: Option<&str>,
        json: Value,
        delay: Duration,
    ) {
        self.mount_endpoint(
            endpoint,
            collection,
            ResponseTemplate::new(200)
                .set_body_json(json)
                .set_delay(delay),
        )
        .await;
    }

    /// API version 1 and every data endpoint, answered from the fixtures.
    pub async fn mount_all(&self) {
        self.mount_version(fixture("GetAPIVersion.json")).await;
        for (endpoint, collection, file) in GROUPS {
            self.mount_json(endpoint, *collection, fixture(file)).await;
        }
    }

    /// Forget all mocks and recorded requests, keeping only the version endpoint.
    pub async fn reset(&self) {
        self.server.reset().await;
        self.mount_version(fixture("GetAPIVersion.json")).await;
    }

    pub async fn requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .len()
    }

    pub async fn requests_to(&self, endpoint: &str, collection: Option<&str>) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().ends_with(endpoint))
            .filter(|r| match collection {
                Some(collection) => r
                    .url
                    .query_pairs()
                    .any(|(k, v)| k == "DataCollection" && v == collection),
                None => true,
            })
            .count()
    }
}
