//! Common response header (`Head`) carried by every data endpoint.

use super::Error;
use num_derive::FromPrimitive;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum ResponseCode {
    Okay = 0,
    NotImplemented = 1,
    Uninitialized = 2,
    Initialized = 3,
    Running = 4,
    Timeout = 5,
    ArgumentError = 6,
    LnRequestError = 7,
    LnRequestTimeout = 8,
    LnParseError = 9,
    ConfigIoError = 10,
    NotSupported = 11,
    DeviceNotAvailable = 12,
    UnknownError = 255,
}

impl ResponseCode {
    pub fn name(&self) -> &'static str {
        match self {
            ResponseCode::Okay => "OKAY",
            ResponseCode::NotImplemented => "NotImplemented",
            ResponseCode::Uninitialized => "Uninitialized",
            ResponseCode::Initialized => "Initialized",
            ResponseCode::Running => "Running",
            ResponseCode::Timeout => "Timeout",
            ResponseCode::ArgumentError => "Argument Error",
            ResponseCode::LnRequestError => "LNRequestError",
            ResponseCode::LnRequestTimeout => "LNRequestTimeout",
            ResponseCode::LnParseError => "LNParseError",
            ResponseCode::ConfigIoError => "ConfigIOError",
            ResponseCode::NotSupported => "NotSupported",
            ResponseCode::DeviceNotAvailable => "DeviceNotAvailable",
            ResponseCode::UnknownError => "UnknownError",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResponseCode::Okay => "Request successfully finished, Data are valid",
            ResponseCode::NotImplemented => {
                "The request or a part of the request is not implemented yet"
            }
            ResponseCode::Uninitialized => "Instance of APIRequest created, but not yet configured",
            ResponseCode::Initialized => "Request is configured and ready to be sent",
            ResponseCode::Running => "Request is currently being processed (waiting for response)",
            ResponseCode::Timeout => "Response was not received within desired time",
            ResponseCode::ArgumentError => {
                "Invalid arguments/combination of arguments or missing arguments"
            }
            ResponseCode::LnRequestError => {
                "Something went wrong during sending/receiving of LN-message"
            }
            ResponseCode::LnRequestTimeout => "LN-request timed out",
            ResponseCode::LnParseError => {
                "Something went wrong during parsing of successfully received LN-message"
            }
            ResponseCode::ConfigIoError => {
                "Something went wrong while reading settings from local config"
            }
            ResponseCode::NotSupported => "The operation/feature or whatever is not supported",
            ResponseCode::DeviceNotAvailable => "The device is not available",
            ResponseCode::UnknownError => "undefined runtime error",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub code: ResponseCode,
    pub reason: String,
    pub user_message: String,
    /// Device time as reported, e.g. `2019-06-12T15:31:03+02:00`.
    pub timestamp: String,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == ResponseCode::Okay
    }

    pub fn status(&self) -> &'static str {
        self.code.name()
    }

    pub fn description(&self) -> &'static str {
        self.code.description()
    }
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}

/// Parse `Head` of a response. The boolean is true iff the device reported success.
pub fn extract(json: &Value) -> Result<(ResponseEnvelope, bool), Error> {
    let head = json
        .get("Head")
        .ok_or_else(|| Error::MalformedPayload(String::from("missing Head")))?;
    let status = head.get("Status");

    let code = status
        .and_then(|s| s.get("Code"))
        .ok_or_else(|| Error::MalformedPayload(String::from("missing Head.Status.Code")))?;
    let code = code.as_i64().ok_or_else(|| {
        Error::MalformedPayload(format!("non-integer Head.Status.Code: {}", code))
    })?;
    let code = <ResponseCode as num::FromPrimitive>::from_i64(code)
        .ok_or(Error::UnknownStatusCode(code))?;

    let envelope = ResponseEnvelope {
        code,
        reason: text(status.and_then(|s| s.get("Reason"))),
        user_message: text(status.and_then(|s| s.get("UserMessage"))),
        timestamp: text(head.get("Timestamp")),
    };
    let success = envelope.is_success();

    Ok((envelope, success))
}

/// Body of a successful response. A non-zero code becomes `Error::DeviceStatus`.
pub fn body(envelope: &ResponseEnvelope, json: Value) -> Result<Value, Error> {
    if !envelope.is_success() {
        return Err(Error::DeviceStatus {
            code: envelope.code,
            reason: envelope.reason.to_owned(),
        });
    }

    match json {
        Value::Object(mut map) => map
            .remove("Body")
            .ok_or_else(|| Error::MalformedPayload(String::from("missing Body"))),
        _ => Err(Error::MalformedPayload(String::from("missing Body"))),
    }
}
