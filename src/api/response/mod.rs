pub mod active_device_info;
mod common_inverter;
mod cumulation;
mod inverter_info;
mod logger_info;
mod logger_led;
mod meter;
mod min_max;
mod power_flow;
mod three_phase;

use super::endpoint::Request;
use super::Error;
use crate::model::{FieldValue, Measurement};
use serde_json::{Map, Value};
use std::time::Instant;

/// A set of fields delivered together by one endpoint.
pub trait Group: Default + Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn request() -> Request;

    /// Build the group from the `Body` of a successful response fetched at `now`.
    fn map(body: &Value, now: Instant) -> Result<Self, Error>;
}

/// Walk `path` below `value`; every step must be a JSON object.
pub(crate) fn container<'a>(
    value: &'a Value,
    path: &[&str],
    group: &str,
) -> Result<&'a Map<String, Value>, Error> {
    let mut current = value;
    for step in path {
        current = current.get(step).ok_or_else(|| {
            Error::MalformedPayload(format!("{}: missing container {}", group, path.join(".")))
        })?;
    }
    current.as_object().ok_or_else(|| {
        Error::MalformedPayload(format!("{}: {} is not an object", group, path.join(".")))
    })
}

/// Field lookup in one JSON object.
///
/// Every field names its vendor keys in order of preference; the first key that is present and
/// not `null` wins. Fields with no such key stay at their sentinel.
pub(crate) struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    now: Instant,
    group: &'static str,
}

impl<'a> Fields<'a> {
    pub fn new(object: &'a Map<String, Value>, now: Instant, group: &'static str) -> Self {
        Fields {
            object: Some(object),
            now,
            group,
        }
    }

    /// All lookups yield absent fields.
    pub fn empty(now: Instant, group: &'static str) -> Self {
        Fields {
            object: None,
            now,
            group,
        }
    }

    fn lookup(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        let object = self.object?;
        keys.iter().find_map(|key| match object.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some((*key, value)),
        })
    }

    fn malformed(&self, key: &str, value: &Value) -> Error {
        Error::MalformedPayload(format!(
            "{}: unexpected value for {}: {}",
            self.group, key, value
        ))
    }

    /// A scalar stored directly under the key.
    pub fn plain<T: FieldValue>(&self, keys: &[&'static str]) -> Result<Measurement<T>, Error> {
        match self.lookup(keys) {
            None => Ok(Measurement::absent()),
            Some((key, value)) => T::from_json(value)
                .map(|v| Measurement::fresh(v, None, key, self.now))
                .ok_or_else(|| self.malformed(key, value)),
        }
    }

    /// A `{"Value": .., "Unit": ..}` object stored under the key.
    ///
    /// A `null` value is treated like a missing key.
    pub fn unit_value<T: FieldValue>(
        &self,
        keys: &[&'static str],
    ) -> Result<Measurement<T>, Error> {
        let found = keys.iter().find_map(|key| {
            self.lookup(&[*key]).and_then(|(key, object)| match object.get("Value") {
                Some(Value::Null) => None,
                _ => Some((key, object)),
            })
        });

        match found {
            None => Ok(Measurement::absent()),
            Some((key, object)) => {
                let value = object
                    .get("Value")
                    .ok_or_else(|| self.malformed(key, object))?;
                let unit = object
                    .get("Unit")
                    .and_then(Value::as_str)
                    .map(String::from);
                T::from_json(value)
                    .map(|v| Measurement::fresh(v, unit, key, self.now))
                    .ok_or_else(|| self.malformed(key, object))
            }
        }
    }
}
