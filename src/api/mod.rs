pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod response;

use crate::model;
use endpoint::Request;
use envelope::ResponseEnvelope;
pub use error::{Error, ProtocolError, TransportError};
use serde_json::Value;

/// The only API generation this client speaks.
pub const SUPPORTED_API_VERSION: i64 = 1;

pub fn client(settings: &model::Settings) -> Result<reqwest::Client, Error> {
    reqwest::ClientBuilder::new()
        .timeout(settings.http_timeout)
        .build()
        .map_err(|e| Error::InternalError(format!("cannot build HTTP client: {}", e)))
}

/// Map failures below HTTP (no response at all) to Error
fn map_transport_err(url: &str, error: reqwest::Error) -> Error {
    if error.is_timeout() {
        TransportError::Timeout(url.to_owned()).into()
    } else {
        TransportError::Connection(error.to_string()).into()
    }
}

/// Decide on the HTTP status of a response and decode the JSON of accepted ones.
pub fn classify(status: http::StatusCode, url: &str, body: String) -> Result<Value, Error> {
    let code = status.as_u16();
    match code {
        200 | 201 => serde_json::from_str::<Value>(&body)
            .map_err(|e| ProtocolError::InvalidJson(body.to_owned(), e.to_string()).into()),
        500..=u16::MAX => Err(ProtocolError::ServerError(code).into()),
        404 => Err(ProtocolError::NotFound(url.to_owned()).into()),
        401 => Err(ProtocolError::AuthenticationFailed.into()),
        300..=499 => Err(ProtocolError::UnexpectedRedirect(code).into()),
        _ => Err(ProtocolError::UnknownError(code, body).into()),
    }
}

pub async fn get(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<Value, Error> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| map_transport_err(url, e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_transport_err(url, e))?;

    log::trace!("{} {:?} -> {}: {}", url, query, status, body);
    classify(status, url, body)
}

/// Ask the device for its API generation and open a session if it is supported.
pub async fn discover(settings: &model::Settings) -> Result<model::Session, Error> {
    let client = client(settings)?;
    let url = format!(
        "{}://{}/{}",
        settings.protocol(),
        settings.host,
        endpoint::API_VERSION
    );

    let value = get(&client, &url, &[]).await?;
    /* other generations may lay out the rest of the answer differently */
    let api_version = value
        .get("APIVersion")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MalformedPayload(format!("missing APIVersion: {}", value)))?;
    if api_version != SUPPORTED_API_VERSION {
        return Err(Error::UnsupportedVersion(api_version));
    }

    let version = serde_json::from_value::<model::ApiVersion>(value.clone())
        .map_err(|e| Error::MalformedPayload(format!("{}: {}", e, value)))?;

    log::info!(
        "{} speaks API version {} ({}) at {}",
        settings.host,
        version.api_version,
        version.compatibility_range,
        version.base_url
    );

    Ok(model::Session {
        protocol: settings.protocol(),
        host: settings.host.to_owned(),
        version,
        client,
    })
}

/// GET a data endpoint and parse its response header.
///
/// The whole document is returned; use `envelope::body` to get at the payload.
pub async fn query(
    session: &model::Session,
    request: &Request,
) -> Result<(ResponseEnvelope, Value), Error> {
    let url = session.url(request.endpoint);
    log::debug!("GET {} {:?}", url, request.query);

    let json = get(&session.client, &url, &request.query).await?;
    let (envelope, success) = envelope::extract(&json)?;
    if !success {
        log::debug!(
            "{} answered {}: {} {}",
            request.endpoint,
            envelope.code,
            envelope.reason,
            envelope.user_message
        );
    }

    Ok((envelope, json))
}
