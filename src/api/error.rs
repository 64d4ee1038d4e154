use super::envelope::ResponseCode;
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connection(String),
}

/// HTTP-level failures. These are never retried by the accessors.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    #[error("[{0}] server error")]
    ServerError(u16),
    #[error("[404] URL not found: {0}")]
    NotFound(String),
    #[error("[401] authentication failed")]
    AuthenticationFailed,
    #[error("[{0}] unexpected redirect")]
    UnexpectedRedirect(u16),
    #[error("[{0}] unexpected HTTP status, content: {1}")]
    UnknownError(u16, String),
    #[error("invalid JSON response ({1}): {0}")]
    InvalidJson(String, String),
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("device answered {code}: {reason}")]
    DeviceStatus { code: ResponseCode, reason: String },
    #[error("unknown status code {0} in response header")]
    UnknownStatusCode(i64),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("API version {0} is not supported")]
    UnsupportedVersion(i64),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// Transient conditions after which the last known values may still be served.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::DeviceStatus { .. })
    }

    fn status(&self) -> Status {
        match self {
            e if e.is_recoverable() => Status::ServiceUnavailable,
            Error::Protocol(_) | Error::UnknownStatusCode(_) | Error::MalformedPayload(_) => {
                Status::BadGateway
            }
            _ => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let error = format!(
            "<html><body><h3>{}</h3>Downstream device: <code>{}</code></body></html>",
            status, self
        );
        Response::build()
            .status(status)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
