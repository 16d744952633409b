//! Request/response channel between the façade and the Resource API.

use crate::api::{self, ApiRequest, ApiResponse};
use crate::db::SharedConnection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The Resource API could not be reached or answered with garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Unavailable(String),
    Decode(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(details) => write!(f, "server unavailable: {details}"),
            Self::Decode(details) => write!(f, "unexpected response: {details}"),
        }
    }
}

impl Error for TransportError {}

/// Blocking request/response seam.
///
/// Implementations must not retry; a failed call is reported once.
pub trait Transport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// In-process transport that calls the Resource API handlers directly.
#[derive(Clone)]
pub struct LocalTransport {
    conn: SharedConnection,
}

impl LocalTransport {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &SharedConnection {
        &self.conn
    }
}

impl Transport for LocalTransport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        Ok(api::handle_shared(&self.conn, &request))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}
