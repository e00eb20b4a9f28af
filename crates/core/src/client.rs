//! Sensor communication collaborator

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

/// Operation requested from the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Retrieve,
}

/// Request addressed to `<scheme>://<host>/<resource>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRequest {
    pub uri: String,
    pub kind: RequestKind,
}

impl SensorRequest {
    pub fn retrieve(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: RequestKind::Retrieve,
        }
    }
}

/// Raw response payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SensorResponse {
    pub payload: Vec<u8>,
}

impl SensorResponse {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Request/response service in front of the sensor
///
/// Implementations enforce their own per-request timeout.
#[async_trait]
pub trait SensorClient: Send + Sync {
    /// Send one request and wait for its response
    async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError>;
}

#[async_trait]
impl<C: SensorClient + ?Sized> SensorClient for Box<C> {
    async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<C: SensorClient + ?Sized> SensorClient for Arc<C> {
    async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError> {
        (**self).send(request).await
    }
}
