//! One acquisition round: three sequential channel fetches

use log::{debug, trace};
use sensplot_types::{Channel, Reading};

use crate::client::{SensorClient, SensorRequest};
use crate::error::AcquisitionError;

/// Outcome of one acquisition round
pub type AcquisitionResult = Result<Reading, AcquisitionError>;

/// Address of `channel` below `endpoint`
pub fn channel_uri(endpoint: &str, channel: Channel) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), channel.resource())
}

/// Decode a response payload as UTF-8 text holding a floating point number
pub fn decode_payload(channel: Channel, payload: &[u8]) -> Result<f64, AcquisitionError> {
    let text = std::str::from_utf8(payload).map_err(|e| AcquisitionError::Decode {
        channel,
        payload: String::from_utf8_lossy(payload).into_owned(),
        reason: e.to_string(),
    })?;

    text.trim()
        .parse::<f64>()
        .map_err(|e| AcquisitionError::Decode {
            channel,
            payload: text.to_string(),
            reason: e.to_string(),
        })
}

/// Fetches temperature, humidity and air quality from a sensor endpoint
///
/// Holds nothing but the client handle; every call to [`acquire`](Self::acquire)
/// is independent of the previous ones.
pub struct SampleAcquirer<C> {
    client: C,
}

impl<C: SensorClient> SampleAcquirer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one round against `endpoint`.
    ///
    /// Requests go out one after another in [`Channel::ALL`] order. The first
    /// transport or decode failure ends the round and fails it as a whole.
    pub async fn acquire(&self, endpoint: &str) -> AcquisitionResult {
        let mut values = [0.0; 3];
        for (slot, channel) in values.iter_mut().zip(Channel::ALL) {
            *slot = self.fetch(endpoint, channel).await?;
        }
        Ok(Reading::from_values(values))
    }

    async fn fetch(&self, endpoint: &str, channel: Channel) -> Result<f64, AcquisitionError> {
        let request = SensorRequest::retrieve(channel_uri(endpoint, channel));
        trace!("Requesting {}", request.uri);

        let response = self
            .client
            .send(&request)
            .await
            .map_err(|source| AcquisitionError::Transport { channel, source })?;

        let value = decode_payload(channel, &response.payload)?;
        debug!("{} = {}", channel, value);
        Ok(value)
    }
}
