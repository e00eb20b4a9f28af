//! CoAP over UDP sensor client

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use coap_lite::{CoapOption, MessageClass, MessageType, Packet, RequestType};
use log::{debug, trace};
use sensplot_core::{SensorClient, SensorRequest, SensorResponse, TransportError};
use sensplot_types::SensorConfig;
use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::endpoint::SensorUri;

/// Largest datagram we accept from a sensor
const MAX_DATAGRAM_SIZE: usize = 1500;

/// Length of the random token attached to each request
const TOKEN_LENGTH: usize = 4;

/// Sends confirmable GET requests and waits for piggybacked or separate responses
///
/// Each request uses its own ephemeral socket, so responses to abandoned
/// exchanges never reach a later one.
pub struct CoapClient {
    ack_timeout: Duration,
    max_retransmit: u32,
    next_message_id: AtomicU16,
}

impl CoapClient {
    pub fn new(ack_timeout: Duration, max_retransmit: u32) -> Self {
        Self {
            ack_timeout,
            max_retransmit,
            next_message_id: AtomicU16::new(rand::random()),
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(
            Duration::from_millis(config.ack_timeout_ms),
            config.max_retransmit,
        )
    }

    fn build_request(&self, target: &SensorUri) -> Packet {
        let mut packet = Packet::new();
        packet.header.set_type(MessageType::Confirmable);
        packet.header.code = MessageClass::Request(RequestType::Get);
        packet.header.message_id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        packet.set_token(rand::random::<[u8; TOKEN_LENGTH]>().to_vec());
        for segment in &target.path {
            packet.add_option(CoapOption::UriPath, segment.as_bytes().to_vec());
        }
        packet
    }

    async fn exchange(&self, uri: &str) -> Result<Vec<u8>, TransportError> {
        let target = SensorUri::parse(uri)?;
        let addr = target.resolve().await?;
        let io_error = |source| TransportError::Io {
            uri: uri.to_string(),
            source,
        };

        let local: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(io_error)?;
        socket.connect(addr).await.map_err(io_error)?;

        let request = self.build_request(&target);
        let bytes = request.to_bytes().map_err(|e| TransportError::Malformed {
            uri: uri.to_string(),
            reason: format!("could not encode request: {:?}", e),
        })?;

        let started = Instant::now();
        let mut acknowledged = false;
        for attempt in 0..=self.max_retransmit {
            // Once the server acknowledged, the response follows separately
            if !acknowledged {
                trace!(
                    "GET {} (mid {}, attempt {})",
                    uri,
                    request.header.message_id,
                    attempt + 1
                );
                socket.send(&bytes).await.map_err(io_error)?;
            }

            let response = tokio::time::timeout(
                self.ack_timeout,
                await_response(&socket, &request, &mut acknowledged, uri),
            )
            .await;

            match response {
                Ok(result) => return result,
                Err(_) => debug!(
                    "No response from {} within {:?} (attempt {})",
                    uri,
                    self.ack_timeout,
                    attempt + 1
                ),
            }
        }

        Err(TransportError::Timeout {
            uri: uri.to_string(),
            elapsed: started.elapsed(),
        })
    }
}

/// Receive until the response matching `request` arrives
async fn await_response(
    socket: &UdpSocket,
    request: &Packet,
    acknowledged: &mut bool,
    uri: &str,
) -> Result<Vec<u8>, TransportError> {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let len = socket.recv(&mut buf).await.map_err(|source| TransportError::Io {
            uri: uri.to_string(),
            source,
        })?;

        let packet = match Packet::from_bytes(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("Ignoring undecodable datagram from {}: {:?}", uri, e);
                continue;
            }
        };

        let same_exchange = packet.header.message_id == request.header.message_id;
        let same_token = packet.get_token() == request.get_token();

        match packet.header.get_type() {
            MessageType::Reset if same_exchange => {
                return Err(TransportError::Rejected {
                    uri: uri.to_string(),
                    code: "reset".to_string(),
                });
            }
            MessageType::Acknowledgement if same_exchange => {
                if matches!(packet.header.code, MessageClass::Empty) {
                    trace!("{} acknowledged, waiting for separate response", uri);
                    *acknowledged = true;
                    continue;
                }
                if same_token {
                    return response_payload(uri, packet);
                }
            }
            MessageType::Confirmable if same_token => {
                let ack = empty_ack(packet.header.message_id);
                if let Ok(bytes) = ack.to_bytes() {
                    socket.send(&bytes).await.map_err(|source| TransportError::Io {
                        uri: uri.to_string(),
                        source,
                    })?;
                }
                return response_payload(uri, packet);
            }
            MessageType::NonConfirmable if same_token => {
                return response_payload(uri, packet);
            }
            _ => {}
        }

        trace!(
            "Ignoring unrelated message {} from {}",
            packet.header.message_id,
            uri
        );
    }
}

fn empty_ack(message_id: u16) -> Packet {
    let mut ack = Packet::new();
    ack.header.set_type(MessageType::Acknowledgement);
    ack.header.code = MessageClass::Empty;
    ack.header.message_id = message_id;
    ack
}

/// Payload of a 2.xx response, anything else is a rejection
fn response_payload(uri: &str, packet: Packet) -> Result<Vec<u8>, TransportError> {
    let code = u8::from(packet.header.code);
    let (class, detail) = (code >> 5, code & 0x1f);
    trace!("{} answered {}.{:02} ({} bytes)", uri, class, detail, packet.payload.len());

    if class == 2 {
        Ok(packet.payload)
    } else {
        Err(TransportError::Rejected {
            uri: uri.to_string(),
            code: format!("{}.{:02}", class, detail),
        })
    }
}

#[async_trait]
impl SensorClient for CoapClient {
    async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError> {
        let payload = self.exchange(&request.uri).await?;
        Ok(SensorResponse { payload })
    }
}
