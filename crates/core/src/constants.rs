//! Shared constants

/// Default UDP port of a CoAP endpoint
pub const COAP_DEFAULT_PORT: u16 = 5683;

/// Resource listing the resources a CoAP endpoint serves
pub const WELL_KNOWN_CORE: &str = ".well-known/core";
