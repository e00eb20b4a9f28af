//! sensplot-sources: Sensor communication clients for sensplot.

mod coap;
mod discovery;
mod endpoint;
mod simulated;

pub use coap::CoapClient;
pub use discovery::{discover, parse_link_format};
pub use endpoint::SensorUri;
pub use simulated::SimulatedSensor;

use log::info;
use sensplot_core::SensorClient;
use sensplot_types::{SensorConfig, SensorKind};

/// Boxed sensor client for dynamic dispatch
pub type BoxedSensorClient = Box<dyn SensorClient>;

/// Create the sensor client selected by `config`
pub fn create_client(config: &SensorConfig) -> BoxedSensorClient {
    match config.kind {
        SensorKind::Coap => {
            info!(
                "Using CoAP client (ack timeout {} ms, {} retransmits)",
                config.ack_timeout_ms, config.max_retransmit
            );
            Box::new(CoapClient::from_config(config))
        }
        SensorKind::Simulated => {
            info!("Using simulated sensor ({:?})", config.simulation.waveform);
            Box::new(SimulatedSensor::new(config.simulation.clone()))
        }
    }
}
