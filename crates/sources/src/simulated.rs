//! Simulated sensor for running without hardware
//!
//! Answers the same resources as the climate mote with waveform values and
//! optionally fails a share of requests to exercise the failure path.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sensplot_core::{SensorClient, SensorRequest, SensorResponse, TransportError, WELL_KNOWN_CORE};
use sensplot_types::{Channel, SimulationConfig, Waveform};

use crate::endpoint::SensorUri;

/// Value range produced for each channel
fn channel_range(channel: Channel) -> (f64, f64) {
    match channel {
        Channel::Temperature => (18.0, 26.0),
        Channel::Humidity => (30.0, 60.0),
        Channel::AirQuality => (5.0, 40.0),
    }
}

/// Waveform position in 0.0..=1.0 for the given phase (in periods)
fn normalized(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Constant => 0.5,
        Waveform::Sine => ((phase * std::f64::consts::TAU).sin() + 1.0) / 2.0,
        Waveform::Sawtooth => phase.fract(),
        Waveform::Triangle => {
            let p = phase.fract() * 2.0;
            if p <= 1.0 {
                p
            } else {
                2.0 - p
            }
        }
        Waveform::Square => {
            if phase.fract() < 0.5 {
                0.0
            } else {
                1.0
            }
        }
    }
}

pub struct SimulatedSensor {
    config: SimulationConfig,
    start_time: Instant,
    rng: Mutex<StdRng>,
}

impl SimulatedSensor {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            start_time: Instant::now(),
            rng: Mutex::new(rng),
        }
    }

    /// Value of `channel` at `elapsed` time, before jitter
    fn value_at(&self, channel: Channel, elapsed: Duration) -> f64 {
        let (min, max) = channel_range(channel);
        let period = if self.config.period_secs > 0.0 {
            self.config.period_secs
        } else {
            1.0
        };
        // Spread the channels a third of a period apart
        let phase = elapsed.as_secs_f64() / period + channel.index() as f64 / 3.0;
        min + normalized(self.config.waveform, phase) * (max - min)
    }

    fn listing() -> String {
        Channel::ALL
            .iter()
            .map(|channel| format!("</{}>;ct=0", channel.resource()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl SensorClient for SimulatedSensor {
    async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError> {
        let target = SensorUri::parse(&request.uri)?;
        let resource = target.resource();

        if resource == WELL_KNOWN_CORE {
            return Ok(SensorResponse::new(Self::listing()));
        }

        let channel = Channel::ALL
            .into_iter()
            .find(|channel| channel.resource() == resource)
            .ok_or_else(|| TransportError::Rejected {
                uri: request.uri.clone(),
                code: "4.04".to_string(),
            })?;

        let (fail, jitter) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let fail = rng.gen_bool(self.config.failure_rate.clamp(0.0, 1.0));
            (fail, rng.gen_range(-0.05..=0.05))
        };

        if fail {
            trace!("Simulating lost request to {}", request.uri);
            return Err(TransportError::Timeout {
                uri: request.uri.clone(),
                elapsed: Duration::ZERO,
            });
        }

        let value = self.value_at(channel, self.start_time.elapsed()) + jitter;
        Ok(SensorResponse::new(format!("{:.2}", value)))
    }
}
