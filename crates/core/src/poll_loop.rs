//! Poll loop for scheduling acquisition rounds and render hand-offs

use log::{debug, info, trace, warn};
use sensplot_types::{PollConfig, Reading};
use tokio::time::{Instant, MissedTickBehavior};

use crate::acquirer::SampleAcquirer;
use crate::channel_buffer::TelemetryBuffers;
use crate::client::SensorClient;
use crate::error::StartupConfigError;
use crate::renderer::Renderer;

/// Where the loop currently is within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Fetching,
    Updating,
    Failed,
    MaybeRendering,
}

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// 1-based cycle number
    pub cycle: u64,
    /// Values committed to the buffers, `None` if the cycle failed
    pub reading: Option<Reading>,
    /// Whether a snapshot was handed to the renderer
    pub rendered: bool,
}

impl CycleReport {
    pub fn succeeded(&self) -> bool {
        self.reading.is_some()
    }
}

/// Counters accumulated over the lifetime of a loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub successes: u64,
    pub failures: u64,
    pub renders: u64,
}

/// Check the startup guard without building a loop
pub fn validate_config(config: &PollConfig) -> Result<(), StartupConfigError> {
    if config.max_samples < 1 {
        return Err(StartupConfigError::EmptyHistory(config.max_samples));
    }
    if config.render_period < 1 {
        return Err(StartupConfigError::ZeroRenderPeriod);
    }
    if config.render_period > config.max_samples as u64 {
        return Err(StartupConfigError::RenderPeriodTooLong {
            render_period: config.render_period,
            max_samples: config.max_samples,
        });
    }
    if config.checked_cycle_interval().is_none() {
        return Err(StartupConfigError::InvalidInterval(
            config.cycle_interval_seconds,
        ));
    }
    Ok(())
}

/// Drives acquisition on a fixed cadence and owns all channel buffers
///
/// Every tick runs one cycle: fetch all three channels, commit them to the
/// buffers if (and only if) all three succeeded, then hand a snapshot to the
/// renderer every `render_period` cycles. The cycle counter advances on
/// failed cycles too.
pub struct PollLoop<C, R> {
    config: PollConfig,
    endpoint: String,
    acquirer: SampleAcquirer<C>,
    renderer: R,
    buffers: TelemetryBuffers,
    cycle: u64,
    state: LoopState,
    stats: LoopStats,
}

impl<C: SensorClient, R: Renderer> PollLoop<C, R> {
    /// Build a loop, refusing configurations no buffer or cadence can satisfy
    pub fn new(config: PollConfig, client: C, renderer: R) -> Result<Self, StartupConfigError> {
        validate_config(&config)?;

        let endpoint = config.endpoint();
        let buffers = TelemetryBuffers::new(config.max_samples, config.buffer_mode());
        debug!(
            "Poll loop for {} ({} samples, {:?}, render every {} cycles)",
            endpoint,
            config.max_samples,
            config.buffer_mode(),
            config.render_period
        );

        Ok(Self {
            config,
            endpoint,
            acquirer: SampleAcquirer::new(client),
            renderer,
            buffers,
            cycle: 0,
            state: LoopState::Idle,
            stats: LoopStats::default(),
        })
    }

    /// Run cycles forever on the configured interval
    pub async fn run(&mut self) {
        self.drive(None).await
    }

    /// Run exactly `cycles` cycles on the configured interval
    pub async fn run_for(&mut self, cycles: u64) {
        self.drive(Some(cycles)).await
    }

    async fn drive(&mut self, mut remaining: Option<u64>) {
        let mut interval = tokio::time::interval(self.config.cycle_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if remaining == Some(0) {
                break;
            }

            self.set_state(LoopState::Idle);
            interval.tick().await;

            let start = Instant::now();
            let report = self.run_cycle().await;
            trace!("Cycle {} took {:?}", report.cycle, start.elapsed());

            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
        }
    }

    /// Run a single cycle immediately
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        self.stats.cycles += 1;

        self.set_state(LoopState::Fetching);
        let reading = match self.acquirer.acquire(&self.endpoint).await {
            Ok(reading) => {
                self.set_state(LoopState::Updating);
                self.buffers.commit(&reading);
                self.stats.successes += 1;
                info!("{}", reading);
                Some(reading)
            }
            Err(e) => {
                self.set_state(LoopState::Failed);
                self.stats.failures += 1;
                warn!("Cycle {} failed: {}", self.cycle, error_chain(&e));
                None
            }
        };

        self.set_state(LoopState::MaybeRendering);
        let rendered = self.cycle % self.config.render_period == 0;
        if rendered {
            debug!("Rendering snapshot for cycle {}", self.cycle);
            self.renderer.render(self.buffers.snapshot(self.cycle));
            self.stats.renders += 1;
        }

        self.set_state(LoopState::Idle);
        CycleReport {
            cycle: self.cycle,
            reading,
            rendered,
        }
    }

    fn set_state(&mut self, state: LoopState) {
        if self.state != state {
            trace!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of cycles run so far
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn buffers(&self) -> &TelemetryBuffers {
        &self.buffers
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

/// Render an error and its sources on one line
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SensorRequest, SensorResponse};
    use crate::error::TransportError;
    use async_trait::async_trait;
    use sensplot_types::{Channel, TelemetrySnapshot};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Plays back one scripted outcome per cycle
    #[derive(Default)]
    struct ScriptedClient {
        cycles: Mutex<VecDeque<Option<[f64; 3]>>>,
        current: Mutex<Option<Option<[f64; 3]>>>,
        requests: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(cycles: Vec<Option<[f64; 3]>>) -> Arc<Self> {
            Arc::new(Self {
                cycles: Mutex::new(cycles.into()),
                ..Default::default()
            })
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SensorClient for ScriptedClient {
        async fn send(&self, request: &SensorRequest) -> Result<SensorResponse, TransportError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let channel = Channel::ALL
                .into_iter()
                .find(|c| request.uri.ends_with(c.resource()))
                .unwrap();

            let mut current = self.current.lock().unwrap();
            if channel == Channel::Temperature {
                *current = self.cycles.lock().unwrap().pop_front();
            }

            match *current {
                Some(Some(values)) => Ok(SensorResponse::new(values[channel.index()].to_string())),
                _ => Err(TransportError::Timeout {
                    uri: request.uri.clone(),
                    elapsed: Duration::from_secs(2),
                }),
            }
        }
    }

    /// Keeps every snapshot it is handed
    #[derive(Default, Clone)]
    struct RecordingRenderer {
        snapshots: Arc<Mutex<Vec<TelemetrySnapshot>>>,
    }

    impl RecordingRenderer {
        fn rendered_cycles(&self) -> Vec<u64> {
            self.snapshots.lock().unwrap().iter().map(|s| s.cycle()).collect()
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, snapshot: TelemetrySnapshot) {
            self.snapshots.lock().unwrap().push(snapshot);
        }
    }

    fn config(max_samples: usize, render_period: u64, steady: bool) -> PollConfig {
        PollConfig {
            max_samples,
            render_period,
            sensor_address: "[::1]".to_string(),
            steady_window_mode: steady,
            cycle_interval_seconds: 0.5,
        }
    }

    #[test]
    fn test_startup_guard() {
        assert_eq!(
            validate_config(&config(0, 1, true)),
            Err(StartupConfigError::EmptyHistory(0))
        );
        assert_eq!(
            validate_config(&config(3, 0, true)),
            Err(StartupConfigError::ZeroRenderPeriod)
        );
        assert_eq!(
            validate_config(&config(3, 4, true)),
            Err(StartupConfigError::RenderPeriodTooLong {
                render_period: 4,
                max_samples: 3
            })
        );

        let mut bad_interval = config(3, 1, true);
        bad_interval.cycle_interval_seconds = 0.0;
        assert!(matches!(
            validate_config(&bad_interval),
            Err(StartupConfigError::InvalidInterval(_))
        ));

        // Rounds down to zero
        bad_interval.cycle_interval_seconds = 1e-10;
        assert_eq!(
            validate_config(&bad_interval),
            Err(StartupConfigError::InvalidInterval(1e-10))
        );

        // Not representable as a Duration
        bad_interval.cycle_interval_seconds = 1e20;
        assert_eq!(
            validate_config(&bad_interval),
            Err(StartupConfigError::InvalidInterval(1e20))
        );

        assert_eq!(validate_config(&config(3, 3, true)), Ok(()));
    }

    #[tokio::test]
    async fn test_rejected_config_issues_no_requests() {
        let client = ScriptedClient::new(vec![Some([1.0, 2.0, 3.0])]);
        let renderer = RecordingRenderer::default();

        let result = PollLoop::new(config(0, 1, true), client.clone(), renderer.clone());
        assert!(result.is_err());

        let result = PollLoop::new(config(2, 3, true), client.clone(), renderer.clone());
        assert!(result.is_err());

        assert_eq!(client.requests(), 0);
        assert!(renderer.rendered_cycles().is_empty());
    }

    #[tokio::test]
    async fn test_steady_window_scenario() {
        let client = ScriptedClient::new(vec![
            Some([10.0, 50.0, 1.0]),
            Some([11.0, 51.0, 2.0]),
            Some([12.0, 52.0, 3.0]),
        ]);
        let mut poll =
            PollLoop::new(config(3, 3, true), client, RecordingRenderer::default()).unwrap();

        for _ in 0..3 {
            assert!(poll.run_cycle().await.succeeded());
        }

        let buffers = poll.buffers();
        assert_eq!(buffers.get(Channel::Temperature).snapshot(), vec![10.0, 11.0, 12.0]);
        assert_eq!(buffers.get(Channel::Humidity).snapshot(), vec![50.0, 51.0, 52.0]);
        assert_eq!(buffers.get(Channel::AirQuality).snapshot(), vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_steady_window_partial_eviction() {
        let client = ScriptedClient::new(vec![Some([10.0, 0.0, 0.0]), Some([11.0, 0.0, 0.0])]);
        let mut poll =
            PollLoop::new(config(4, 1, true), client, RecordingRenderer::default()).unwrap();

        poll.run_cycle().await;
        poll.run_cycle().await;

        let temperature = poll.buffers().get(Channel::Temperature);
        assert_eq!(temperature.len(), 4);
        assert_eq!(temperature.snapshot(), vec![0.0, 0.0, 10.0, 11.0]);
    }

    #[tokio::test]
    async fn test_grow_then_slide() {
        let client = ScriptedClient::new(vec![
            Some([1.0, 1.0, 1.0]),
            Some([2.0, 2.0, 2.0]),
            Some([3.0, 3.0, 3.0]),
        ]);
        let mut poll =
            PollLoop::new(config(2, 1, false), client, RecordingRenderer::default()).unwrap();

        poll.run_cycle().await;
        assert_eq!(poll.buffers().get(Channel::Humidity).snapshot(), vec![1.0]);

        poll.run_cycle().await;
        poll.run_cycle().await;
        assert_eq!(poll.buffers().get(Channel::Humidity).snapshot(), vec![2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_failed_cycle_leaves_buffers_untouched() {
        let client = ScriptedClient::new(vec![Some([5.0, 6.0, 7.0]), None]);
        let mut poll =
            PollLoop::new(config(3, 1, false), client.clone(), RecordingRenderer::default())
                .unwrap();

        poll.run_cycle().await;
        let before = poll.buffers().clone();

        let report = poll.run_cycle().await;
        assert!(!report.succeeded());
        assert_eq!(poll.buffers(), &before);
        assert_eq!(poll.state(), LoopState::Idle);

        // The first request of the failed cycle ended it
        assert_eq!(client.requests(), 4);
    }

    #[tokio::test]
    async fn test_render_cadence_counts_failed_cycles() {
        let client = ScriptedClient::new(vec![
            Some([1.0, 1.0, 1.0]),
            None,
            Some([3.0, 3.0, 3.0]),
            Some([4.0, 4.0, 4.0]),
            Some([5.0, 5.0, 5.0]),
        ]);
        let renderer = RecordingRenderer::default();
        let mut poll = PollLoop::new(config(5, 2, false), client, renderer.clone()).unwrap();

        let mut rendered = Vec::new();
        for _ in 0..5 {
            let report = poll.run_cycle().await;
            assert_eq!(report.rendered, report.cycle % 2 == 0);
            rendered.push(report.rendered);
        }

        assert_eq!(rendered, vec![false, true, false, true, false]);
        assert_eq!(renderer.rendered_cycles(), vec![2, 4]);

        // Cycle 2 failed, so its snapshot only holds cycle 1's sample
        let snapshots = renderer.snapshots.lock().unwrap();
        assert_eq!(snapshots[0].series(Channel::Temperature), &[1.0]);
        assert_eq!(snapshots[1].series(Channel::Temperature), &[1.0, 3.0, 4.0]);

        assert_eq!(
            poll.stats(),
            LoopStats {
                cycles: 5,
                successes: 4,
                failures: 1,
                renders: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_snapshot_has_full_capacity_in_steady_mode() {
        let client = ScriptedClient::new(vec![Some([1.0, 2.0, 3.0])]);
        let renderer = RecordingRenderer::default();
        let mut poll = PollLoop::new(config(4, 1, true), client, renderer.clone()).unwrap();

        poll.run_cycle().await;

        let snapshots = renderer.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        for (_, series) in snapshots[0].iter() {
            assert_eq!(series.len(), 4);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_for_keeps_cadence() {
        let client = ScriptedClient::new(vec![Some([1.0, 1.0, 1.0]); 4]);
        let mut poll =
            PollLoop::new(config(4, 2, false), client, RecordingRenderer::default()).unwrap();

        let start = Instant::now();
        poll.run_for(4).await;

        assert_eq!(poll.cycle(), 4);
        assert_eq!(poll.stats().renders, 2);
        // First tick fires immediately, the remaining three wait one interval each
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }
}
