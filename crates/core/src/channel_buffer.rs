//! Fixed-capacity sample history per channel

use std::collections::VecDeque;

use sensplot_types::{BufferMode, Channel, Reading, TelemetrySnapshot};

/// Ordered history of one channel with strict FIFO eviction once full
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl ChannelBuffer {
    /// Create a buffer holding at most `capacity` samples.
    ///
    /// A capacity of zero is raised to one; the poll loop refuses such
    /// configurations before any buffer is built.
    pub fn new(capacity: usize, mode: BufferMode) -> Self {
        let capacity = capacity.max(1);
        let mut buffer = Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        };
        buffer.initialize(mode);
        buffer
    }

    /// Reset contents: zero placeholders for steady-window, empty otherwise
    pub fn initialize(&mut self, mode: BufferMode) {
        self.samples.clear();
        if mode == BufferMode::SteadyWindow {
            self.samples.resize(self.capacity, 0.0);
        }
    }

    /// Append a sample, evicting the oldest one first when full
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Ordered copy of the contents, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The three channel buffers, owned and mutated together
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryBuffers {
    channels: [ChannelBuffer; 3],
}

impl TelemetryBuffers {
    pub fn new(capacity: usize, mode: BufferMode) -> Self {
        Self {
            channels: [
                ChannelBuffer::new(capacity, mode),
                ChannelBuffer::new(capacity, mode),
                ChannelBuffer::new(capacity, mode),
            ],
        }
    }

    pub fn get(&self, channel: Channel) -> &ChannelBuffer {
        &self.channels[channel.index()]
    }

    /// Push every value of `reading` into its channel
    pub fn commit(&mut self, reading: &Reading) {
        for channel in Channel::ALL {
            self.channels[channel.index()].push(reading.get(channel));
        }
    }

    /// Copy all buffers into a snapshot tagged with `cycle`
    pub fn snapshot(&self, cycle: u64) -> TelemetrySnapshot {
        TelemetrySnapshot::new(
            cycle,
            self.get(Channel::Temperature).snapshot(),
            self.get(Channel::Humidity).snapshot(),
            self.get(Channel::AirQuality).snapshot(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_window_prefilled() {
        let buffer = ChannelBuffer::new(4, BufferMode::SteadyWindow);
        assert_eq!(buffer.len(), 4);
        assert!(buffer.is_full());
        assert_eq!(buffer.snapshot(), vec![0.0; 4]);
    }

    #[test]
    fn test_grow_then_slide_starts_empty() {
        let mut buffer = ChannelBuffer::new(3, BufferMode::GrowThenSlide);
        assert!(buffer.is_empty());

        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.snapshot(), vec![1.0, 2.0]);

        buffer.push(3.0);
        buffer.push(4.0);
        assert_eq!(buffer.snapshot(), vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), Some(4.0));
    }

    #[test]
    fn test_steady_window_evicts_placeholders_in_order() {
        let mut buffer = ChannelBuffer::new(3, BufferMode::SteadyWindow);
        buffer.push(10.0);
        assert_eq!(buffer.snapshot(), vec![0.0, 0.0, 10.0]);
        buffer.push(11.0);
        assert_eq!(buffer.snapshot(), vec![0.0, 10.0, 11.0]);
        buffer.push(12.0);
        assert_eq!(buffer.snapshot(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        for mode in [BufferMode::SteadyWindow, BufferMode::GrowThenSlide] {
            let mut buffer = ChannelBuffer::new(5, mode);
            for i in 0..50 {
                buffer.push(i as f64);
                assert!(buffer.len() <= 5);
            }
            assert_eq!(buffer.snapshot(), vec![45.0, 46.0, 47.0, 48.0, 49.0]);
        }
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut buffer = ChannelBuffer::new(2, BufferMode::GrowThenSlide);
        buffer.push(1.5);
        let before = buffer.clone();
        let _ = buffer.snapshot();
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_initialize_resets() {
        let mut buffer = ChannelBuffer::new(2, BufferMode::GrowThenSlide);
        buffer.push(7.0);
        buffer.initialize(BufferMode::SteadyWindow);
        assert_eq!(buffer.snapshot(), vec![0.0, 0.0]);
        buffer.initialize(BufferMode::GrowThenSlide);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_zero_capacity_raised_to_one() {
        let mut buffer = ChannelBuffer::new(0, BufferMode::GrowThenSlide);
        buffer.push(1.0);
        buffer.push(2.0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec![2.0]);
    }

    #[test]
    fn test_telemetry_buffers_commit_and_snapshot() {
        let mut buffers = TelemetryBuffers::new(2, BufferMode::GrowThenSlide);
        buffers.commit(&Reading::new(20.0, 40.0, 5.0));
        buffers.commit(&Reading::new(21.0, 41.0, 6.0));

        let snapshot = buffers.snapshot(7);
        assert_eq!(snapshot.cycle(), 7);
        assert_eq!(snapshot.series(Channel::Temperature), &[20.0, 21.0]);
        assert_eq!(snapshot.series(Channel::Humidity), &[40.0, 41.0]);
        assert_eq!(snapshot.series(Channel::AirQuality), &[5.0, 6.0]);
    }
}
