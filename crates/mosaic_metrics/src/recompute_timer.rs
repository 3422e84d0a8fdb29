//! Timing for visible-set recomputes

use super::ring_buffer::RingBuffer;
use web_time::Instant;

pub struct RecomputeTimer {
    started: Option<Instant>,
    samples: RingBuffer,
}

impl RecomputeTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            started: None,
            samples: RingBuffer::new(capacity),
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the sample opened by `begin`. Unpaired calls are ignored.
    pub fn end(&mut self) {
        if let Some(started) = self.started.take() {
            self.samples.push(started.elapsed());
        }
    }

    pub fn samples(&self) -> usize {
        self.samples.len()
    }

    pub fn average_ms(&self) -> f64 {
        self.samples.average().as_secs_f64() * 1000.0
    }

    pub fn max_ms(&self) -> f64 {
        self.samples.max().as_secs_f64() * 1000.0
    }
}

impl Default for RecomputeTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_without_begin_records_nothing() {
        let mut timer = RecomputeTimer::new(4);
        timer.end();
        assert_eq!(timer.samples(), 0);

        timer.begin();
        timer.end();
        timer.end();
        assert_eq!(timer.samples(), 1);
    }
}
