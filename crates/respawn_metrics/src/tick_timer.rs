//! Rolling tick duration window

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub struct TickTimer {
    tick_start: Instant,
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl TickTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            tick_start: Instant::now(),
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn begin(&mut self) {
        self.tick_start = Instant::now();
    }

    pub fn end(&mut self) {
        self.push(self.tick_start.elapsed());
    }

    fn push(&mut self, sample: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.samples.iter().sum();
        (sum / self.samples.len() as u32).as_secs_f64() * 1000.0
    }

    pub fn worst_ms(&self) -> f64 {
        self.samples
            .iter()
            .max()
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_drops_oldest() {
        let mut timer = TickTimer::new(2);
        timer.push(Duration::from_millis(30));
        timer.push(Duration::from_millis(10));
        timer.push(Duration::from_millis(20));
        assert!((timer.average_ms() - 15.0).abs() < 0.001);
        assert!((timer.worst_ms() - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_timer_reports_zero() {
        let timer = TickTimer::new(4);
        assert_eq!(timer.average_ms(), 0.0);
        assert_eq!(timer.worst_ms(), 0.0);
    }
}
