//! Per-event counters for pool activity

use crate::PoolEvent;

#[derive(Debug, Default, Clone)]
pub struct PoolStats {
    counts: [u64; PoolEvent::COUNT],
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: PoolEvent, count: u64) {
        self.counts[event.index()] += count;
    }

    pub fn get(&self, event: PoolEvent) -> u64 {
        self.counts[event.index()]
    }

    pub fn reset(&mut self) {
        self.counts = [0; PoolEvent::COUNT];
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolEvent, u64)> + '_ {
        PoolEvent::ALL.iter().map(move |&event| (event, self.get(event)))
    }
}
