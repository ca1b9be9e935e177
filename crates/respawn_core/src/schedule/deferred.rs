use std::time::Duration;

/// A release waiting for its due time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PendingRelease<I> {
    pub instance: I,
    pub due: Duration,
}

/// What one drain of [`DeferredReleases`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drained<I> {
    /// Live instances whose due time has passed.
    pub due: Vec<I>,
    /// Instances found destroyed, due or not.
    pub dead: Vec<I>,
}

/// Releases requested with a delay, drained once per tick.
#[derive(Debug)]
pub struct DeferredReleases<I> {
    pending: Vec<PendingRelease<I>>,
}

impl<I: Copy + PartialEq> DeferredReleases<I> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue `instance` for release at absolute time `due`.
    pub fn schedule(&mut self, instance: I, due: Duration) {
        self.pending.push(PendingRelease { instance, due });
    }

    /// Remove every entry that is due at `now` or whose instance is no
    /// longer live. Entries not yet due stay for a later tick.
    pub fn take_due(&mut self, now: Duration, mut is_live: impl FnMut(I) -> bool) -> Drained<I> {
        let mut due = Vec::new();
        let mut dead = Vec::new();
        self.pending.retain(|entry| {
            if !is_live(entry.instance) {
                dead.push(entry.instance);
                return false;
            }
            if entry.due <= now {
                due.push(entry.instance);
                return false;
            }
            true
        });
        Drained { due, dead }
    }

    pub fn contains(&self, instance: I) -> bool {
        self.pending.iter().any(|entry| entry.instance == instance)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRelease<I>> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<I: Copy + PartialEq> Default for DeferredReleases<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_only_due_entries_are_taken() {
        let mut queue = DeferredReleases::new();
        queue.schedule(1u32, secs(2));
        queue.schedule(2u32, secs(5));

        assert!(queue.take_due(secs(1), |_| true).due.is_empty());
        assert_eq!(queue.take_due(secs(2), |_| true).due, vec![1]);
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(2));
        assert_eq!(queue.take_due(secs(10), |_| true).due, vec![2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dead_entries_are_dropped_and_reported() {
        let mut queue = DeferredReleases::new();
        queue.schedule(1u32, secs(0));
        queue.schedule(2u32, secs(100));
        queue.schedule(3u32, secs(100));

        let drained = queue.take_due(secs(1), |i| i == 3);
        assert!(drained.due.is_empty());
        assert_eq!(drained.dead, vec![1, 2]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_duplicate_schedules_are_both_kept() {
        let mut queue = DeferredReleases::new();
        queue.schedule(7u32, secs(1));
        queue.schedule(7u32, secs(3));

        assert_eq!(queue.take_due(secs(1), |_| true).due, vec![7]);
        assert_eq!(queue.len(), 1);
    }
}
