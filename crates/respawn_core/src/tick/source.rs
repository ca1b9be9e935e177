use std::fmt;

/// Callback invoked once per host tick.
pub type TickCallback = Box<dyn FnMut()>;

/// Periodic scheduler a driver can hook into.
pub trait TickSource {
    type Handle: Copy + Eq + fmt::Debug;

    fn register_tick(&mut self, name: &str, callback: TickCallback) -> Self::Handle;

    /// Returns false if `handle` was not registered.
    fn unregister_tick(&mut self, handle: Self::Handle) -> bool;
}

/// Handle assigned to each system in a [`TickLoop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u32);

impl TickHandle {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the raw index backing this handle.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct TickSystem {
    handle: TickHandle,
    name: String,
    callback: TickCallback,
}

/// Ordered list of named per-tick systems.
///
/// `register_tick` inserts at the front so pool housekeeping runs before
/// gameplay systems that were already in the loop.
pub struct TickLoop {
    systems: Vec<TickSystem>,
    next_handle: u32,
    ticks: u64,
}

impl TickLoop {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            next_handle: 0,
            ticks: 0,
        }
    }

    /// Insert a system at `index` (clamped to the end of the loop).
    pub fn insert(&mut self, index: usize, name: impl Into<String>, callback: TickCallback) -> TickHandle {
        let handle = TickHandle::new(self.next_handle);
        self.next_handle += 1;
        let index = index.min(self.systems.len());
        self.systems.insert(
            index,
            TickSystem {
                handle,
                name: name.into(),
                callback,
            },
        );
        handle
    }

    /// Append a system to the end of the loop.
    pub fn push(&mut self, name: impl Into<String>, callback: TickCallback) -> TickHandle {
        self.insert(self.systems.len(), name, callback)
    }

    pub fn remove(&mut self, handle: TickHandle) -> bool {
        match self.systems.iter().position(|s| s.handle == handle) {
            Some(index) => {
                self.systems.remove(index);
                true
            }
            None => false,
        }
    }

    /// Run every system once, in order.
    pub fn run_once(&mut self) {
        for system in &mut self.systems {
            (system.callback)();
        }
        self.ticks += 1;
    }

    pub fn contains(&self, handle: TickHandle) -> bool {
        self.systems.iter().any(|s| s.handle == handle)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Number of completed `run_once` calls.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TickLoop {
    type Handle = TickHandle;

    fn register_tick(&mut self, name: &str, callback: TickCallback) -> TickHandle {
        self.insert(0, name, callback)
    }

    fn unregister_tick(&mut self, handle: TickHandle) -> bool {
        self.remove(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> TickCallback {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn test_run_once_respects_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tick_loop = TickLoop::new();
        tick_loop.push("physics", recorder(&log, "physics"));
        tick_loop.push("render", recorder(&log, "render"));
        tick_loop.register_tick("pools", recorder(&log, "pools"));

        tick_loop.run_once();
        assert_eq!(*log.borrow(), vec!["pools", "physics", "render"]);
        assert_eq!(tick_loop.names().collect::<Vec<_>>(), vec!["pools", "physics", "render"]);
        assert_eq!(tick_loop.ticks(), 1);
    }

    #[test]
    fn test_unregister_removes_only_that_system() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tick_loop = TickLoop::new();
        let a = tick_loop.push("a", recorder(&log, "a"));
        let b = tick_loop.push("b", recorder(&log, "b"));

        assert!(tick_loop.unregister_tick(a));
        assert!(!tick_loop.unregister_tick(a));
        assert!(tick_loop.contains(b));

        tick_loop.run_once();
        assert_eq!(*log.borrow(), vec!["b"]);
    }

    #[test]
    fn test_insert_index_is_clamped() {
        let mut tick_loop = TickLoop::new();
        tick_loop.push("first", Box::new(|| {}));
        tick_loop.insert(99, "last", Box::new(|| {}));
        assert_eq!(tick_loop.names().last(), Some("last"));
    }
}
