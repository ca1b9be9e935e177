use super::{TickDriverError, TickSource};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Something the driver ticks once per host tick and tears down at the end
/// of the session.
pub trait TickTarget {
    fn tick(&mut self);

    fn teardown(&mut self);

    /// Claim the target for one driver. Returns false if some driver
    /// already holds it.
    fn attach(&mut self) -> bool;

    fn detach(&mut self);
}

enum DriverState<H> {
    Unregistered,
    Registered(H),
}

/// Two-state hook into a [`TickSource`].
///
/// `install` moves the driver from unregistered to registered. It is
/// rejected when this driver is already registered or when another driver
/// holds the target, so a target is never ticked twice per host tick.
/// `teardown` removes the callback, tears the target down and frees it.
pub struct TickDriver<S: TickSource> {
    name: String,
    state: DriverState<S::Handle>,
}

impl<S: TickSource> TickDriver<S> {
    pub const DEFAULT_NAME: &'static str = "respawn";

    pub fn new() -> Self {
        Self::named(Self::DEFAULT_NAME)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: DriverState::Unregistered,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_registered(&self) -> bool {
        matches!(self.state, DriverState::Registered(_))
    }

    pub fn handle(&self) -> Option<S::Handle> {
        match self.state {
            DriverState::Registered(handle) => Some(handle),
            DriverState::Unregistered => None,
        }
    }

    /// Register a callback that ticks `target` on every host tick.
    ///
    /// If the target is mutably borrowed when the host ticks (re-entrant
    /// call), that tick is skipped with a warning.
    pub fn install<T>(&mut self, source: &mut S, target: Rc<RefCell<T>>) -> Result<S::Handle, TickDriverError>
    where
        T: TickTarget + 'static,
    {
        if self.is_registered() {
            return Err(TickDriverError::AlreadyRegistered {
                name: self.name.clone(),
            });
        }
        let attached = target
            .try_borrow_mut()
            .map_err(|_| TickDriverError::ContextBusy)?
            .attach();
        if !attached {
            warn!(driver = %self.name, "tick target is already driven by another driver");
            return Err(TickDriverError::AlreadyRegistered {
                name: self.name.clone(),
            });
        }

        let name = self.name.clone();
        let handle = source.register_tick(
            &self.name,
            Box::new(move || match target.try_borrow_mut() {
                Ok(mut target) => target.tick(),
                Err(_) => warn!(driver = %name, "tick target is busy, skipping tick"),
            }),
        );
        debug!(driver = %self.name, ?handle, "tick driver registered");
        self.state = DriverState::Registered(handle);
        Ok(handle)
    }

    /// Unregister the callback and tear `target` down.
    pub fn teardown<T: TickTarget>(&mut self, source: &mut S, target: &RefCell<T>) -> Result<(), TickDriverError> {
        let DriverState::Registered(handle) = self.state else {
            return Err(TickDriverError::NotRegistered {
                name: self.name.clone(),
            });
        };
        let mut target = target
            .try_borrow_mut()
            .map_err(|_| TickDriverError::ContextBusy)?;

        if !source.unregister_tick(handle) {
            warn!(driver = %self.name, ?handle, "tick source no longer knew the driver's handle");
        }
        self.state = DriverState::Unregistered;
        target.teardown();
        target.detach();
        debug!(driver = %self.name, "tick driver unregistered");
        Ok(())
    }
}

impl<S: TickSource> Default for TickDriver<S> {
    fn default() -> Self {
        Self::new()
    }
}
