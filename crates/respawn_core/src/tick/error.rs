use thiserror::Error;

/// Errors from installing or removing the tick driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TickDriverError {
    #[error("tick driver '{name}' is already registered")]
    AlreadyRegistered { name: String },

    #[error("tick driver '{name}' is not registered")]
    NotRegistered { name: String },

    #[error("tick target is borrowed elsewhere; install and teardown must not run inside a tick")]
    ContextBusy,
}
