//! Programmer-contract violations.
//!
//! The engine has no recoverable errors: every gesture resolves to commit or
//! cancel and absent collaborators are no-ops. What remains are misuses of the
//! API, which are fatal in debug builds and logged in release builds.

use std::fmt;

/// A misuse of the presentation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractViolation {
    /// Something tried to add a subview to the presentation container.
    ContainerSubview,

    /// Surface style was applied before the presented view was loaded.
    StyleBeforeViewLoaded,

    /// An interactive session was started while another one was alive.
    InteractionReentered,
}

impl ContractViolation {
    /// Log the violation and abort in debug builds.
    #[track_caller]
    pub fn report(self) {
        tracing::error!(violation = ?self, "{}", self);
        debug_assert!(false, "{}", self);
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::ContainerSubview => {
                write!(f, "Subviews must not be added to the presentation container")
            }
            ContractViolation::StyleBeforeViewLoaded => {
                write!(f, "Style applied before the presented view was loaded")
            }
            ContractViolation::InteractionReentered => {
                write!(f, "Interactive transition started while another one is active")
            }
        }
    }
}

impl std::error::Error for ContractViolation {}
