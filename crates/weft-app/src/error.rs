use std::fmt;

use weft_core::ReactiveError;
use weft_dom::HostError;

/// Failure while mounting or updating an application.
#[derive(Debug)]
pub enum AppError {
    /// The host rejected an operation, including an unknown container selector.
    Host(HostError),
    /// The render computation failed or exceeded the update depth.
    Reactive(ReactiveError),
    /// A render was triggered while the host was already borrowed.
    HostBusy,
}

impl AppError {
    /// Whether mounting failed because the container selector matched nothing.
    pub fn is_container_not_found(&self) -> bool {
        matches!(self, AppError::Host(HostError::ContainerNotFound { .. }))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Host(err) => write!(f, "host error: {err}"),
            AppError::Reactive(err) => write!(f, "render failed: {err}"),
            AppError::HostBusy => f.write_str("host is borrowed elsewhere; cannot render"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Host(err) => Some(err),
            AppError::Reactive(err) => Some(err),
            AppError::HostBusy => None,
        }
    }
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        AppError::Host(err)
    }
}

impl From<ReactiveError> for AppError {
    fn from(err: ReactiveError) -> Self {
        AppError::Reactive(err)
    }
}
