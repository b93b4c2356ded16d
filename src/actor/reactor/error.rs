use thiserror::Error;
use tracing::warn;

use crate::model::client::WindowId;
use crate::sys::backend::BackendError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReactorError {
    #[error("window {0} is not managed")]
    UnknownWindow(WindowId),
    #[error("desktop {desktop} out of range (have {desktops})")]
    DesktopOutOfRange { desktop: usize, desktops: usize },
    #[error("no monitor is selected")]
    NoMonitor,
}

/// Logs a failed request to the display server instead of propagating it.
/// Such failures only concern one window and never stop the reactor.
pub(crate) trait LogFailure<T> {
    fn or_log(self, request: &'static str) -> Option<T>;
}

impl<T> LogFailure<T> for Result<T, BackendError> {
    fn or_log(self, request: &'static str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(request, %err, "display server request failed");
                None
            }
        }
    }
}
