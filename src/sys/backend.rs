//! The boundary between the window manager core and the display server.

use thiserror::Error;

use crate::model::client::WindowId;
use crate::model::geometry::Rect;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("connection to the display server failed: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),
    #[error("display server request failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
    #[error("could not allocate a resource id: {0}")]
    Id(#[from] x11rb::errors::ReplyOrIdError),
    #[error("window {0} no longer exists")]
    WindowGone(WindowId),
}

/// Which configured color a window border should take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Focused,
    Unfocused,
    Urgent,
}

/// Desktop-wide hints published for pagers and status bars.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesktopHints {
    pub desktops: usize,
    pub current: usize,
    pub clients: Vec<WindowId>,
}

/// Requests the core makes of the display server.
///
/// Failures only affect the window involved; callers log them and carry on.
pub trait Backend {
    /// Starts tracking a newly managed window (event selection, button grabs).
    fn manage(&mut self, window: WindowId, border: i32) -> Result<(), BackendError>;
    fn move_resize(&mut self, window: WindowId, rect: Rect, border: i32) -> Result<(), BackendError>;
    /// Tells a window its geometry without changing it, answering a request
    /// that the layout overrides.
    fn confirm_geometry(&mut self, window: WindowId, rect: Rect, border: i32) -> Result<(), BackendError>;
    fn raise(&mut self, window: WindowId) -> Result<(), BackendError>;
    fn map(&mut self, window: WindowId) -> Result<(), BackendError>;
    fn unmap(&mut self, window: WindowId) -> Result<(), BackendError>;
    /// Gives input focus to `window` and announces it as the active window.
    /// `None` returns focus to the root.
    fn set_input_focus(&mut self, window: Option<WindowId>) -> Result<(), BackendError>;
    fn set_border(&mut self, window: WindowId, role: ColorRole) -> Result<(), BackendError>;
    /// Asks the client to close through the window protocol, if it supports that,
    /// otherwise kills it.
    fn close(&mut self, window: WindowId) -> Result<(), BackendError>;
    fn kill(&mut self, window: WindowId) -> Result<(), BackendError>;
    fn pointer(&mut self) -> Result<(i32, i32), BackendError>;
    fn publish_hints(&mut self, hints: &DesktopHints) -> Result<(), BackendError>;
    fn flush(&mut self) -> Result<(), BackendError>;
}
