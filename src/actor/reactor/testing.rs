use std::sync::Arc;

use parking_lot::Mutex;

use super::{Event, Reactor, WindowInfo};
use crate::common::config::Config;
use crate::model::client::WindowId;
use crate::model::geometry::Rect;
use crate::model::monitor::{Output, OutputId};
use crate::sys::backend::{Backend, BackendError, ColorRole, DesktopHints};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Manage(WindowId),
    MoveResize(WindowId, Rect, i32),
    ConfirmGeometry(WindowId, Rect),
    Raise(WindowId),
    Map(WindowId),
    Unmap(WindowId),
    SetInputFocus(Option<WindowId>),
    SetBorder(WindowId, ColorRole),
    Close(WindowId),
    Kill(WindowId),
    PublishHints(DesktopHints),
}

/// A backend that records every request it receives.
#[derive(Clone, Default)]
pub struct Recorder {
    pub requests: Arc<Mutex<Vec<Request>>>,
    pub pointer: Arc<Mutex<(i32, i32)>>,
    /// Windows whose `manage` call fails.
    pub broken: Arc<Mutex<Vec<WindowId>>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<Request> { std::mem::take(&mut *self.requests.lock()) }

    fn push(&self, request: Request) -> Result<(), BackendError> {
        self.requests.lock().push(request);
        Ok(())
    }
}

impl Backend for Recorder {
    fn manage(&mut self, window: WindowId, _border: i32) -> Result<(), BackendError> {
        if self.broken.lock().contains(&window) {
            return Err(BackendError::WindowGone(window));
        }
        self.push(Request::Manage(window))
    }

    fn move_resize(&mut self, window: WindowId, rect: Rect, border: i32) -> Result<(), BackendError> {
        self.push(Request::MoveResize(window, rect, border))
    }

    fn confirm_geometry(&mut self, window: WindowId, rect: Rect, _border: i32) -> Result<(), BackendError> {
        self.push(Request::ConfirmGeometry(window, rect))
    }

    fn raise(&mut self, window: WindowId) -> Result<(), BackendError> { self.push(Request::Raise(window)) }


    fn map(&mut self, window: WindowId) -> Result<(), BackendError> { self.push(Request::Map(window)) }

    fn unmap(&mut self, window: WindowId) -> Result<(), BackendError> { self.push(Request::Unmap(window)) }

    fn set_input_focus(&mut self, window: Option<WindowId>) -> Result<(), BackendError> {
        self.push(Request::SetInputFocus(window))
    }

    fn set_border(&mut self, window: WindowId, role: ColorRole) -> Result<(), BackendError> {
        self.push(Request::SetBorder(window, role))
    }

    fn close(&mut self, window: WindowId) -> Result<(), BackendError> { self.push(Request::Close(window)) }

    fn kill(&mut self, window: WindowId) -> Result<(), BackendError> { self.push(Request::Kill(window)) }

    fn pointer(&mut self) -> Result<(i32, i32), BackendError> { Ok(*self.pointer.lock()) }

    fn publish_hints(&mut self, hints: &DesktopHints) -> Result<(), BackendError> {
        self.push(Request::PublishHints(hints.clone()))
    }

    fn flush(&mut self) -> Result<(), BackendError> { Ok(()) }
}

pub fn output(id: u32, x: i32) -> Output {
    Output {
        id: OutputId(id),
        rect: Rect { x, y: 0, w: 1000, h: 1000 },
    }
}

pub fn window(id: u32) -> WindowInfo {
    WindowInfo {
        window: WindowId(id),
        geometry: Rect { x: 10, y: 10, w: 300, h: 200 },
        title: format!("window {id}"),
        class: "Term".into(),
        ..Default::default()
    }
}

/// A reactor with no gaps or borders, so tiled geometry is the raw percentage
/// rectangle scaled to a 1000x1000 monitor.
pub fn reactor_with(config: Config, outputs: &[Output]) -> (Reactor, Recorder) {
    let recorder = Recorder::default();
    let mut reactor = Reactor::new(Arc::new(config), Box::new(recorder.clone()), None);
    reactor.handle_event(Event::OutputsChanged(outputs.to_vec()));
    recorder.take();
    (reactor, recorder)
}

pub fn plain_config() -> Config {
    let mut config = Config::default();
    config.settings.gap = 0;
    config.settings.border_width = 0;
    config
}

pub fn reactor(outputs: &[Output]) -> (Reactor, Recorder) { reactor_with(plain_config(), outputs) }
