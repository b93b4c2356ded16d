//! The reactor owns every desktop, monitor and client.
//!
//! It takes events from the display server and bound commands, updates the
//! model, and sends the resulting geometry, stacking and focus requests to the
//! [`Backend`]. All mutation happens on the reactor's thread, one event at a
//! time, so each event leaves the tiling partition intact before the next one
//! is looked at.

mod display_topology;
mod error;
mod events;
mod focus;

#[cfg(test)]
mod testing;

use std::sync::Arc;

pub use error::ReactorError;
use error::LogFailure;
use events::command::CommandEventHandler;
use events::input::InputEventHandler;
use events::window::WindowEventHandler;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::actor::{self, wm_controller::WmCmd};
use crate::common::config::Config;
use crate::layout_engine::{LayoutCommand, arrange};
use crate::model::client::WindowId;
use crate::model::desktop::Desktop;
use crate::model::geometry::Rect;
use crate::model::monitor::Output;
use crate::model::state::WmState;
use crate::model::status::Status;
use crate::sys::backend::{Backend, DesktopHints};
use crate::sys::hotkey::{ButtonBinding, Hotkey};
use crate::ui::status_line::StatusLine;

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

/// What the display server tells us about a window asking to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowInfo {
    pub window: WindowId,
    pub geometry: Rect,
    pub title: String,
    pub class: String,
    pub transient_for: Option<WindowId>,
    /// Dialogs, splash screens and fixed-size windows.
    pub wants_floating: bool,
    /// Desktop the client asked for through `_NET_WM_DESKTOP`.
    pub desktop: Option<usize>,
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Layout(LayoutCommand),
    Wm(WmCmd),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The set of physical outputs changed. Always the first event on startup.
    OutputsChanged(Vec<Output>),

    /// A top-level window asked to be mapped.
    WindowCreated(WindowInfo),
    WindowDestroyed(WindowId),
    /// The client unmapped its window itself.
    WindowWithdrawn(WindowId),

    PointerEntered(WindowId),
    /// `window` is `None` for clicks on the root window.
    ButtonPressed {
        window: Option<WindowId>,
        binding: ButtonBinding,
    },
    KeyPressed(Hotkey),

    /// A window asked to be moved or resized.
    GeometryChangeRequested {
        window: WindowId,
        rect: Rect,
        border: i32,
    },
    TitleChanged(WindowId, String),
    UrgencyChanged(WindowId, bool),

    Command(Command),
}

pub struct Reactor {
    pub(crate) config: Arc<Config>,
    pub(crate) state: WmState,
    pub(crate) backend: Box<dyn Backend>,
    status: Option<StatusLine>,
    last_hints: Option<DesktopHints>,
    running: bool,
}

impl Reactor {
    pub fn new(config: Arc<Config>, backend: Box<dyn Backend>, status: Option<StatusLine>) -> Reactor {
        let settings = &config.settings;
        let desktops = (0..settings.desktops)
            .map(|_| Desktop::new(settings.default_mode, settings.default_direction, settings.gap))
            .collect();
        Reactor {
            state: WmState::new(desktops),
            config,
            backend,
            status,
            last_hints: None,
            running: true,
        }
    }

    pub fn state(&self) -> &WmState { &self.state }

    pub fn is_running(&self) -> bool { self.running }

    /// Handles events until the channel closes or a `quit` command arrives.
    pub fn run(mut self, mut events: Receiver) {
        while let Some((span, event)) = events.blocking_recv() {
            let _guard = span.enter();
            self.handle_event(event);
            if !self.running {
                break;
            }
        }
        debug!("reactor stopped");
    }

    fn log_event(&self, event: &Event) {
        match event {
            Event::PointerEntered(..) | Event::TitleChanged(..) => trace!(?event, "Event"),
            _ => debug!(?event, "Event"),
        }
    }

    #[instrument(name = "reactor::handle_event", skip(self), fields(event=?event))]
    pub fn handle_event(&mut self, event: Event) {
        self.log_event(&event);
        match event {
            Event::OutputsChanged(outputs) => self.on_outputs_changed(outputs),
            Event::WindowCreated(info) => WindowEventHandler::handle_window_created(self, info),
            Event::WindowDestroyed(window) | Event::WindowWithdrawn(window) => {
                WindowEventHandler::handle_window_gone(self, window)
            }
            Event::GeometryChangeRequested { window, rect, border } => {
                WindowEventHandler::handle_geometry_request(self, window, rect, border)
            }
            Event::TitleChanged(window, title) => {
                WindowEventHandler::handle_title_changed(self, window, title)
            }
            Event::UrgencyChanged(window, urgent) => {
                WindowEventHandler::handle_urgency_changed(self, window, urgent)
            }
            Event::PointerEntered(window) => InputEventHandler::handle_pointer_entered(self, window),
            Event::ButtonPressed { window, binding } => {
                InputEventHandler::handle_button_pressed(self, window, binding)
            }
            Event::KeyPressed(hotkey) => InputEventHandler::handle_key_pressed(self, hotkey),
            Event::Command(command) => self.handle_command(command),
        }
        self.publish();
    }

    pub(crate) fn handle_command(&mut self, command: Command) {
        match command {
            Command::Layout(cmd) => CommandEventHandler::handle_command_layout(self, cmd),
            Command::Wm(WmCmd::Exec(cmd)) => actor::wm_controller::exec_cmd(&cmd),
            Command::Wm(WmCmd::Quit) => {
                debug!("quit requested");
                self.running = false;
            }
        }
    }

    /// Recomputes and sends the geometry and stacking of `desktop`, if it is
    /// on a monitor.
    pub(crate) fn relayout(&mut self, desktop: usize) {
        let Some(monitor) = self.state.monitor_showing(desktop) else {
            return;
        };
        let arrangement = arrange(
            &self.state.desktops[desktop],
            &self.state.monitors()[monitor],
            self.config.settings.border_width,
        );
        trace!(desktop, monitor, ?arrangement, "relayout");
        for placement in &arrangement.placements {
            if let Some(client) = self.state.desktops[desktop].client_mut(placement.window) {
                client.geometry = placement.rect;
            }
            self.backend
                .move_resize(placement.window, placement.rect, placement.border)
                .or_log("move_resize");
        }
        for window in arrangement.raise {
            self.backend.raise(window).or_log("raise");
        }
    }

    /// Maps every window of `desktop`, current first.
    pub(crate) fn map_desktop(&mut self, desktop: usize) {
        let d = &self.state.desktops[desktop];
        let current = d.current();
        let others: Vec<WindowId> =
            d.clients().iter().map(|c| c.window).filter(|&w| Some(w) != current).collect();
        for window in current.into_iter().chain(others) {
            self.backend.map(window).or_log("map");
        }
    }

    /// Unmaps every window of `desktop`, current last.
    pub(crate) fn unmap_desktop(&mut self, desktop: usize) {
        let d = &self.state.desktops[desktop];
        let current = d.current();
        let others: Vec<WindowId> =
            d.clients().iter().map(|c| c.window).filter(|&w| Some(w) != current).collect();
        for window in others.into_iter().chain(current) {
            self.backend.unmap(window).or_log("unmap");
        }
    }

    fn publish(&mut self) {
        if let Some(status) = self.status.as_mut() {
            status.publish(&Status::capture(&self.state));
        }
        let hints = DesktopHints {
            desktops: self.state.desktops.len(),
            current: self.state.selected_desktop().unwrap_or(0),
            clients: self
                .state
                .desktops
                .iter()
                .flat_map(|d| d.clients().iter().map(|c| c.window))
                .collect(),
        };
        if self.last_hints.as_ref() != Some(&hints) {
            self.backend.publish_hints(&hints).or_log("publish_hints");
            self.last_hints = Some(hints);
        }
        self.backend.flush().or_log("flush");
    }
}
