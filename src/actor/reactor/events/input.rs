use tracing::trace;

use crate::actor::reactor::Reactor;
use crate::model::client::WindowId;
use crate::sys::hotkey::{ButtonBinding, Hotkey};

pub struct InputEventHandler;

impl InputEventHandler {
    pub fn handle_pointer_entered(reactor: &mut Reactor, window: WindowId) {
        if !reactor.config.settings.focus_follows_mouse {
            return;
        }
        Self::focus_window(reactor, window);
    }

    pub fn handle_button_pressed(
        reactor: &mut Reactor,
        window: Option<WindowId>,
        binding: ButtonBinding,
    ) {
        if let Some(window) = window {
            if reactor.config.settings.click_to_focus {
                Self::focus_window(reactor, window);
            }
        }
        match reactor.config.command_for_button(&binding).cloned() {
            Some(command) => reactor.handle_command(command),
            None => trace!(%binding, "unbound button"),
        }
    }

    pub fn handle_key_pressed(reactor: &mut Reactor, hotkey: Hotkey) {
        match reactor.config.command_for_key(&hotkey).cloned() {
            Some(command) => reactor.handle_command(command),
            None => trace!(%hotkey, "unbound key"),
        }
    }

    /// Focuses a visible window, selecting its monitor first.
    fn focus_window(reactor: &mut Reactor, window: WindowId) {
        let Some(desktop) = reactor.state.desktop_of(window) else {
            return;
        };
        let Some(monitor) = reactor.state.monitor_showing(desktop) else {
            return;
        };
        if reactor.state.selected() == Some(monitor)
            && reactor.state.desktops[desktop].current() == Some(window)
        {
            return;
        }
        reactor.select_monitor(monitor);
        reactor.focus(desktop, Some(window));
    }
}
