use tracing::{debug, info, warn};

use crate::actor::reactor::Reactor;
use crate::actor::reactor::error::{LogFailure, ReactorError};
use crate::layout_engine::{Direction, LayoutCommand};
use crate::model::state::Shown;

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_command_layout(reactor: &mut Reactor, cmd: LayoutCommand) {
        info!(?cmd);
        let (Some(monitor), Some(desktop)) =
            (reactor.state.selected(), reactor.state.selected_desktop())
        else {
            warn!(?cmd, "{}", ReactorError::NoMonitor);
            return;
        };
        let desktops = reactor.state.desktops.len();
        let current = reactor.state.desktops[desktop].current();

        match cmd {
            LayoutCommand::SwitchDesktop(target) => reactor.switch_desktop(monitor, target),
            LayoutCommand::NextDesktop => reactor.switch_desktop(monitor, (desktop + 1) % desktops),
            LayoutCommand::PrevDesktop => {
                reactor.switch_desktop(monitor, (desktop + desktops - 1) % desktops)
            }
            LayoutCommand::LastDesktop => {
                let last = reactor.state.monitors()[monitor].last_desktop;
                reactor.switch_desktop(monitor, last)
            }
            LayoutCommand::MoveClientToDesktop(target) => {
                let follow = reactor.config.settings.follow_moved_client;
                reactor.move_client_to_desktop(target, follow)
            }
            LayoutCommand::FollowClientToDesktop(target) => {
                reactor.move_client_to_desktop(target, true)
            }
            LayoutCommand::SetMode(mode) => {
                reactor.state.desktops[desktop].mode = mode;
                reactor.relayout(desktop);
                reactor.focus(desktop, current);
            }
            LayoutCommand::SetDirection(direction) => {
                reactor.state.desktops[desktop].direction = direction;
            }
            LayoutCommand::MoveFocus(direction) => {
                let Some(window) = current else { return };
                if let Some(next) = reactor.state.desktops[desktop].neighbor(window, direction) {
                    reactor.focus(desktop, Some(next));
                }
            }
            LayoutCommand::MoveClient(direction) => {
                let Some(window) = current else { return };
                if reactor.state.desktops[desktop].swap_with_neighbor(window, direction).is_some() {
                    reactor.relayout(desktop);
                }
            }
            LayoutCommand::Grow(edge) => Self::resize(reactor, desktop, edge, true),
            LayoutCommand::Shrink(edge) => Self::resize(reactor, desktop, edge, false),
            LayoutCommand::FocusNext | LayoutCommand::FocusPrev => {
                let Some(window) = current else { return };
                let forward = cmd == LayoutCommand::FocusNext;
                if let Some(next) = reactor.state.desktops[desktop].cycle(window, forward) {
                    reactor.focus(desktop, Some(next));
                }
            }
            LayoutCommand::FocusLast => {
                if let Some(prev) = reactor.state.desktops[desktop].prevfocus() {
                    reactor.focus(desktop, Some(prev));
                }
            }
            LayoutCommand::ToggleFloating => {
                let Some(window) = current else { return };
                let d = &mut reactor.state.desktops[desktop];
                let Some(floating) = d.client(window).map(|c| c.floating) else { return };
                let anchor = d.prevfocus();
                if d.set_floating(window, !floating, anchor) {
                    reactor.relayout(desktop);
                    reactor.restack(desktop);
                }
            }
            LayoutCommand::IncreaseGap | LayoutCommand::DecreaseGap => {
                let settings = &reactor.config.settings;
                let step = if cmd == LayoutCommand::IncreaseGap {
                    settings.gap_step
                } else {
                    -settings.gap_step
                };
                let d = &mut reactor.state.desktops[desktop];
                let gap = (d.gap() + step).clamp(settings.min_gap, settings.max_gap);
                if gap != d.gap() {
                    d.set_gap(gap);
                    reactor.relayout(desktop);
                }
            }
            LayoutCommand::CloseClient => {
                if let Some(window) = current {
                    reactor.backend.close(window).or_log("close");
                }
            }
            LayoutCommand::KillClient => {
                if let Some(window) = current {
                    reactor.backend.kill(window).or_log("kill");
                }
            }
            LayoutCommand::FocusNextMonitor | LayoutCommand::FocusPrevMonitor => {
                let count = reactor.state.monitors().len();
                let next = if cmd == LayoutCommand::FocusNextMonitor {
                    (monitor + 1) % count
                } else {
                    (monitor + count - 1) % count
                };
                reactor.select_monitor(next);
            }
        }
    }

    fn resize(reactor: &mut Reactor, desktop: usize, edge: Direction, grow: bool) {
        let step = reactor.config.settings.resize_step;
        let d = &mut reactor.state.desktops[desktop];
        let Some(window) = d.current() else { return };
        if d.resize(window, edge, grow, step) {
            reactor.relayout(desktop);
        } else {
            debug!(%window, ?edge, grow, "nothing to resize against");
        }
    }
}

impl Reactor {
    /// Shows `target` on `monitor`. A desktop already shown on another
    /// monitor trades places with this monitor's desktop.
    pub(crate) fn switch_desktop(&mut self, monitor: usize, target: usize) {
        let desktops = self.state.desktops.len();
        if target >= desktops {
            warn!("{}", ReactorError::DesktopOutOfRange { desktop: target, desktops });
            return;
        }
        match self.state.show(monitor, target) {
            Shown::Unchanged => return,
            Shown::Swapped { other, previous } => {
                debug!(monitor, other, target, previous, "swapping desktops");
                self.relayout(target);
                self.relayout(previous);
                if let Some(window) = self.state.desktops[previous].current() {
                    self.paint_border(previous, window);
                }
            }
            Shown::Replaced { previous } => {
                debug!(monitor, target, previous, "switching desktop");
                self.relayout(target);
                self.map_desktop(target);
                self.unmap_desktop(previous);
            }
        }
        let current = self.state.desktops[target].current();
        self.focus(target, current);
    }

    /// Moves the selected desktop's current client to `target`. With
    /// `follow`, the selected monitor switches to `target` afterwards.
    pub(crate) fn move_client_to_desktop(&mut self, target: usize, follow: bool) {
        let (Some(monitor), Some(source)) = (self.state.selected(), self.state.selected_desktop())
        else {
            return;
        };
        let desktops = self.state.desktops.len();
        if target >= desktops {
            warn!("{}", ReactorError::DesktopOutOfRange { desktop: target, desktops });
            return;
        }
        if target == source {
            return;
        }
        let Some(window) = self.state.desktops[source].current() else {
            return;
        };

        let anchor = self.insertion_anchor(target);
        let Some(client) = self.state.desktops[source].remove(window) else {
            return;
        };
        debug!(%window, source, target, "moving client");
        let target_shown = self.state.is_displayed(target);
        if !target_shown && !follow {
            self.backend.unmap(window).or_log("unmap");
        }
        self.state.desktops[target].insert(client, anchor);
        self.state.desktops[target].set_current(Some(window));

        self.relayout(source);
        self.relayout(target);
        if follow {
            self.switch_desktop(monitor, target);
        } else {
            let current = self.state.desktops[source].current();
            self.focus(source, current);
            self.paint_border(target, window);
        }
    }
}
