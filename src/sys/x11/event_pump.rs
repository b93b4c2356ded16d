use std::sync::Arc;

use tracing::{debug, error, instrument, trace, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event as XEvent;
use x11rb::protocol::xproto::{
    Allow, AtomEnum, ConfigWindow, ConfigureRequestEvent, ConnectionExt as _, Mapping,
    NotifyDetail, NotifyMode, Property, Window,
};
use x11rb::rust_connection::RustConnection;

use super::keyboard::Keyboard;
use super::{Atoms, PendingUnmaps, properties, query_outputs};
use crate::actor::reactor::{self, Command, Event};
use crate::layout_engine::LayoutCommand;
use crate::model::client::WindowId;
use crate::model::geometry::Rect;
use crate::sys::backend::BackendError;
use crate::sys::hotkey::{ButtonBinding, Hotkey};

/// Reads X events on its own thread and forwards them to the reactor.
pub struct EventPump {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    pending_unmaps: PendingUnmaps,
    keyboard: Keyboard,
    hotkeys: Vec<Hotkey>,
    events: reactor::Sender,
}

impl EventPump {
    pub(super) fn new(
        conn: Arc<RustConnection>,
        root: Window,
        atoms: Atoms,
        pending_unmaps: PendingUnmaps,
        hotkeys: Vec<Hotkey>,
        events: reactor::Sender,
    ) -> Result<EventPump, BackendError> {
        let keyboard = Keyboard::load(&*conn)?;
        keyboard.grab_keys(&*conn, root, &hotkeys)?;
        conn.flush()?;
        Ok(EventPump {
            conn,
            root,
            atoms,
            pending_unmaps,
            keyboard,
            hotkeys,
            events,
        })
    }

    /// Runs until the connection drops or the reactor goes away.
    pub fn run(mut self) {
        loop {
            let event = match self.conn.wait_for_event() {
                Ok(event) => event,
                Err(err) => {
                    error!(%err, "lost the connection to the X server");
                    return;
                }
            };
            match self.translate(event) {
                Ok(Some(event)) => {
                    if self.events.try_send(event).is_err() {
                        debug!("reactor stopped, event pump exiting");
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(%err, "could not handle X event"),
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn translate(&mut self, event: XEvent) -> Result<Option<Event>, BackendError> {
        let event = match event {
            XEvent::MapRequest(e) => {
                let attributes = self.conn.get_window_attributes(e.window)?.reply()?;
                if attributes.override_redirect {
                    self.conn.map_window(e.window)?;
                    self.conn.flush()?;
                    return Ok(None);
                }
                Event::WindowCreated(properties::window_info(&*self.conn, &self.atoms, e.window)?)
            }
            XEvent::UnmapNotify(e) => {
                if self.take_pending_unmap(e.window) {
                    trace!(window = e.window, "ignoring our own unmap");
                    return Ok(None);
                }
                Event::WindowWithdrawn(WindowId(e.window))
            }
            XEvent::DestroyNotify(e) => {
                self.pending_unmaps.lock().remove(&e.window);
                Event::WindowDestroyed(WindowId(e.window))
            }
            XEvent::EnterNotify(e) => {
                if e.mode != NotifyMode::NORMAL || e.detail == NotifyDetail::INFERIOR || e.event == self.root {
                    return Ok(None);
                }
                Event::PointerEntered(WindowId(e.event))
            }
            XEvent::ButtonPress(e) => {
                self.conn.allow_events(Allow::REPLAY_POINTER, x11rb::CURRENT_TIME)?;
                self.conn.flush()?;
                Event::ButtonPressed {
                    window: (e.event != self.root).then_some(WindowId(e.event)),
                    binding: ButtonBinding {
                        modifiers: self.keyboard.modifiers(u16::from(e.state)),
                        button: e.detail,
                    },
                }
            }
            XEvent::KeyPress(e) => {
                let Some(key) = self.keyboard.keysym(e.detail) else {
                    return Ok(None);
                };
                Event::KeyPressed(Hotkey::new(self.keyboard.modifiers(u16::from(e.state)), key))
            }
            XEvent::ConfigureRequest(e) => self.geometry_request(&e)?,
            XEvent::PropertyNotify(e) => {
                if e.state != Property::NEW_VALUE {
                    return Ok(None);
                }
                if e.atom == self.atoms._NET_WM_NAME || e.atom == u32::from(AtomEnum::WM_NAME) {
                    let title = properties::title(&*self.conn, &self.atoms, e.window)?;
                    Event::TitleChanged(WindowId(e.window), title)
                } else if e.atom == u32::from(AtomEnum::WM_HINTS) {
                    let urgent = properties::is_urgent(&*self.conn, e.window)?;
                    Event::UrgencyChanged(WindowId(e.window), urgent)
                } else {
                    return Ok(None);
                }
            }
            XEvent::ClientMessage(e) if e.type_ == self.atoms._NET_CURRENT_DESKTOP => {
                let desktop = e.data.as_data32()[0] as usize;
                Event::Command(Command::Layout(LayoutCommand::SwitchDesktop(desktop)))
            }
            XEvent::MappingNotify(e) => {
                if e.request == Mapping::KEYBOARD || e.request == Mapping::MODIFIER {
                    self.keyboard = Keyboard::load(&*self.conn)?;
                    self.keyboard.grab_keys(&*self.conn, self.root, &self.hotkeys)?;
                    self.conn.flush()?;
                }
                return Ok(None);
            }
            XEvent::RandrScreenChangeNotify(_) | XEvent::RandrNotify(_) => {
                Event::OutputsChanged(query_outputs(&self.conn, self.root))
            }
            XEvent::Error(err) => {
                debug!(?err, "X error");
                return Ok(None);
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Fills in the fields the client left out with its current geometry.
    fn geometry_request(&self, e: &ConfigureRequestEvent) -> Result<Event, BackendError> {
        let current = self.conn.get_geometry(e.window)?.reply()?;
        let has = |field: ConfigWindow| e.value_mask.contains(field);
        let pick = |field, requested: i32, current: i32| if has(field) { requested } else { current };
        Ok(Event::GeometryChangeRequested {
            window: WindowId(e.window),
            rect: Rect {
                x: pick(ConfigWindow::X, e.x.into(), current.x.into()),
                y: pick(ConfigWindow::Y, e.y.into(), current.y.into()),
                w: pick(ConfigWindow::WIDTH, e.width.into(), current.width.into()),
                h: pick(ConfigWindow::HEIGHT, e.height.into(), current.height.into()),
            },
            border: pick(
                ConfigWindow::BORDER_WIDTH,
                e.border_width.into(),
                current.border_width.into(),
            ),
        })
    }

    fn take_pending_unmap(&self, window: Window) -> bool {
        let mut pending = self.pending_unmaps.lock();
        match pending.get_mut(&window) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                pending.remove(&window);
                true
            }
            None => false,
        }
    }
}
