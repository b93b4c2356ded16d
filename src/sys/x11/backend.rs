use std::sync::Arc;

use tracing::{debug, trace};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ClientMessageData, ClientMessageEvent,
    ConfigureNotifyEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, GrabMode,
    InputFocus, ModMask, PropMode, StackMode, Window, CLIENT_MESSAGE_EVENT, CONFIGURE_NOTIFY_EVENT,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::keyboard::Keyboard;
use super::properties::supports_protocol;
use super::{Atoms, PendingUnmaps};
use crate::common::config::{ColorSettings, Config};
use crate::model::client::WindowId;
use crate::model::geometry::Rect;
use crate::sys::backend::{Backend, BackendError, ColorRole, DesktopHints};
use crate::sys::hotkey::ButtonBinding;

const NORMAL_STATE: u32 = 1;
const ICONIC_STATE: u32 = 3;

pub struct X11Backend {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    pending_unmaps: PendingUnmaps,
    keyboard: Keyboard,
    colors: ColorSettings,
    buttons: Vec<ButtonBinding>,
    click_to_focus: bool,
}

impl X11Backend {
    pub(super) fn new(
        conn: Arc<RustConnection>,
        root: Window,
        atoms: Atoms,
        pending_unmaps: PendingUnmaps,
        config: &Config,
    ) -> Result<X11Backend, BackendError> {
        let keyboard = Keyboard::load(&*conn)?;
        Ok(X11Backend {
            conn,
            root,
            atoms,
            pending_unmaps,
            keyboard,
            colors: config.settings.colors.clone(),
            buttons: config.buttons.iter().map(|(binding, _)| *binding).collect(),
            click_to_focus: config.settings.click_to_focus,
        })
    }

    fn set_wm_state(&self, window: Window, state: u32) -> Result<(), BackendError> {
        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.WM_STATE,
            &[state, x11rb::NONE],
        )?;
        Ok(())
    }

    fn grab_buttons(&self, window: Window) -> Result<(), BackendError> {
        if self.click_to_focus {
            // Synchronous so the click can be replayed to the client.
            self.conn.grab_button(
                false,
                window,
                EventMask::BUTTON_PRESS,
                GrabMode::SYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                ButtonIndex::ANY,
                ModMask::ANY,
            )?;
        }
        for binding in &self.buttons {
            for modifiers in self.keyboard.lock_variants(binding.modifiers) {
                self.conn.grab_button(
                    false,
                    window,
                    EventMask::BUTTON_PRESS,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    ButtonIndex::from(binding.button),
                    modifiers,
                )?;
            }
        }
        Ok(())
    }
}

fn dimension(value: i32) -> u32 { value.max(1) as u32 }

impl Backend for X11Backend {
    fn manage(&mut self, window: WindowId, border: i32) -> Result<(), BackendError> {
        let aux = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::ENTER_WINDOW | EventMask::PROPERTY_CHANGE)
            .border_pixel(self.colors.unfocused.0);
        self.conn.change_window_attributes(window.0, &aux)?.check()?;
        self.conn.configure_window(
            window.0,
            &ConfigureWindowAux::new().border_width(border.max(0) as u32),
        )?;
        self.grab_buttons(window.0)
    }

    fn move_resize(&mut self, window: WindowId, rect: Rect, border: i32) -> Result<(), BackendError> {
        trace!(%window, ?rect, border, "configure");
        let aux = ConfigureWindowAux::new()
            .x(rect.x)
            .y(rect.y)
            .width(dimension(rect.w))
            .height(dimension(rect.h))
            .border_width(border.max(0) as u32);
        self.conn.configure_window(window.0, &aux)?;
        Ok(())
    }

    fn confirm_geometry(&mut self, window: WindowId, rect: Rect, border: i32) -> Result<(), BackendError> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window.0,
            window: window.0,
            above_sibling: x11rb::NONE,
            x: rect.x as i16,
            y: rect.y as i16,
            width: dimension(rect.w) as u16,
            height: dimension(rect.h) as u16,
            border_width: border.max(0) as u16,
            override_redirect: false,
        };
        self.conn.send_event(false, window.0, EventMask::STRUCTURE_NOTIFY, event)?;
        Ok(())
    }

    fn raise(&mut self, window: WindowId) -> Result<(), BackendError> {
        self.conn
            .configure_window(window.0, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        Ok(())
    }

    fn map(&mut self, window: WindowId) -> Result<(), BackendError> {
        self.conn.map_window(window.0)?;
        self.set_wm_state(window.0, NORMAL_STATE)
    }

    fn unmap(&mut self, window: WindowId) -> Result<(), BackendError> {
        *self.pending_unmaps.lock().entry(window.0).or_default() += 1;
        self.conn.unmap_window(window.0)?;
        self.set_wm_state(window.0, ICONIC_STATE)
    }

    fn set_input_focus(&mut self, window: Option<WindowId>) -> Result<(), BackendError> {
        match window {
            Some(window) => {
                self.conn.set_input_focus(InputFocus::POINTER_ROOT, window.0, x11rb::CURRENT_TIME)?;
                self.conn.change_property32(
                    PropMode::REPLACE,
                    self.root,
                    self.atoms._NET_ACTIVE_WINDOW,
                    AtomEnum::WINDOW,
                    &[window.0],
                )?;
            }
            None => {
                self.conn.set_input_focus(InputFocus::POINTER_ROOT, self.root, x11rb::CURRENT_TIME)?;
                self.conn.delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW)?;
            }
        }
        Ok(())
    }

    fn set_border(&mut self, window: WindowId, role: ColorRole) -> Result<(), BackendError> {
        let color = match role {
            ColorRole::Focused => self.colors.focused,
            ColorRole::Unfocused => self.colors.unfocused,
            ColorRole::Urgent => self.colors.urgent,
        };
        self.conn
            .change_window_attributes(window.0, &ChangeWindowAttributesAux::new().border_pixel(color.0))?;
        Ok(())
    }

    fn close(&mut self, window: WindowId) -> Result<(), BackendError> {
        if !supports_protocol(&*self.conn, &self.atoms, window.0, self.atoms.WM_DELETE_WINDOW)? {
            debug!(%window, "no WM_DELETE_WINDOW support, killing");
            return self.kill(window);
        }
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: window.0,
            type_: self.atoms.WM_PROTOCOLS,
            data: ClientMessageData::from([self.atoms.WM_DELETE_WINDOW, x11rb::CURRENT_TIME, 0, 0, 0]),
        };
        self.conn.send_event(false, window.0, EventMask::NO_EVENT, event)?;
        Ok(())
    }

    fn kill(&mut self, window: WindowId) -> Result<(), BackendError> {
        self.conn.kill_client(window.0)?;
        Ok(())
    }

    fn pointer(&mut self) -> Result<(i32, i32), BackendError> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok((reply.root_x.into(), reply.root_y.into()))
    }

    fn publish_hints(&mut self, hints: &DesktopHints) -> Result<(), BackendError> {
        let clients: Vec<u32> = hints.clients.iter().map(|w| w.0).collect();
        let cardinals = [
            (self.atoms._NET_NUMBER_OF_DESKTOPS, hints.desktops as u32),
            (self.atoms._NET_CURRENT_DESKTOP, hints.current as u32),
        ];
        for (atom, value) in cardinals {
            self.conn
                .change_property32(PropMode::REPLACE, self.root, atom, AtomEnum::CARDINAL, &[value])?;
        }
        self.conn.change_property32(
            PropMode::REPLACE,
            self.root,
            self.atoms._NET_CLIENT_LIST,
            AtomEnum::WINDOW,
            &clients,
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        self.conn.flush()?;
        Ok(())
    }
}
