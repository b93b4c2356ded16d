//! The X11 side of the manager, built on x11rb.
//!
//! [`X11`] owns the connection. It hands out an [`X11Backend`] for the
//! reactor and an [`EventPump`] that runs on its own thread, turning X events
//! into reactor events.

mod backend;
mod event_pump;
mod keyboard;
mod properties;

use std::sync::Arc;

use anyhow::{Context, anyhow};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    AtomEnum, ChangeWindowAttributesAux, ConnectionExt as _, CreateWindowAux, EventMask,
    MapState, PropMode, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

pub use backend::X11Backend;
pub use event_pump::EventPump;
pub use keyboard::Keyboard;

use crate::actor::reactor::{self, WindowInfo};
use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::model::geometry::Rect;
use crate::model::monitor::{Output, OutputId};
use crate::sys::backend::BackendError;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        WM_STATE,
        UTF8_STRING,
        _NET_SUPPORTED,
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_NAME,
        _NET_ACTIVE_WINDOW,
        _NET_CURRENT_DESKTOP,
        _NET_NUMBER_OF_DESKTOPS,
        _NET_CLIENT_LIST,
        _NET_WM_DESKTOP,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DIALOG,
        _NET_WM_WINDOW_TYPE_SPLASH,
    }
}

/// Unmaps we issued ourselves, per window, so the pump can tell them apart
/// from clients withdrawing.
pub(crate) type PendingUnmaps = Arc<Mutex<HashMap<Window, u32>>>;

pub struct X11 {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    pending_unmaps: PendingUnmaps,
}

impl X11 {
    /// Connects to `$DISPLAY` and takes over window management on the
    /// default screen. Fails if another window manager is running.
    pub fn connect() -> anyhow::Result<X11> {
        let (conn, screen_num) = x11rb::connect(None).context("could not connect to the X server")?;
        let root = conn.setup().roots[screen_num].root;
        let atoms = Atoms::new(&conn)?.reply()?;

        let mask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
            | EventMask::PROPERTY_CHANGE;
        conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().event_mask(mask))?
            .check()
            .map_err(|err| anyhow!("another window manager is already running ({err})"))?;

        match conn.randr_query_version(1, 5)?.reply() {
            Ok(version) => {
                debug!(major = version.major_version, minor = version.minor_version, "randr");
                conn.randr_select_input(
                    root,
                    randr::NotifyMask::SCREEN_CHANGE
                        | randr::NotifyMask::OUTPUT_CHANGE
                        | randr::NotifyMask::CRTC_CHANGE,
                )?;
            }
            Err(err) => warn!(%err, "randr unavailable, using the root window as the only output"),
        }

        info!(root, "connected to the X server");
        Ok(X11 {
            conn: Arc::new(conn),
            root,
            atoms,
            pending_unmaps: PendingUnmaps::default(),
        })
    }

    /// Advertises the EWMH features we support on a check window.
    pub fn publish_support(&self, name: &str) -> Result<(), BackendError> {
        let conn = &*self.conn;
        let check = conn.generate_id()?;
        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check,
            self.root,
            -1,
            -1,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &CreateWindowAux::new(),
        )?;
        for window in [check, self.root] {
            conn.change_property32(
                PropMode::REPLACE,
                window,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                AtomEnum::WINDOW,
                &[check],
            )?;
        }
        conn.change_property8(
            PropMode::REPLACE,
            check,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            name.as_bytes(),
        )?;
        let supported = [
            self.atoms._NET_SUPPORTED,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms._NET_WM_NAME,
            self.atoms._NET_ACTIVE_WINDOW,
            self.atoms._NET_CURRENT_DESKTOP,
            self.atoms._NET_NUMBER_OF_DESKTOPS,
            self.atoms._NET_CLIENT_LIST,
            self.atoms._NET_WM_DESKTOP,
            self.atoms._NET_WM_WINDOW_TYPE,
            self.atoms._NET_WM_WINDOW_TYPE_DIALOG,
        ];
        conn.change_property32(
            PropMode::REPLACE,
            self.root,
            self.atoms._NET_SUPPORTED,
            AtomEnum::ATOM,
            &supported,
        )?;
        conn.flush()?;
        Ok(())
    }

    pub fn outputs(&self) -> Vec<Output> { query_outputs(&self.conn, self.root) }

    /// Windows that were already mapped before we started.
    pub fn existing_windows(&self) -> Result<Vec<WindowInfo>, BackendError> {
        let tree = self.conn.query_tree(self.root)?.reply()?;
        let mut windows = Vec::new();
        for window in tree.children {
            let attributes = self.conn.get_window_attributes(window)?.reply()?;
            if attributes.override_redirect || attributes.map_state != MapState::VIEWABLE {
                continue;
            }
            match properties::window_info(&self.conn, &self.atoms, window) {
                Ok(info) => windows.push(info),
                Err(err) => warn!(window, %err, "could not adopt window"),
            }
        }
        Ok(windows)
    }

    pub fn backend(&self, config: &Config) -> Result<X11Backend, BackendError> {
        X11Backend::new(
            self.conn.clone(),
            self.root,
            self.atoms,
            self.pending_unmaps.clone(),
            config,
        )
    }

    /// Grabs the configured keys and returns the pump that feeds `events`.
    pub fn event_pump(&self, config: &Config, events: reactor::Sender) -> anyhow::Result<EventPump> {
        let hotkeys = config.keys.iter().map(|(hotkey, _)| *hotkey).collect();
        EventPump::new(
            self.conn.clone(),
            self.root,
            self.atoms,
            self.pending_unmaps.clone(),
            hotkeys,
            events,
        )
        .context("could not set up key bindings")
    }
}

/// RandR monitors, or the root window when RandR has nothing to say.
pub(crate) fn query_outputs(conn: &RustConnection, root: Window) -> Vec<Output> {
    let monitors = conn
        .randr_get_monitors(root, true)
        .map_err(BackendError::from)
        .and_then(|cookie| Ok(cookie.reply()?));
    match monitors {
        Ok(reply) if !reply.monitors.is_empty() => {
            return reply
                .monitors
                .iter()
                .map(|m| Output {
                    id: OutputId(m.name),
                    rect: Rect {
                        x: m.x.into(),
                        y: m.y.into(),
                        w: m.width.into(),
                        h: m.height.into(),
                    },
                })
                .collect();
        }
        Ok(_) => debug!("randr reported no monitors"),
        Err(err) => debug!(%err, "randr monitor query failed"),
    }
    match conn.get_geometry(root).map_err(BackendError::from).and_then(|c| Ok(c.reply()?)) {
        Ok(geometry) => vec![Output {
            id: OutputId(root),
            rect: Rect {
                x: 0,
                y: 0,
                w: geometry.width.into(),
                h: geometry.height.into(),
            },
        }],
        Err(err) => {
            warn!(%err, "could not read the root window geometry");
            Vec::new()
        }
    }
}
