//! Reading ICCCM and EWMH properties off client windows.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt as _, GetPropertyReply, Window};

use super::Atoms;
use crate::actor::reactor::WindowInfo;
use crate::model::client::WindowId;
use crate::model::geometry::Rect;
use crate::sys::backend::BackendError;

const URGENCY_HINT: u32 = 1 << 8;
const P_MIN_SIZE: u32 = 1 << 4;
const P_MAX_SIZE: u32 = 1 << 5;
/// `_NET_WM_DESKTOP` value for windows on every desktop.
const ALL_DESKTOPS: u32 = 0xffff_ffff;

fn property(
    conn: &impl Connection,
    window: Window,
    property: impl Into<Atom>,
    type_: impl Into<Atom>,
    length: u32,
) -> Result<GetPropertyReply, BackendError> {
    Ok(conn.get_property(false, window, property, type_, 0, length)?.reply()?)
}

fn words(reply: &GetPropertyReply) -> Vec<u32> {
    reply.value32().map(|v| v.collect()).unwrap_or_default()
}

pub(crate) fn window_info(
    conn: &impl Connection,
    atoms: &Atoms,
    window: Window,
) -> Result<WindowInfo, BackendError> {
    let geometry = conn.get_geometry(window)?.reply()?;
    let transient_for = words(&property(conn, window, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW, 1)?)
        .first()
        .copied()
        .filter(|&parent| parent != x11rb::NONE && parent != window)
        .map(WindowId);
    let types = words(&property(conn, window, atoms._NET_WM_WINDOW_TYPE, AtomEnum::ATOM, 32)?);
    let dialog = types
        .iter()
        .any(|&t| t == atoms._NET_WM_WINDOW_TYPE_DIALOG || t == atoms._NET_WM_WINDOW_TYPE_SPLASH);
    let desktop = words(&property(conn, window, atoms._NET_WM_DESKTOP, AtomEnum::CARDINAL, 1)?)
        .first()
        .copied()
        .filter(|&d| d != ALL_DESKTOPS)
        .map(|d| d as usize);

    Ok(WindowInfo {
        window: WindowId(window),
        geometry: Rect {
            x: geometry.x.into(),
            y: geometry.y.into(),
            w: geometry.width.into(),
            h: geometry.height.into(),
        },
        title: title(conn, atoms, window)?,
        class: class(conn, window)?,
        transient_for,
        wants_floating: dialog || has_fixed_size(conn, window)?,
        desktop,
        urgent: is_urgent(conn, window)?,
    })
}

/// `_NET_WM_NAME`, falling back to `WM_NAME`.
pub(crate) fn title(conn: &impl Connection, atoms: &Atoms, window: Window) -> Result<String, BackendError> {
    let net = property(conn, window, atoms._NET_WM_NAME, atoms.UTF8_STRING, 256)?;
    if !net.value.is_empty() {
        return Ok(String::from_utf8_lossy(&net.value).into_owned());
    }
    let legacy = property(conn, window, AtomEnum::WM_NAME, AtomEnum::ANY, 256)?;
    Ok(String::from_utf8_lossy(&legacy.value).into_owned())
}

/// The class half of `WM_CLASS` (instance and class, NUL separated).
fn class(conn: &impl Connection, window: Window) -> Result<String, BackendError> {
    let reply = property(conn, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 64)?;
    let class = reply.value.split(|&b| b == 0).nth(1).unwrap_or_default();
    Ok(String::from_utf8_lossy(class).into_owned())
}

pub(crate) fn is_urgent(conn: &impl Connection, window: Window) -> Result<bool, BackendError> {
    let hints = words(&property(conn, window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, 9)?);
    Ok(hints.first().is_some_and(|flags| flags & URGENCY_HINT != 0))
}

/// Windows whose minimum and maximum sizes agree cannot be tiled sensibly.
fn has_fixed_size(conn: &impl Connection, window: Window) -> Result<bool, BackendError> {
    let hints = words(&property(
        conn,
        window,
        AtomEnum::WM_NORMAL_HINTS,
        AtomEnum::WM_SIZE_HINTS,
        18,
    )?);
    let [flags, _, _, _, _, min_w, min_h, max_w, max_h, ..] = hints[..] else {
        return Ok(false);
    };
    Ok(flags & P_MIN_SIZE != 0
        && flags & P_MAX_SIZE != 0
        && min_w > 0
        && min_w == max_w
        && min_h == max_h)
}

/// Whether `window` lists `protocol` in `WM_PROTOCOLS`.
pub(crate) fn supports_protocol(
    conn: &impl Connection,
    atoms: &Atoms,
    window: Window,
    protocol: Atom,
) -> Result<bool, BackendError> {
    let protocols = words(&property(conn, window, atoms.WM_PROTOCOLS, AtomEnum::ATOM, 32)?);
    Ok(protocols.contains(&protocol))
}
