use serde::Serialize;

use crate::layout_engine::Direction;
use crate::model::desktop::Mode;
use crate::model::state::WmState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DesktopStatus {
    pub id: usize,
    pub tiled: usize,
    pub mode: Mode,
    pub direction: Direction,
    /// Shown on the selected monitor.
    pub focused: bool,
    /// Shown on any monitor.
    pub visible: bool,
    pub urgent: bool,
}

/// Read-only snapshot of the state an external status bar cares about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Status {
    pub desktops: Vec<DesktopStatus>,
    pub title: String,
}

impl Status {
    pub fn capture(state: &WmState) -> Status {
        let selected = state.selected_desktop();
        let desktops = state
            .desktops
            .iter()
            .enumerate()
            .map(|(id, d)| DesktopStatus {
                id,
                tiled: d.tiled_count(),
                mode: d.mode,
                direction: d.direction,
                focused: selected == Some(id),
                visible: state.is_displayed(id),
                urgent: d.is_urgent(),
            })
            .collect();
        let title = selected
            .and_then(|d| state.desktops[d].current_client())
            .map(|c| c.title.clone())
            .unwrap_or_default();
        Status { desktops, title }
    }

    /// `id:tiled:mode:direction:focused:urgent` for each desktop, then the
    /// focused window's title.
    pub fn to_line(&self) -> String {
        let mut line = self
            .desktops
            .iter()
            .map(|d| {
                format!(
                    "{}:{}:{}:{}:{}:{}",
                    d.id,
                    d.tiled,
                    d.mode,
                    d.direction,
                    d.focused as u8,
                    d.urgent as u8
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        line.push(' ');
        line.push_str(&self.title);
        line
    }
}
