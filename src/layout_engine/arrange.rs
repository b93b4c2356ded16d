//! Turns a desktop's model state into pixel geometry and stacking order for
//! the monitor it is shown on.

use crate::model::client::{Client, Gaps, WindowId};
use crate::model::desktop::{Desktop, Mode};
use crate::model::geometry::Rect;
use crate::model::monitor::Monitor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub window: WindowId,
    pub rect: Rect,
    pub border: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arrangement {
    pub placements: Vec<Placement>,
    /// Windows to raise, bottom-most first.
    pub raise: Vec<WindowId>,
}

pub fn arrange(desktop: &Desktop, monitor: &Monitor, border: i32) -> Arrangement {
    let usable = monitor.usable();
    let mut arrangement = Arrangement::default();

    for client in desktop.clients() {
        let (rect, border) = if !client.is_tiled() {
            (floating_geometry(client, &monitor.rect), border)
        } else {
            match desktop.mode {
                Mode::Tile => (client.tiled_geometry(&usable, border), border),
                Mode::Float => (floating_geometry(client, &monitor.rect), border),
                Mode::Monocle => (Gaps::uniform(desktop.gap()).apply(&usable, border), border),
                Mode::Video => (monitor.rect, 0),
            }
        };
        arrangement.placements.push(Placement { window: client.window, rect, border });
    }

    arrangement.raise = stacking_order(desktop);
    arrangement
}

/// Windows to raise, bottom-most first: in stacked modes the current tiled
/// client, then every floating client with the focused one on top.
pub fn stacking_order(desktop: &Desktop) -> Vec<WindowId> {
    let mut raise = Vec::new();
    if desktop.mode.is_stacked() {
        if let Some(c) = desktop.current_client().filter(|c| c.is_tiled()) {
            raise.push(c.window);
        }
    }
    let floating = desktop.clients().iter().filter(|c| !c.is_tiled());
    let (focused, others): (Vec<&Client>, Vec<&Client>) =
        floating.partition(|c| Some(c.window) == desktop.current());
    raise.extend(others.iter().chain(focused.iter()).map(|c| c.window));
    raise
}

/// Floating clients keep their own geometry, pulled back onto the monitor
/// when it would be off screen.
fn floating_geometry(client: &Client, bounds: &Rect) -> Rect {
    let geometry = &client.geometry;
    if geometry.intersects(bounds) && geometry.w <= bounds.w && geometry.h <= bounds.h {
        geometry.clamped_into(bounds)
    } else {
        geometry.centered_in(bounds)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::Direction;
    use crate::model::monitor::{Output, OutputId, Strut};

    fn monitor() -> Monitor {
        let output = Output { id: OutputId(0), rect: Rect::new(0, 0, 1000, 600) };
        Monitor::new(output, Strut { top: 20, bottom: 0 }, 0)
    }

    fn desktop(mode: Mode) -> Desktop {
        let mut d = Desktop::new(mode, Direction::Right, 10);
        d.insert(Client::new(WindowId(1), Rect::default()), None);
        d.insert(Client::new(WindowId(2), Rect::default()), Some(WindowId(1)));
        let mut float = Client::new(WindowId(3), Rect::new(-50, 100, 200, 100));
        float.floating = true;
        d.insert(float, None);
        d.set_current(Some(WindowId(1)));
        d
    }

    fn rects(a: &Arrangement) -> Vec<(u32, Rect, i32)> {
        a.placements.iter().map(|p| (p.window.0, p.rect, p.border)).collect()
    }

    #[test]
    fn tile_mode_follows_the_partition() {
        let a = arrange(&desktop(Mode::Tile), &monitor(), 1);
        assert_eq!(
            rects(&a),
            vec![
                (1, Rect::new(10, 30, 483, 558), 1),
                (2, Rect::new(505, 30, 483, 558), 1),
                (3, Rect::new(0, 100, 200, 100), 1),
            ]
        );
        assert_eq!(a.raise, vec![WindowId(3)]);
    }

    #[test]
    fn monocle_stacks_tiled_clients_with_current_on_top() {
        let a = arrange(&desktop(Mode::Monocle), &monitor(), 1);
        assert_eq!(a.placements[0].rect, Rect::new(10, 30, 978, 558));
        assert_eq!(a.placements[1].rect, a.placements[0].rect);
        assert_eq!(a.raise, vec![WindowId(1), WindowId(3)]);
    }

    #[test]
    fn video_covers_the_whole_output_without_borders() {
        let a = arrange(&desktop(Mode::Video), &monitor(), 1);
        assert_eq!(a.placements[1], Placement {
            window: WindowId(2),
            rect: Rect::new(0, 0, 1000, 600),
            border: 0,
        });
    }

    #[test]
    fn focused_floating_client_is_raised_last() {
        let mut d = desktop(Mode::Tile);
        let mut float = Client::new(WindowId(4), Rect::new(10, 10, 50, 50));
        float.transient = true;
        d.insert(float, None);
        d.set_current(Some(WindowId(3)));
        let a = arrange(&d, &monitor(), 1);
        assert_eq!(a.raise, vec![WindowId(4), WindowId(3)]);
    }
}
