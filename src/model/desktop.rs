use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, error, warn};

use crate::layout_engine::neighbors::touching;
use crate::layout_engine::reclaim::reclaim;
use crate::layout_engine::resize::resize;
use crate::layout_engine::split::split;
use crate::layout_engine::{Direction, LayoutError};
use crate::model::client::{Client, WindowId};
use crate::model::geometry::{FULL, PercentRect};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    #[default]
    Tile,
    Monocle,
    Video,
    Float,
}

impl Mode {
    /// Whether tiled clients are stacked on top of each other.
    pub fn is_stacked(self) -> bool { matches!(self, Mode::Monocle | Mode::Video) }
}

/// One virtual workspace: its clients, layout settings and focus history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Desktop {
    pub mode: Mode,
    pub direction: Direction,
    gap: i32,
    clients: Vec<Client>,
    current: Option<WindowId>,
    prevfocus: Option<WindowId>,
    tiled_count: usize,
}

impl Desktop {
    pub fn new(mode: Mode, direction: Direction, gap: i32) -> Desktop {
        Desktop {
            mode,
            direction,
            gap,
            clients: Vec::new(),
            current: None,
            prevfocus: None,
            tiled_count: 0,
        }
    }

    pub fn clients(&self) -> &[Client] { &self.clients }

    pub fn is_empty(&self) -> bool { self.clients.is_empty() }

    pub fn contains(&self, window: WindowId) -> bool { self.index_of(window).is_some() }

    pub fn index_of(&self, window: WindowId) -> Option<usize> {
        self.clients.iter().position(|c| c.window == window)
    }

    pub fn client(&self, window: WindowId) -> Option<&Client> {
        self.clients.iter().find(|c| c.window == window)
    }

    pub fn client_mut(&mut self, window: WindowId) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.window == window)
    }

    pub fn current(&self) -> Option<WindowId> { self.current }

    pub fn prevfocus(&self) -> Option<WindowId> { self.prevfocus }

    pub fn current_client(&self) -> Option<&Client> { self.current.and_then(|w| self.client(w)) }

    pub fn tiled_count(&self) -> usize { self.tiled_count }

    pub fn gap(&self) -> i32 { self.gap }

    pub fn is_urgent(&self) -> bool { self.clients.iter().any(|c| c.urgent) }

    pub fn set_gap(&mut self, gap: i32) {
        self.gap = gap;
        self.refresh_gaps();
    }

    pub fn first_tiled(&self) -> Option<WindowId> {
        self.clients.iter().find(|c| c.is_tiled()).map(|c| c.window)
    }

    /// Adds `client` to the end of the sequence. Tiled clients split `anchor`
    /// (or the first tiled client if `anchor` is missing or not tiled) along
    /// this desktop's direction.
    pub fn insert(&mut self, mut client: Client, anchor: Option<WindowId>) {
        if client.is_tiled() && !self.place_tiled(&mut client, anchor) {
            warn!(window = %client.window, "no room to split, floating the client instead");
            client.floating = true;
        }
        debug!(window = %client.window, percent = ?client.percent, tiled = client.is_tiled(), "inserted");
        self.clients.push(client);
        self.refresh_gaps();
        self.debug_check();
    }

    fn place_tiled(&mut self, client: &mut Client, anchor: Option<WindowId>) -> bool {
        if self.tiled_count == 0 {
            client.percent = PercentRect::FULL;
            self.tiled_count += 1;
            return true;
        }
        let anchor = anchor
            .and_then(|w| self.index_of(w))
            .filter(|&idx| self.clients[idx].is_tiled())
            .or_else(|| self.clients.iter().position(|c| c.is_tiled()));
        let Some(anchor) = anchor else {
            return false;
        };
        let Some(rect) = split(&mut self.clients[anchor].percent, self.direction) else {
            return false;
        };
        client.percent = rect;
        self.tiled_count += 1;
        true
    }

    /// Detaches `window`, giving its space to its neighbors and repairing the
    /// focus pointers.
    pub fn remove(&mut self, window: WindowId) -> Option<Client> {
        let idx = self.index_of(window)?;
        let client = self.clients.remove(idx);
        if client.is_tiled() {
            self.tiled_count -= 1;
            self.release_space(&client.percent);
        }

        if self.current == Some(window) {
            self.current = self.prevfocus.or_else(|| self.clients.first().map(|c| c.window));
            self.prevfocus = self.history_candidate();
        } else if self.prevfocus == Some(window) {
            self.prevfocus = self.history_candidate();
        }
        self.refresh_gaps();
        self.debug_check();
        Some(client)
    }

    fn release_space(&mut self, vacated: &PercentRect) {
        if self.tiled_count == 0 {
            return;
        }
        if self.tiled_count == 1 {
            if let Some(last) = self.clients.iter_mut().find(|c| c.is_tiled()) {
                last.percent = PercentRect::FULL;
            }
            return;
        }
        if reclaim(&mut self.clients, vacated).is_none() {
            warn!(?vacated, "{}, retiling", LayoutError::Unreclaimed(*vacated));
            self.retile();
        }
    }

    /// Rebuilds the partition from scratch. Each tiled client, in sequence
    /// order, splits the largest rectangle placed so far along its longer side.
    fn retile(&mut self) {
        let mut placed: Vec<usize> = Vec::new();
        for idx in 0..self.clients.len() {
            if !self.clients[idx].is_tiled() {
                continue;
            }
            let Some(&largest) = placed.iter().max_by_key(|&&i| self.clients[i].percent.area()) else {
                self.clients[idx].percent = PercentRect::FULL;
                placed.push(idx);
                continue;
            };
            let rect = &mut self.clients[largest].percent;
            let direction = if rect.w >= rect.h { Direction::Right } else { Direction::Bottom };
            match split(rect, direction) {
                Some(half) => {
                    self.clients[idx].percent = half;
                    placed.push(idx);
                }
                None => {
                    error!(window = %self.clients[idx].window, "no room left while retiling");
                    self.clients[idx].floating = true;
                    self.tiled_count -= 1;
                }
            }
        }
    }

    /// The client just before `current` in sequence order, used as the new
    /// one-deep history after the old entry disappeared.
    fn history_candidate(&self) -> Option<WindowId> {
        let idx = self.index_of(self.current?)?;
        let len = self.clients.len();
        (len > 1).then(|| self.clients[(idx + len - 1) % len].window)
    }

    /// Makes `window` current and returns the previous current. Focusing the
    /// previous focus swaps the two. `None` clears both pointers.
    pub fn set_current(&mut self, window: Option<WindowId>) -> Option<WindowId> {
        let old = self.current;
        match window {
            None => {
                self.current = None;
                self.prevfocus = None;
            }
            Some(w) if Some(w) == old || !self.contains(w) => {}
            Some(w) => {
                self.prevfocus = old;
                self.current = Some(w);
            }
        }
        old
    }

    /// Switches a client between floating and tiled. Returns whether its
    /// state changed. Transients never tile.
    pub fn set_floating(&mut self, window: WindowId, floating: bool, anchor: Option<WindowId>) -> bool {
        let Some(idx) = self.index_of(window) else {
            return false;
        };
        let client = &self.clients[idx];
        if client.transient || client.floating == floating {
            return false;
        }
        if floating {
            let vacated = client.percent;
            self.clients[idx].floating = true;
            self.tiled_count -= 1;
            self.release_space(&vacated);
        } else {
            let mut client = self.clients.remove(idx);
            client.floating = false;
            let placed = self.place_tiled(&mut client, anchor);
            client.floating = !placed;
            self.clients.insert(idx, client);
            if !placed {
                return false;
            }
        }
        self.refresh_gaps();
        self.debug_check();
        true
    }

    /// Resize cascade on `window`'s `edge`.
    pub fn resize(&mut self, window: WindowId, edge: Direction, grow: bool, amount: i32) -> bool {
        let Some(idx) = self.index_of(window).filter(|&i| self.clients[i].is_tiled()) else {
            return false;
        };
        let moved = resize(&mut self.clients, idx, edge, grow, amount);
        if moved {
            self.refresh_gaps();
            self.debug_check();
        }
        moved
    }

    /// The nearest tiled client beyond `window`'s `direction` edge.
    pub fn neighbor(&self, window: WindowId, direction: Direction) -> Option<WindowId> {
        let client = self.client(window).filter(|c| c.is_tiled())?;
        touching(&self.clients, &client.percent, Some(window), direction, false)
            .first()
            .map(|&idx| self.clients[idx].window)
    }

    /// Exchanges `window`'s rectangle with that of its nearest neighbor in
    /// `direction`. Returns the neighbor.
    pub fn swap_with_neighbor(&mut self, window: WindowId, direction: Direction) -> Option<WindowId> {
        let other = self.neighbor(window, direction)?;
        let a = self.index_of(window)?;
        let b = self.index_of(other)?;
        let rect = self.clients[a].percent;
        self.clients[a].percent = self.clients[b].percent;
        self.clients[b].percent = rect;
        self.refresh_gaps();
        Some(other)
    }

    /// Next (or previous) client in sequence order after `window`, wrapping.
    pub fn cycle(&self, window: WindowId, forward: bool) -> Option<WindowId> {
        let idx = self.index_of(window)?;
        let len = self.clients.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Some(self.clients[next].window).filter(|&w| w != window)
    }

    fn refresh_gaps(&mut self) {
        let gap = self.gap;
        for client in self.clients.iter_mut().filter(|c| c.is_tiled()) {
            client.refresh_gaps(gap);
        }
    }

    /// Verifies that the tiled clients exactly cover the usable area.
    pub fn check_partition(&self) -> Result<(), LayoutError> {
        let tiled: Vec<&Client> = self.clients.iter().filter(|c| c.is_tiled()).collect();
        if tiled.len() != self.tiled_count {
            return Err(LayoutError::TiledCount { counted: tiled.len(), recorded: self.tiled_count });
        }
        if tiled.is_empty() {
            return Ok(());
        }
        for (i, a) in tiled.iter().enumerate() {
            if a.percent.is_degenerate() || !a.percent.is_within_bounds() {
                return Err(LayoutError::OutOfBounds(a.window, a.percent));
            }
            if let Some(b) = tiled[i + 1..].iter().find(|b| a.percent.overlaps(&b.percent)) {
                return Err(LayoutError::Overlap(a.window, b.window));
            }
        }
        let covered: i64 = tiled.iter().map(|c| c.percent.area()).sum();
        let full = FULL as i64 * FULL as i64;
        if covered != full {
            return Err(LayoutError::Uncovered { covered, full });
        }
        Ok(())
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            let checked = self.check_partition();
            debug_assert!(checked.is_ok(), "partition broken: {checked:?}");
        }
    }
}
