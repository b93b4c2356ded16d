use tracing::{debug, trace};

use super::Direction;
use super::neighbors::{touching, within_span};
use super::reclaim::stranded;
use crate::model::client::Client;
use crate::model::geometry::PercentRect;

/// Smallest extent, in percentage points, a tiled client may be squeezed to.
pub const MIN_EXTENT: i32 = 1;

/// Grows or shrinks `clients[idx]` by `amount` percentage points on `edge`,
/// moving the shared edge of the neighbors that exactly cover that side.
///
/// When nothing covers `edge` (typically because it lies on the monitor
/// boundary) the opposite edge is used instead. The amount is clamped so no
/// participant drops below [`MIN_EXTENT`]. A move that would leave some
/// client's space unreclaimable is undone. Returns whether anything moved.
pub fn resize(clients: &mut [Client], idx: usize, edge: Direction, grow: bool, amount: i32) -> bool {
    if amount <= 0 {
        return false;
    }
    let before: Vec<PercentRect> = clients.iter().map(|c| c.percent).collect();
    let stranded_before = stranded(clients);
    let moved = match resize_edge(clients, idx, edge, grow, amount) {
        Some(moved) => moved,
        None => resize_edge(clients, idx, edge.opposite(), grow, amount).unwrap_or(false),
    };
    if moved && stranded(clients) > stranded_before {
        debug!(window = %clients[idx].window, %edge, "resize would strand a client, undoing it");
        for (client, rect) in clients.iter_mut().zip(before) {
            client.percent = rect;
        }
        return false;
    }
    moved
}

/// `None` means `edge` has no covering neighbors at all.
fn resize_edge(
    clients: &mut [Client],
    idx: usize,
    edge: Direction,
    grow: bool,
    amount: i32,
) -> Option<bool> {
    let target = clients[idx].percent;
    let found = touching(clients, &target, Some(clients[idx].window), edge, true);
    if found.is_empty() || !within_span(clients, &found, &target, edge) {
        return None;
    }

    let delta = if grow {
        let room = found.iter().map(|&n| edge.extent_of(&clients[n].percent)).min().unwrap_or(0);
        amount.min(room - MIN_EXTENT)
    } else {
        -amount.min(edge.extent_of(&target) - MIN_EXTENT)
    };
    if delta == 0 {
        return Some(false);
    }
    trace!(window = %clients[idx].window, %edge, delta, "resizing");

    move_edge(&mut clients[idx].percent, edge, delta);
    for n in found {
        move_edge(&mut clients[n].percent, edge.opposite(), -delta);
    }
    Some(true)
}

/// Pushes the `edge` side of `rect` outward by `delta` (inward if negative).
fn move_edge(rect: &mut PercentRect, edge: Direction, delta: i32) {
    match edge {
        Direction::Right => rect.w += delta,
        Direction::Bottom => rect.h += delta,
        Direction::Left => {
            rect.x -= delta;
            rect.w += delta;
        }
        Direction::Top => {
            rect.y -= delta;
            rect.h += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::testing::{clients, rects};

    #[test]
    fn growing_shrinks_the_covering_set_by_the_same_amount() {
        let mut cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
        assert!(resize(&mut cs, 0, Direction::Right, true, 10));
        assert_eq!(rects(&cs), vec![(0, 0, 60, 100), (60, 0, 40, 50), (60, 50, 40, 50)]);

        assert!(resize(&mut cs, 0, Direction::Right, false, 10));
        assert_eq!(rects(&cs), vec![(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
    }

    #[test]
    fn boundary_edges_fall_back_to_the_opposite_side() {
        let mut cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 100)]);
        assert!(resize(&mut cs, 1, Direction::Right, true, 20));
        assert_eq!(rects(&cs), vec![(0, 0, 30, 100), (30, 0, 70, 100)]);
    }

    #[test]
    fn partially_covered_edges_do_not_move() {
        // B only shares half of its left edge's neighbor A, and nothing is to
        // its right, so B cannot resize horizontally.
        let mut cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
        assert!(!resize(&mut cs, 1, Direction::Left, true, 10));
        assert_eq!(rects(&cs), vec![(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);

        assert!(resize(&mut cs, 1, Direction::Bottom, true, 10));
        assert_eq!(rects(&cs), vec![(0, 0, 50, 100), (50, 0, 50, 60), (50, 60, 50, 40)]);
    }

    #[test]
    fn amounts_are_clamped_to_keep_everyone_visible() {
        let mut cs = clients(&[(0, 0, 90, 100), (90, 0, 10, 100)]);
        assert!(resize(&mut cs, 0, Direction::Right, true, 50));
        assert_eq!(rects(&cs), vec![(0, 0, 99, 100), (99, 0, 1, 100)]);
        assert!(!resize(&mut cs, 0, Direction::Right, true, 5));
    }

    #[test]
    fn moves_that_would_close_a_pinwheel_are_undone() {
        // A A B
        // D V B
        // D E C   growing E rightwards would leave V overhung on all four sides.
        let layout = [
            (0, 0, 60, 40),
            (60, 0, 40, 60),
            (40, 40, 20, 20),
            (0, 40, 40, 60),
            (40, 60, 20, 40),
            (60, 60, 40, 40),
        ];
        let mut cs = clients(&layout);
        assert!(!resize(&mut cs, 4, Direction::Right, true, 10));
        assert_eq!(rects(&cs), layout.to_vec());

        // Shrinking it would let C overhang V instead.
        assert!(!resize(&mut cs, 4, Direction::Right, false, 10));
        assert!(resize(&mut cs, 4, Direction::Bottom, true, 10));
        assert_eq!(rects(&cs)[2], (40, 40, 20, 10));
        assert_eq!(rects(&cs)[4], (40, 50, 20, 50));
    }

    #[test]
    fn a_lone_client_cannot_resize() {
        let mut cs = clients(&[(0, 0, 100, 100)]);
        assert!(!resize(&mut cs, 0, Direction::Left, true, 10));
        assert_eq!(rects(&cs), vec![(0, 0, 100, 100)]);
    }
}
