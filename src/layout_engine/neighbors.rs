//! Directional neighbor queries over a desktop's tiled clients.
//!
//! Candidates are visited in client sequence order, not by distance. When
//! more than one set of neighbors would qualify, the earliest inserted
//! clients win.

use tracing::trace;

use super::Direction;
use crate::model::client::{Client, WindowId};
use crate::model::geometry::PercentRect;

/// Returns the indices of tiled clients sharing `target`'s edge on `direction`.
///
/// With `exact` set, matches are accumulated until they cover the whole span
/// of that edge. A single neighbor that covers the span on its own is returned
/// alone. If the span cannot be covered the result is empty. Without `exact`
/// the first overlapping neighbor is returned.
pub fn touching(
    clients: &[Client],
    target: &PercentRect,
    skip: Option<WindowId>,
    direction: Direction,
    exact: bool,
) -> Vec<usize> {
    let edge = direction.edge_of(target);
    let (start, end) = direction.span_of(target);
    let wanted = end - start;
    let mut found = Vec::new();
    let mut covered = 0;

    for (idx, client) in clients.iter().enumerate() {
        if !client.is_tiled() || Some(client.window) == skip {
            continue;
        }
        if direction.opposite().edge_of(&client.percent) != edge {
            continue;
        }
        let (c_start, c_end) = direction.span_of(&client.percent);
        if c_start >= end || c_end <= start {
            continue;
        }
        if !exact {
            return vec![idx];
        }
        if c_start <= start && c_end >= end {
            trace!(window = %client.window, %direction, "single neighbor covers edge");
            return vec![idx];
        }
        covered += c_end.min(end) - c_start.max(start);
        found.push(idx);
        if covered >= wanted {
            return found;
        }
    }
    Vec::new()
}

/// Whether every neighbor in `found` lies within `target`'s span on
/// `direction`, so that moving the shared edge cannot uncover anything else.
pub fn within_span(
    clients: &[Client],
    found: &[usize],
    target: &PercentRect,
    direction: Direction,
) -> bool {
    let (start, end) = direction.span_of(target);
    found.iter().all(|&idx| {
        let (c_start, c_end) = direction.span_of(&clients[idx].percent);
        c_start >= start && c_end <= end
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::testing::clients;

    #[test]
    fn finds_exact_cover_across_several_neighbors() {
        // A | B
        //   | C
        let cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
        let found = touching(&cs, &cs[0].percent, Some(cs[0].window), Direction::Right, true);
        assert_eq!(found, vec![1, 2]);
        assert!(within_span(&cs, &found, &cs[0].percent, Direction::Right));
    }

    #[test]
    fn a_wider_neighbor_covers_on_its_own() {
        let cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
        let found = touching(&cs, &cs[1].percent, Some(cs[1].window), Direction::Left, true);
        assert_eq!(found, vec![0]);
        assert!(!within_span(&cs, &found, &cs[1].percent, Direction::Left));
    }

    #[test]
    fn partial_cover_is_reported_as_nothing() {
        // A spans the full height, B only half of it on the right, the rest
        // of the right side is floating-occupied (not tiled).
        let mut cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 50), (50, 50, 50, 50)]);
        cs[2].floating = true;
        assert!(touching(&cs, &cs[0].percent, Some(cs[0].window), Direction::Right, true).is_empty());
        assert_eq!(
            touching(&cs, &cs[0].percent, Some(cs[0].window), Direction::Right, false),
            vec![1]
        );
    }

    #[test]
    fn monitor_edges_have_no_neighbors() {
        let cs = clients(&[(0, 0, 50, 100), (50, 0, 50, 100)]);
        assert!(touching(&cs, &cs[0].percent, Some(cs[0].window), Direction::Left, false).is_empty());
        assert!(touching(&cs, &cs[0].percent, Some(cs[0].window), Direction::Top, true).is_empty());
    }

    #[test]
    fn sequence_order_decides_the_first_match() {
        // B and C both touch A's right edge; C was inserted first.
        let cs = clients(&[(50, 50, 50, 50), (0, 0, 50, 100), (50, 0, 50, 50)]);
        let found = touching(&cs, &cs[1].percent, Some(cs[1].window), Direction::Right, false);
        assert_eq!(found, vec![0]);
    }
}
