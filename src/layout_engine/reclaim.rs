use tracing::debug;

use super::Direction;
use super::neighbors::{touching, within_span};
use crate::model::client::{Client, WindowId};
use crate::model::geometry::PercentRect;

/// The first side of `vacated`, in [`Direction::RECLAIM_ORDER`], whose tiled
/// neighbors cover it exactly without reaching past its span, together with
/// those neighbors.
fn covering_side(
    clients: &[Client],
    vacated: &PercentRect,
    skip: Option<WindowId>,
) -> Option<(Direction, Vec<usize>)> {
    Direction::RECLAIM_ORDER.into_iter().find_map(|direction| {
        let found = touching(clients, vacated, skip, direction, true);
        (!found.is_empty() && within_span(clients, &found, vacated, direction))
            .then_some((direction, found))
    })
}

/// Hands the `vacated` rectangle to the neighbors on the first side (in
/// [`Direction::RECLAIM_ORDER`]) whose neighbors exactly cover it.
///
/// The client that left must already be gone from `clients`. Returns the side
/// that absorbed the space, or `None` if no side could.
pub fn reclaim(clients: &mut [Client], vacated: &PercentRect) -> Option<Direction> {
    let (direction, found) = covering_side(clients, vacated, None)?;
    for idx in found {
        let rect = &mut clients[idx].percent;
        match direction {
            Direction::Top => rect.h += vacated.h,
            Direction::Left => rect.w += vacated.w,
            Direction::Bottom => {
                rect.y = vacated.y;
                rect.h += vacated.h;
            }
            Direction::Right => {
                rect.x = vacated.x;
                rect.w += vacated.w;
            }
        }
    }
    debug!(?vacated, %direction, "reclaimed vacated space");
    Some(direction)
}

/// Counts the tiled clients whose space no side could take back if they were
/// removed. Such a client is the hub of a pinwheel: each of its four sides is
/// overhung by a neighbor reaching past a different corner.
pub fn stranded(clients: &[Client]) -> usize {
    let tiled = clients.iter().filter(|c| c.is_tiled()).count();
    if tiled < 2 {
        return 0;
    }
    clients
        .iter()
        .filter(|c| c.is_tiled() && covering_side(clients, &c.percent, Some(c.window)).is_none())
        .count()
}
