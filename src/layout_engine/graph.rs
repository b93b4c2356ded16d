use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::model::geometry::PercentRect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An edge of a rectangle, used both as the split direction for new clients
/// and as the target of directional navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    /// Order in which removal tries to hand the vacated space to neighbors.
    pub const RECLAIM_ORDER: [Direction; 4] =
        [Direction::Top, Direction::Left, Direction::Bottom, Direction::Right];

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Top | Direction::Bottom => Orientation::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    /// Coordinate of `rect`'s edge on this side.
    pub fn edge_of(self, rect: &PercentRect) -> i32 {
        match self {
            Direction::Left => rect.x,
            Direction::Right => rect.right(),
            Direction::Top => rect.y,
            Direction::Bottom => rect.bottom(),
        }
    }

    /// Span of `rect` along the axis perpendicular to this edge.
    pub fn span_of(self, rect: &PercentRect) -> (i32, i32) {
        match self.orientation() {
            Orientation::Horizontal => (rect.y, rect.bottom()),
            Orientation::Vertical => (rect.x, rect.right()),
        }
    }

    /// Extent of `rect` along the axis this edge moves on.
    pub fn extent_of(self, rect: &PercentRect) -> i32 {
        match self.orientation() {
            Orientation::Horizontal => rect.w,
            Orientation::Vertical => rect.h,
        }
    }
}
