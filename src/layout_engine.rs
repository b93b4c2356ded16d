pub mod arrange;
mod engine;
pub mod graph;
pub mod neighbors;
pub mod reclaim;
pub mod resize;
pub mod split;
#[cfg(test)]
pub(crate) mod testing;

pub use arrange::{Arrangement, Placement, arrange, stacking_order};
pub use engine::LayoutCommand;
pub use graph::{Direction, Orientation};
use thiserror::Error;

use crate::model::client::WindowId;
use crate::model::geometry::PercentRect;

/// Violations of the tiling partition. These indicate a bug; they are logged
/// and the layout is left as is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no neighbors cover vacated space {0:?}")]
    Unreclaimed(PercentRect),
    #[error("client {0} has an invalid rectangle {1:?}")]
    OutOfBounds(WindowId, PercentRect),
    #[error("clients {0} and {1} overlap")]
    Overlap(WindowId, WindowId),
    #[error("tiled clients cover {covered} of {full} square points")]
    Uncovered { covered: i64, full: i64 },
    #[error("{counted} tiled clients but tiled count is {recorded}")]
    TiledCount { counted: usize, recorded: usize },
}
