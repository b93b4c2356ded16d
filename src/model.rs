pub mod client;
pub mod desktop;
pub mod geometry;
pub mod monitor;
pub mod state;
pub mod status;

pub use client::{Client, WindowId};
pub use desktop::{Desktop, Mode};
pub use geometry::{PercentRect, Rect};
pub use monitor::{Monitor, Output, OutputId, Strut};
pub use state::{Shown, WmState};
