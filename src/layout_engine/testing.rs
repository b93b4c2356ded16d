use crate::model::client::{Client, WindowId};
use crate::model::geometry::{PercentRect, Rect};

/// Builds tiled clients with window ids 1, 2, ... for the given rectangles.
pub fn clients(rects: &[(i32, i32, i32, i32)]) -> Vec<Client> {
    rects
        .iter()
        .enumerate()
        .map(|(idx, &(x, y, w, h))| {
            let mut client = Client::new(WindowId(idx as u32 + 1), Rect::default());
            client.percent = PercentRect::new(x, y, w, h);
            client
        })
        .collect()
}

pub fn rects(clients: &[Client]) -> Vec<(i32, i32, i32, i32)> {
    clients
        .iter()
        .filter(|c| c.is_tiled())
        .map(|c| (c.percent.x, c.percent.y, c.percent.w, c.percent.h))
        .collect()
}
