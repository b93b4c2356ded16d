use super::Direction;
use crate::model::geometry::PercentRect;

/// Halves `anchor` along `direction`. The new client takes the half on the
/// `direction` side and its rectangle is returned; `anchor` keeps the rest.
///
/// Returns `None`, leaving `anchor` untouched, when the anchor is too narrow
/// along that axis to be divided.
pub fn split(anchor: &mut PercentRect, direction: Direction) -> Option<PercentRect> {
    if direction.extent_of(anchor) < 2 {
        return None;
    }
    let a = *anchor;
    let new = match direction {
        Direction::Bottom => {
            let y = a.y + a.h / 2;
            anchor.h = y - a.y;
            PercentRect::new(a.x, y, a.w, a.bottom() - y)
        }
        Direction::Top => {
            let y = a.bottom() - a.h / 2;
            anchor.y = y;
            anchor.h = a.bottom() - y;
            PercentRect::new(a.x, a.y, a.w, y - a.y)
        }
        Direction::Right => {
            let x = a.x + a.w / 2;
            anchor.w = x - a.x;
            PercentRect::new(x, a.y, a.right() - x, a.h)
        }
        Direction::Left => {
            let x = a.right() - a.w / 2;
            anchor.x = x;
            anchor.w = a.right() - x;
            PercentRect::new(a.x, a.y, x - a.x, a.h)
        }
    };
    Some(new)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn right_split_halves_the_width() {
        let mut anchor = PercentRect::FULL;
        let new = split(&mut anchor, Direction::Right);
        assert_eq!(anchor, PercentRect::new(0, 0, 50, 100));
        assert_eq!(new, Some(PercentRect::new(50, 0, 50, 100)));
    }

    #[test]
    fn odd_extents_leave_the_larger_half_to_the_new_client() {
        let mut anchor = PercentRect::new(0, 50, 100, 25);
        let new = split(&mut anchor, Direction::Bottom).unwrap();
        assert_eq!(anchor, PercentRect::new(0, 50, 100, 12));
        assert_eq!(new, PercentRect::new(0, 62, 100, 13));

        let mut anchor = PercentRect::new(0, 50, 100, 25);
        let new = split(&mut anchor, Direction::Top).unwrap();
        assert_eq!(new, PercentRect::new(0, 50, 100, 13));
        assert_eq!(anchor, PercentRect::new(0, 63, 100, 12));
    }

    #[test]
    fn left_split_mirrors_right() {
        let mut anchor = PercentRect::new(50, 0, 50, 100);
        let new = split(&mut anchor, Direction::Left).unwrap();
        assert_eq!(new, PercentRect::new(50, 0, 25, 100));
        assert_eq!(anchor, PercentRect::new(75, 0, 25, 100));
    }

    #[test]
    fn slivers_cannot_be_split() {
        let mut anchor = PercentRect::new(99, 0, 1, 100);
        assert_eq!(split(&mut anchor, Direction::Right), None);
        assert_eq!(anchor, PercentRect::new(99, 0, 1, 100));
    }
}
