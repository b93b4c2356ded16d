use serde::{Deserialize, Serialize};

use super::Direction;
use crate::model::desktop::Mode;

/// Commands that rearrange desktops, monitors or clients. Bound to keys and
/// buttons in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    SwitchDesktop(usize),
    NextDesktop,
    PrevDesktop,
    LastDesktop,
    MoveClientToDesktop(usize),
    FollowClientToDesktop(usize),

    SetMode(Mode),
    SetDirection(Direction),

    MoveFocus(Direction),
    MoveClient(Direction),
    Grow(Direction),
    Shrink(Direction),
    FocusNext,
    FocusPrev,
    FocusLast,
    ToggleFloating,

    IncreaseGap,
    DecreaseGap,

    CloseClient,
    KillClient,

    FocusNextMonitor,
    FocusPrevMonitor,
}
