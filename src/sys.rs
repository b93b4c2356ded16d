//! Everything that talks to the outside world: the display server, key
//! parsing and child processes.

pub mod backend;
pub mod hotkey;
pub mod process;
pub mod x11;
