use nix::sys::signal::{SigHandler, Signal, signal};

/// Lets the kernel reap exited children so spawned commands never linger as
/// zombies.
pub fn reap_children_automatically() -> nix::Result<()> {
    // SAFETY: SIG_IGN installs no handler code.
    unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }.map(|_| ())
}
