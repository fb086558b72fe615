//! Host platform checks.

/// Whether the process runs with an effective uid of 0.
#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Non-unix hosts cannot run the controller stack.
#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    false
}
