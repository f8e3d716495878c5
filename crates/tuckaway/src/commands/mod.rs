pub mod clear;
pub mod daemon;
pub mod init;
pub mod restore;
pub mod start;
pub mod status;
pub mod stop;

/// Prints `Error: {e}` to stderr and exits with status 1.
pub(crate) fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}
