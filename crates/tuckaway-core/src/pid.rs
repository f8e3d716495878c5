use std::fs;
use std::path::PathBuf;

use crate::{Error, Result};

/// Returns the path to the Tuckaway data directory.
///
/// On Windows: `%LOCALAPPDATA%\tuckaway`
/// Creates the directory if it doesn't exist.
fn data_dir() -> Result<PathBuf> {
    let base = std::env::var("LOCALAPPDATA")
        .map_err(|_| Error::Os("LOCALAPPDATA environment variable not set".into()))?;

    let dir = PathBuf::from(base).join("tuckaway");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the path to the PID file.
pub fn pid_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("tuckaway.pid"))
}

/// Writes the current process's PID to the PID file.
///
/// Lets `tuckaway stop` kill a daemon whose pipe stopped answering.
pub fn write_pid_file() -> Result<()> {
    fs::write(pid_path()?, std::process::id().to_string())?;
    Ok(())
}

/// Reads the PID from the PID file, if it exists.
pub fn read_pid_file() -> Result<Option<u32>> {
    let path = pid_path()?;
    if !path.exists() {
        return Ok(None);
    }
    parse_pid(&fs::read_to_string(&path)?).map(Some)
}

/// Removes the PID file.
pub fn remove_pid_file() -> Result<()> {
    let path = pid_path()?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

fn parse_pid(contents: &str) -> Result<u32> {
    contents
        .trim()
        .parse()
        .map_err(|e| Error::Os(format!("invalid PID file contents: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_with_trailing_newline_parses() {
        assert_eq!(parse_pid("1234\n").unwrap(), 1234);
    }

    #[test]
    fn garbage_pid_is_an_error() {
        assert!(parse_pid("not-a-pid").is_err());
    }
}
