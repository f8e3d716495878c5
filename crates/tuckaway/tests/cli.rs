use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tuckaway"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute tuckaway");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("main window is closed"));
    assert!(stdout.contains("restore"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tuckaway"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute tuckaway");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tuckaway"));
}

#[test]
fn daemon_subcommand_is_hidden_from_help() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tuckaway"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute tuckaway");

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.lines().any(|line| line.trim_start().starts_with("daemon")));
}

#[test]
fn status_subcommand_runs() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tuckaway"));
    cmd.arg("status");

    // Act
    let output = cmd.output().expect("failed to execute tuckaway");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tuckaway"));
}

#[test]
fn unknown_subcommand_fails() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tuckaway"));
    cmd.arg("minimize");

    // Act
    let output = cmd.output().expect("failed to execute tuckaway");

    // Assert
    assert!(!output.status.success());
}
