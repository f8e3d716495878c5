/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `tuckaway init` to create a starter config file.
pub fn generate_config() -> String {
    r##"# Tuckaway configuration
# Location: ~/.config/tuckaway/config.toml

[target]
# Executable name of the application whose main window is tucked away
# instead of closed. Compared case-insensitively.
executable = "olk.exe"
# Opened through the shell by `tuckaway restore` when the application
# is not running.
launch_uri = "ms-outlook:"

[monitor]
# How often the daemon checks whether the application is running, in ms.
poll_interval_ms = 500

[restore]
# Put the window back at its old position and on the taskbar.
# false: only show and focus it.
reapply_geometry = true

[logging]
# Enable file logging to ~/.config/tuckaway/logs/tuckaway.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
