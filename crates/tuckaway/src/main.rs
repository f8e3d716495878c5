mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tuckaway",
    version,
    about = "Keeps an application running in the background when its main window is closed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the background daemon and install the hook
    Start,
    /// Stop the daemon and remove the hook
    Stop,
    /// Show whether the daemon is running and what it tracks
    Status,
    /// Bring the tucked-away window back, or launch the application
    Restore,
    /// Forget the tucked-away window without touching it
    Clear,
    /// Run the daemon (internal, not for direct use)
    #[command(hide = true)]
    Daemon,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Restore => commands::restore::execute(),
        Commands::Clear => commands::clear::execute(),
        Commands::Daemon => commands::daemon::execute(),
    }
}
