use tuckaway_core::{config, log};

pub fn execute() {
    let config = config::load();
    log::init(&config.logging);

    if let Err(e) = tuckaway_windows::daemon::run(&config) {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}
