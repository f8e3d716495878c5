use tuckaway_core::HiddenWindowStore;
use tuckaway_windows::HookLibrary;

/// Drops the hidden-window record, e.g. after the window was brought
/// back by other means. The window itself is left alone.
pub fn execute() {
    let library = match HookLibrary::load() {
        Ok(library) => library,
        Err(e) => super::fail(e),
    };

    match library.hidden_window() {
        Some(window) => {
            library.clear_hidden_window();
            println!("Forgot hidden window 0x{window:X}.");
        }
        None => println!("No window is tucked away."),
    }
}
