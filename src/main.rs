//! Binary entry point: resolve settings, start file logging, load the record
//! file and drive the Ratatui event loop until the user exits.
use contact_book::logging::{flush_logging, init_logging};
use contact_book::{run_app, App, Config, ContactStore, StatusKind};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let logging = init_logging(&config.log_level, &config.log_dir);

    let store = ContactStore::new(&config.record_file);
    let contacts = store.load_all()?;

    let mut app = App::new(store, contacts);
    if let Err(err) = logging {
        app.set_status(format!("Logging disabled: {err}"), StatusKind::Error);
    }
    let result = run_app(&mut app);
    flush_logging();
    result
}
