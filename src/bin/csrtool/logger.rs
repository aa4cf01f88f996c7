/// Sets up `env_logger`; `RUST_LOG` selects the level.
pub(crate) fn init() {
    if let Err(e) = env_logger::try_init() {
        eprintln!("could not set up env_logger: {e}");
    }
}
