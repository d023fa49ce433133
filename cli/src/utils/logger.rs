/// Sets up `pretty_env_logger`; `RUST_LOG` wins over `--verbose`.
pub fn init_logger(verbose: bool) {
    if std::env::var("RUST_LOG").is_err() {
        let level = if verbose { "debug" } else { "info" };
        std::env::set_var("RUST_LOG", level);
    }
    pretty_env_logger::init();
}
