// snapshot/src/main.rs

use env_logger::{
    Builder,
    Env
};
use snapshot::commands;

fn init_logger() {
    // RUST_LOG overrides; default keeps stderr quiet unless something is wrong.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = commands::run_cli() {
        log::error!("{e:?}");
        std::process::exit(1);
    }
}
