use clap::Parser;

use typeahead_core::runtime::{self, Cli};

fn main() {
    let cli = Cli::parse();
    let cfg = match runtime::load_config(&cli) {
        Ok(cfg) => cfg,
        Err(error) => {
            eprintln!("[typeahead-core] {error}");
            std::process::exit(2);
        }
    };
    typeahead_core::logging::init(&cfg.log_filter);

    if let Err(error) = runtime::run(cli, cfg) {
        tracing::error!(%error, "command failed");
        eprintln!("[typeahead-core] {error}");
        std::process::exit(1);
    }
}
