use std::io;

use tracing_subscriber::EnvFilter;

fn main() {
    // diagnostics go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout();
    let mut err = io::stderr();
    let code = fivedraw_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
