//! `grit` entry point: provision the primary binary if needed, then
//! replace this process with it.

use std::ffi::OsString;

fn main() {
    // Logs go to stderr; stdout belongs to the delegated binary.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    match grit_launcher::run("grit", &args) {
        Err(err) => {
            eprintln!("grit: {err}");
            std::process::exit(1);
        }
        Ok(never) => match never {},
    }
}
