//! `grit-daemon` entry point: same resolution and provisioning as `grit`,
//! differing only in which binary is requested.

use std::ffi::OsString;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    match grit_launcher::run("grit-daemon", &args) {
        Err(err) => {
            eprintln!("grit-daemon: {err}");
            std::process::exit(1);
        }
        Ok(never) => match never {},
    }
}
