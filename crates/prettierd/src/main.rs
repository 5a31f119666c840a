//! Entry point for the `prettierd` binary.
//!
//! Daemon settings come from `ortho_config` defaults, configuration files and
//! `PRETTIERD_*` variables. The request arguments are never handed to the
//! configuration loader.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prettierd::{cli, telemetry};
use prettierd_config::Config;

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    let config = match Config::load_from_iter([OsString::from("prettierd")]) {
        Ok(config) => config,
        Err(error) => {
            let _ = writeln!(stderr, "failed to load configuration: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = telemetry::initialise(&config) {
        let _ = writeln!(stderr, "{error}");
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(error) => {
            let _ = writeln!(stderr, "failed to read the working directory: {error}");
            return ExitCode::FAILURE;
        }
    };

    let adapter = cli::node_adapter(&config);
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    cli::run(
        &adapter,
        cwd,
        std::env::args_os().skip(1),
        &mut stdin,
        &mut stdout,
        &mut stderr,
    )
}
