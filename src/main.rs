//! skillmap - learner progress through skill maps.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skillmap::app::AppContext;
use skillmap::cli::Cli;
use skillmap::cli::output::robot_error_structured;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli);
    let robot_mode = ctx
        .as_ref()
        .map_or_else(|_| AppContext::robot_requested(&cli), |ctx| ctx.robot_mode);
    init_tracing(&cli, robot_mode);

    match ctx.and_then(|ctx| skillmap::cli::commands::run(&ctx, &cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if robot_mode {
                // Robot mode: JSON error output to stdout
                let response = robot_error_structured(&e);
                println!("{}", serde_json::to_string(&response).unwrap_or_default());
            } else {
                let structured = e.to_structured();
                eprintln!("Error: {e}");
                eprintln!("Hint: {}", structured.suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli, robot_mode: bool) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,skillmap=info",
        1 => "info,skillmap=debug",
        2 => "debug,skillmap=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if robot_mode {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
