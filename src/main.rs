//! launcher-assets entry point.
//!
//! Runs startup asset maintenance and exposes the resolver and cipher for
//! packaging scripts and support diagnostics.

mod cli_parser;
mod runtime_init;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("maintain");
    let json = cli_parser::has_flag(&args, "--json");

    match command {
        "maintain" | "" | "--json" => {
            let json = json || command == "--json";
            match runtime_init::bootstrap() {
                Ok(runtime) => runtime_init::run_maintain(&runtime, json).await,
                Err(code) => code,
            }
        }
        "resolve" => {
            let Some(name) = cli_parser::positional(&args, 0) else {
                cli_parser::print_command_help("resolve");
                return ExitCode::FAILURE;
            };
            match runtime_init::bootstrap() {
                Ok(runtime) => runtime_init::run_resolve(&runtime, name, json),
                Err(code) => code,
            }
        }
        "paths" => match runtime_init::bootstrap() {
            Ok(runtime) => runtime_init::run_paths(&runtime, json),
            Err(code) => code,
        },
        "encrypt" => runtime_init::run_crypt(&args, true),
        "decrypt" => runtime_init::run_crypt(&args, false),
        "config" => {
            let sub = cli_parser::positional(&args, 0).unwrap_or("show");
            runtime_init::run_config(sub).unwrap_or_else(|| {
                eprintln!("Unknown config subcommand: {}", sub);
                cli_parser::print_command_help("config");
                ExitCode::FAILURE
            })
        }
        "help" | "--help" | "-h" => {
            if let Some(sub) = args.get(2) {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("launcher-assets {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            ExitCode::FAILURE
        }
    }
}
