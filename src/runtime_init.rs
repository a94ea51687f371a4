//! Process setup and subcommand bodies for launcher-assets.

use std::path::Path;
use std::process::ExitCode;

use launcher_assets::config::{self as launcher_config, AssetConfig};
use launcher_assets::security::{AssetCipher, AssetKey};
use launcher_assets::{logging, AssetRuntime};

use crate::cli_parser;

/// Load config and build the runtime, installing logging and the crash hook.
pub fn bootstrap() -> Result<AssetRuntime, ExitCode> {
    let config = load_config()?;
    let runtime = AssetRuntime::new(config).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::from(2u8)
    })?;
    logging::init(&runtime.paths, &runtime.config.log_filter);
    logging::install_crash_hook(&runtime.paths);
    tracing::info!(key = %AssetKey::global().fingerprint(), "Launcher assets started");
    Ok(runtime)
}

pub fn load_config() -> Result<AssetConfig, ExitCode> {
    launcher_config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::from(2u8)
    })
}

pub async fn run_maintain(runtime: &AssetRuntime, json: bool) -> ExitCode {
    let report = runtime.run_startup_maintenance().await;
    if json {
        let failures: Vec<_> = report
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "asset": f.asset,
                    "input": f.input,
                    "kind": f.error.kind().as_str(),
                    "error": f.error.to_string(),
                })
            })
            .collect();
        let out = serde_json::json!({
            "encrypted": report.encrypted,
            "skipped": report.skipped,
            "failures": failures,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    } else {
        for path in &report.encrypted {
            println!("encrypted {}", path.display());
        }
        for failure in &report.failures {
            eprintln!("failed {}: {}", failure.asset, failure.error);
        }
        println!("{} encrypted, {} skipped, {} failed", report.encrypted.len(), report.skipped, report.failures.len());
    }
    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub fn run_resolve(runtime: &AssetRuntime, name: &str, json: bool) -> ExitCode {
    match runtime.resolver.resolve(name) {
        Ok(resolution) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution).unwrap_or_default());
            } else {
                println!("{} ({})", resolution.path.display(), resolution.origin);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

pub fn run_paths(runtime: &AssetRuntime, json: bool) -> ExitCode {
    let paths = &runtime.paths;
    if json {
        println!("{}", serde_json::to_string_pretty(paths.as_ref()).unwrap_or_default());
        return ExitCode::SUCCESS;
    }
    println!("install:  {}", paths.install_dir().display());
    println!("data:     {}", paths.data_dir().display());
    println!("cache:    {}", paths.cache_dir().display());
    println!("log:      {}", paths.asset_log().display());
    println!("crash:    {}", paths.crash_log().display());
    for (i, dir) in paths.probe_dirs().iter().enumerate() {
        println!("probe[{}]: {}", i, dir.display());
    }
    ExitCode::SUCCESS
}

pub fn run_crypt(args: &[String], encrypt: bool) -> ExitCode {
    let (Some(input), Some(output)) = (cli_parser::positional(args, 0), cli_parser::positional(args, 1)) else {
        eprintln!("Usage: launcher-assets {} <INPUT> <OUTPUT>", if encrypt { "encrypt" } else { "decrypt" });
        return ExitCode::FAILURE;
    };
    let cipher = AssetCipher::global();
    let result = if encrypt {
        cipher.encrypt_file(Path::new(input), Path::new(output))
    } else {
        cipher.decrypt_file(Path::new(input), Path::new(output))
    };
    match result {
        Ok(bytes) => {
            println!("{} bytes written to {}", bytes, output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

pub fn run_config(sub: &str) -> Option<ExitCode> {
    match sub {
        "show" => Some(match load_config() {
            Ok(config) => {
                print!("{}", config.to_toml_string());
                ExitCode::SUCCESS
            }
            Err(code) => code,
        }),
        "defaults" => {
            print!("{}", AssetConfig::default().to_toml_string());
            Some(ExitCode::SUCCESS)
        }
        "validate" => Some(match load_config() {
            Ok(_) => {
                println!("Configuration valid");
                ExitCode::SUCCESS
            }
            Err(code) => code,
        }),
        _ => None,
    }
}
