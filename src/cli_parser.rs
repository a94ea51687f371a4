//! CLI argument helpers and help text for launcher-assets.

/// The `n`th argument after the command that is not a `--flag`.
pub fn positional(args: &[String], n: usize) -> Option<&str> {
    args.iter()
        .skip(2)
        .filter(|a| !a.starts_with("--"))
        .nth(n)
        .map(String::as_str)
}

/// True if `flag` appears anywhere after the command.
pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().skip(2).any(|a| a == flag)
}

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "launcher-assets - Launcher asset pipeline v{}

USAGE:
    launcher-assets [COMMAND] [OPTIONS]

COMMANDS:
    maintain     Encrypt bundled assets that have no .enc yet (default)
    resolve      Resolve an asset name to a playable path
    paths        Show install, data and probe directories
    encrypt      Encrypt one file into the asset format
    decrypt      Decrypt one asset-format file
    config       Manage configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    -h, --help     Show help for command
    -V, --version  Show version information
    --json         JSON output (resolve, paths, maintain)

EXAMPLES:
    launcher-assets                          # Run startup maintenance
    launcher-assets resolve back.mp4         # Where would back.mp4 play from?
    launcher-assets paths --json             # Directory layout as JSON
    launcher-assets encrypt in.mp4 in.mp4.enc
    launcher-assets config validate

ENVIRONMENT:
    LAUNCHER_CONFIG       Path to a TOML config file
    LAUNCHER_INSTALL_DIR  Install directory override
    LAUNCHER_DATA_DIR     Per-user data directory override
    LAUNCHER_LOG          Log filter (debug, info, warn, error)

EXIT CODES:
    0  Success
    1  Failure / asset not found
    2  Configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "maintain" => print_maintain_help(),
        "resolve" => print_resolve_help(),
        "paths" => print_paths_help(),
        "encrypt" | "decrypt" => print_crypt_help(),
        "config" => print_config_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'launcher-assets help' for general usage.",
                command
            );
        }
    }
}

fn print_maintain_help() {
    eprintln!(
        "launcher-assets maintain - Encrypt bundled assets

USAGE:
    launcher-assets maintain [--json]

DESCRIPTION:
    For every known asset, encrypts <install>/Assets/<name> or a raw
    <install>/AssetsEncrypted/<name> into <install>/AssetsEncrypted/<name>.enc.
    Existing .enc files are never rewritten. A failing asset does not stop
    the others.

EXIT CODES:
    0  All assets processed or skipped
    1  At least one asset failed
"
    );
}

fn print_resolve_help() {
    eprintln!(
        "launcher-assets resolve - Resolve an asset

USAGE:
    launcher-assets resolve <NAME> [--json]

DESCRIPTION:
    Looks for AssetsEncrypted/<NAME>.enc (decrypting into the per-user cache),
    then Assets/<NAME>, then raw AssetsEncrypted/<NAME> in the install and
    per-user data directories.

EXIT CODES:
    0  Resolved
    1  Not found
"
    );
}

fn print_paths_help() {
    eprintln!(
        "launcher-assets paths - Show directories

USAGE:
    launcher-assets paths [--json]
"
    );
}

fn print_crypt_help() {
    eprintln!(
        "launcher-assets encrypt|decrypt - Convert a single file

USAGE:
    launcher-assets encrypt <INPUT> <OUTPUT>
    launcher-assets decrypt <INPUT> <OUTPUT>

DESCRIPTION:
    Uses the launcher asset key and format: 16-byte IV, then AES-256-CBC
    ciphertext with PKCS#7 padding. INPUT and OUTPUT must differ.
    encrypt refuses to replace an existing OUTPUT. decrypt replaces OUTPUT
    only after the whole input decrypted cleanly.
"
    );
}

fn print_config_help() {
    eprintln!(
        "launcher-assets config - Manage configuration

USAGE:
    launcher-assets config <SUBCOMMAND>

SUBCOMMANDS:
    show      Effective configuration as TOML
    defaults  Default configuration as TOML
    validate  Load and validate, exit 2 on error
"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_skips_flags() {
        let args = argv(&["launcher-assets", "resolve", "--json", "back.mp4"]);
        assert_eq!(positional(&args, 0), Some("back.mp4"));
        assert_eq!(positional(&args, 1), None);
        assert!(has_flag(&args, "--json"));

        let args = argv(&["launcher-assets", "resolve", "back.mp4", "--json"]);
        assert_eq!(positional(&args, 0), Some("back.mp4"));
    }

    #[test]
    fn test_positional_pairs() {
        let args = argv(&["launcher-assets", "encrypt", "in.mp4", "in.mp4.enc"]);
        assert_eq!(positional(&args, 0), Some("in.mp4"));
        assert_eq!(positional(&args, 1), Some("in.mp4.enc"));
        assert!(!has_flag(&args, "--json"));
        assert_eq!(positional(&argv(&["launcher-assets"]), 0), None);
    }
}
