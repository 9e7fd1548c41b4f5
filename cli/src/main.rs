//! # mkipk Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the mkipk CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Running the packaging pipeline and mapping failures to exit code 1
//!
//! ## Examples
//!
//! ```bash
//! # Write the package into a directory, named from control metadata
//! mkipk -i ./staging -o ./dist
//!
//! # Write to an explicit file, with debug logging
//! mkipk -vv -i ./staging -o ./dist/custom.ipk
//! ```
//!
//! Input directory layout:
//!
//! ```text
//! /path/to/input_dir
//!   ├── control
//!   │   ├── control
//!   │   └── postinst
//!   └── data
//!       ├── etc
//!       └── usr
//!            └── lib
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (pack)
mod common; // Shared utilities (archive, fs)
mod core; // Core infrastructure (errors)

const INPUT_LAYOUT_HELP: &str = "\
Input directory layout:
  <input>
    ├── control
    │   ├── control
    │   └── postinst
    └── data
        ├── etc
        └── usr
            └── lib";

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "mkipk",
    about = "mkipk: build an OpenWrt/opkg .ipk package from a staging directory",
    long_about = "Packs <input>/control and <input>/data into control.tar.gz and data.tar.gz,\n\
                  adds a debian-binary marker, and writes the combined package.\n\
                  When the output is an existing directory, the file is named\n\
                  <package>_<version>[_<architecture>].ipk from <input>/control/control.",
    after_help = INPUT_LAYOUT_HELP,
    version
)]
struct Cli {
    #[command(flatten)]
    pack: commands::pack::PackArgs,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests print to stdout and succeed.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = commands::pack::handle_pack(cli.pack) {
        tracing::error!("Packaging failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_and_pack_flags_coexist() {
        let cli = Cli::try_parse_from(["mkipk", "-vv", "-i", "in", "-o", "out"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.pack.input, std::path::PathBuf::from("in"));
        assert_eq!(cli.pack.output, std::path::PathBuf::from("out"));
    }

    #[test]
    fn test_help_shows_input_layout() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Input directory layout:"));
        assert!(help.contains("├── control"));
        assert!(help.contains("└── data"));
    }

    #[test]
    fn test_input_and_output_are_required() {
        assert!(Cli::try_parse_from(["mkipk", "-i", "in"]).is_err());
        assert!(Cli::try_parse_from(["mkipk", "-o", "out"]).is_err());
    }
}
