//! AppShot CLI: frame app screenshots in device mockups.
//!
//! Usage:
//!   appshot devices                 List known devices
//!   appshot check-devices <FILE>    Validate a device table
//!   appshot compose <INPUT>         Frame a screenshot and export a PNG
//!   appshot config [--init]         Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "appshot",
    about = "Turn app screenshots into store-ready device mockups",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available device profiles
    Devices {
        /// JSON device table to use instead of the built-in one
        #[arg(long)]
        devices: Option<PathBuf>,
    },

    /// Validate a JSON device table
    CheckDevices {
        /// Path to the device table
        path: PathBuf,
    },

    /// Compose a screenshot into a device frame and export it as PNG
    Compose {
        /// Screenshot to frame (jpeg, png, gif or webp)
        input: PathBuf,

        /// Device id, see `appshot devices`
        #[arg(short, long)]
        device: Option<String>,

        /// Use the dark theme
        #[arg(long, conflicts_with = "light")]
        dark: bool,

        /// Use the light theme even if the config selects dark
        #[arg(long)]
        light: bool,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filename prefix
        #[arg(long)]
        prefix: Option<String>,

        /// JSON device table to use instead of the built-in one
        #[arg(long)]
        devices: Option<PathBuf>,
    },

    /// Print the effective configuration and where it is read from
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; -v wins over the configured level
    let logging = appshot_common::logging::cli_logging(
        appshot_common::config::AppConfig::load().logging,
        cli.verbose,
    );
    appshot_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Devices { devices } => commands::devices::run(devices),
        Commands::CheckDevices { path } => commands::check::run(path),
        Commands::Compose {
            input,
            device,
            dark,
            light,
            output,
            prefix,
            devices,
        } => {
            commands::compose::run(commands::compose::ComposeArgs {
                input,
                device,
                theme: commands::compose::theme_override(dark, light),
                output,
                prefix,
                devices,
            })
            .await
        }
        Commands::Config { init } => commands::config::run(init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_and_dark_conflict() {
        assert!(Cli::try_parse_from(["appshot", "compose", "shot.png", "--dark", "--light"]).is_err());
    }

    #[test]
    fn test_light_flag_parses() {
        let cli = Cli::try_parse_from(["appshot", "compose", "shot.png", "--light"]).unwrap();
        match cli.command {
            Commands::Compose { dark, light, .. } => assert!(light && !dark),
            _ => panic!("expected compose"),
        }
    }
}
