// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! bgpvpn - BGP VPN connection service extension.
//!
//! This is the binary entry point: it loads configuration, selects the
//! driver, opens the connection store, and reports what it wired.

mod check;
mod listing;

use std::path::PathBuf;

use bgpvpn_config::BgpvpnConfig;
use clap::{Parser, Subcommand};

/// bgpvpn - BGP VPN connection service extension.
#[derive(Parser, Debug)]
#[command(name = "bgpvpn", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load configuration, select the driver, open the store, and run health checks.
    Check,
    /// Print the resource information of the extension as JSON.
    Resources,
    /// List the drivers compiled into this build.
    Drivers,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            bgpvpn_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.level);

    let registry = match bgpvpn_plugin::builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Check) => {
            if let Err(err) = bgpvpn_config::validate_driver(&config, &registry.names()) {
                bgpvpn_config::render_errors(&[err]);
                std::process::exit(1);
            }
            check::run_check(&config, &registry).await
        }
        Some(Commands::Resources) => listing::resources_json().map(|json| println!("{json}")),
        Some(Commands::Drivers) => {
            print!("{}", listing::drivers_table(&registry));
            Ok(())
        }
        None => {
            println!("bgpvpn: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load(path: Option<&std::path::Path>) -> Result<BgpvpnConfig, Vec<bgpvpn_config::ConfigError>> {
    match path {
        Some(path) => bgpvpn_config::load_and_validate_path(path),
        None => bgpvpn_config::load_and_validate(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bgpvpn={log_level},bgpvpn_service={log_level},bgpvpn_plugin={log_level},\
             bgpvpn_storage={log_level},bgpvpn_extension={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
