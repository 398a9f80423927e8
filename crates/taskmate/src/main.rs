// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Taskmate - a personal assistant Telegram bot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod records;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskmate_config::TaskmateConfig;
use taskmate_core::{Collection, UserId};

/// Taskmate - a personal assistant Telegram bot.
#[derive(Parser, Debug)]
#[command(name = "taskmate", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the notification scheduler until interrupted.
    Serve,
    /// Validate configuration and print the effective scheduler settings.
    CheckConfig,
    /// Print stored records of one collection as JSON.
    Records {
        #[arg(value_parser = parse_collection)]
        collection: Collection,
        /// Only records owned by this Telegram user id.
        #[arg(long)]
        user: Option<i64>,
    },
}

fn parse_collection(input: &str) -> Result<Collection, String> {
    input.parse().map_err(|_| {
        let names: Vec<String> = Collection::ALL.iter().map(ToString::to_string).collect();
        format!("unknown collection `{input}` (expected one of: {})", names.join(", "))
    })
}

fn load_config(path: Option<&PathBuf>) -> TaskmateConfig {
    let loaded = match path {
        Some(path) => taskmate_config::load_and_validate_path(path),
        None => taskmate_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            taskmate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::CheckConfig) => {
            print_config_summary(&config);
            Ok(())
        }
        Some(Commands::Records { collection, user }) => {
            records::run_records(&config, collection, user.map(UserId)).await
        }
        None => {
            println!("taskmate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config_summary(config: &TaskmateConfig) {
    let s = &config.scheduler;
    println!("taskmate: config ok (bot.name={})", config.bot.name);
    println!("  database: {}", config.storage.database_path);
    println!(
        "  scheduler: {} (timers {}s, auto messages {}s, birthdays {}s, calendar {}s)",
        if s.enabled { "enabled" } else { "disabled" },
        s.timer_interval_secs,
        s.auto_message_interval_secs,
        s.birthday_interval_secs,
        s.calendar_interval_secs,
    );
    println!(
        "  timezone: {} (UTC{:+}m), dedupe {}",
        s.timezone_label,
        s.utc_offset_minutes,
        if s.deduplicate { "on" } else { "off" },
    );
    println!(
        "  telegram token: {}",
        if config.telegram.bot_token.is_some() { "configured" } else { "from environment" }
    );
}
