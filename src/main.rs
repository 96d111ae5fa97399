//! Gunsmith - weapon attachment build calculator
//!
//! Command-line entry point: loads settings, sets up logging, fetches the
//! game data once and runs a single command against it.

mod commands;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use gunsmith_builder::{SlotPath, ALL_CALIBERS};
use tracing::{info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{parse_equip, EquipArg};
use settings::{LoadStatus, Settings};

#[derive(Parser)]
#[command(name = "gunsmith", about = "Weapon attachment build calculator", version)]
struct Cli {
    /// Read settings from this file instead of the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List weapons, optionally filtered by name and caliber.
    Weapons {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL_CALIBERS)]
        caliber: String,
    },
    /// List the calibers present in the catalog.
    Calibers,
    /// Show a weapon's slot tree.
    Slots {
        weapon_id: String,
        /// Attachment to equip first, as <slot-path>=<mod-id>.
        #[arg(long = "equip", value_parser = parse_equip)]
        equips: Vec<EquipArg>,
    },
    /// List modifications compatible with one slot.
    Compatible {
        weapon_id: String,
        #[arg(value_parser = SlotPath::parse)]
        slot: SlotPath,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "equip", value_parser = parse_equip)]
        equips: Vec<EquipArg>,
    },
    /// Compute stats for a weapon with attachments.
    Stats {
        weapon_id: String,
        #[arg(long = "equip", value_parser = parse_equip)]
        equips: Vec<EquipArg>,
    },
    /// Manage saved builds.
    Builds {
        #[command(subcommand)]
        action: BuildsAction,
    },
    /// Print the effective settings.
    Config {
        /// Write the effective settings back to the settings file.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand)]
enum BuildsAction {
    /// List saved builds.
    List,
    /// Save a new build.
    Save {
        name: String,
        weapon_id: String,
        #[arg(long = "equip", value_parser = parse_equip)]
        equips: Vec<EquipArg>,
    },
    /// Show one saved build.
    Show { id: String },
    /// Delete one saved build.
    Delete { id: String },
}

/// Log subscriber at the configured level; `RUST_LOG` takes precedence
fn log_subscriber<W>(settings: &Settings, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish()
}

fn load_settings(config: Option<&Path>) -> (Settings, LoadStatus) {
    match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The log level lives in the settings file, so the load result is
    // reported only once the subscriber exists
    let (settings, status) = load_settings(cli.config.as_deref());
    tracing::subscriber::set_global_default(log_subscriber(&settings, std::io::stderr))?;
    status.log();

    info!("Starting gunsmith...");

    match cli.command {
        Commands::Weapons { search, caliber } => {
            let catalog = commands::load_catalog(&settings)?;
            commands::weapons(&catalog, &search, &caliber);
        }
        Commands::Calibers => {
            let catalog = commands::load_catalog(&settings)?;
            commands::calibers(&catalog);
        }
        Commands::Slots { weapon_id, equips } => {
            let catalog = commands::load_catalog(&settings)?;
            commands::slots(&catalog, &weapon_id, &equips)?;
        }
        Commands::Compatible { weapon_id, slot, search, equips } => {
            let catalog = commands::load_catalog(&settings)?;
            commands::compatible(&catalog, &weapon_id, &slot, &search, &equips)?;
        }
        Commands::Stats { weapon_id, equips } => {
            let catalog = commands::load_catalog(&settings)?;
            commands::stats(&catalog, &weapon_id, &equips)?;
        }
        Commands::Builds { action } => {
            let mut repo = commands::open_repository(&settings)?;
            match action {
                BuildsAction::List => commands::list_builds(&repo),
                BuildsAction::Save { name, weapon_id, equips } => {
                    let catalog = commands::load_catalog(&settings)?;
                    commands::save_build(&catalog, &mut repo, &name, &weapon_id, &equips)?;
                }
                BuildsAction::Show { id } => commands::show_build(&repo, &id)?,
                BuildsAction::Delete { id } => commands::delete_build(&mut repo, &id)?,
            }
        }
        Commands::Config { save } => {
            print!("{}", toml::to_string_pretty(&settings)?);
            if save {
                match &cli.config {
                    Some(path) => settings.save_to(path)?,
                    None => settings.save()?,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log output collected in memory
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_invalid_settings_warning_reaches_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "api = 12").unwrap();

        let (settings, status) = load_settings(Some(&path));
        assert_eq!(settings, Settings::default());

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = log_subscriber(&settings, move || writer.clone());
        tracing::subscriber::with_default(subscriber, || status.log());

        let output = log.text();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("Failed to parse settings file"), "{}", output);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stats_with_equips() {
        let cli = Cli::try_parse_from([
            "gunsmith",
            "stats",
            "m4",
            "--equip",
            "Muzzle=adapter",
            "--equip",
            "Muzzle.Suppressor=sup",
        ])
        .unwrap();
        let Commands::Stats { weapon_id, equips } = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(weapon_id, "m4");
        assert_eq!(equips.len(), 2);
        assert_eq!(equips[1].path.depth(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_slot_path() {
        assert!(Cli::try_parse_from(["gunsmith", "compatible", "m4", "Muzzle..X"]).is_err());
    }

    #[test]
    fn test_weapons_defaults_to_all_calibers() {
        let cli = Cli::try_parse_from(["gunsmith", "weapons"]).unwrap();
        let Commands::Weapons { search, caliber } = cli.command else {
            panic!("expected weapons command");
        };
        assert_eq!(search, "");
        assert_eq!(caliber, ALL_CALIBERS);
    }
}
