//! The command line interface for the building management system.
use crate::building::Building;
use crate::input::load_buildings;
use crate::log;
use crate::output::{save_buildings, write_buildings};
use crate::room::RoomState;
use crate::settings::Settings;
use crate::timer::TimedItemManager;
use ::log::info;
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the building management system.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for commands which write a save file
#[derive(Args)]
pub struct SaveOpts {
    /// Path of the save file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Whether to overwrite the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check that a save file is valid.
    Validate {
        /// Path to the save file.
        file: PathBuf,
    },
    /// Load a save file and write it back out in canonical form (to stdout if no output is given).
    Save {
        /// Path to the save file.
        file: PathBuf,
        /// Where to write the buildings
        #[command(flatten)]
        opts: SaveOpts,
    },
    /// Load a save file and run its buildings forward in time.
    Simulate {
        /// Path to the save file.
        file: PathBuf,
        /// How many minutes to simulate
        #[arg(short, long)]
        minutes: u32,
        /// Where to write the buildings once the simulation is complete
        #[command(flatten)]
        opts: SaveOpts,
    },
    /// Manage the program settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Validate { file } => handle_validate_command(&file, None),
            Self::Save { file, opts } => handle_save_command(&file, &opts, None),
            Self::Simulate {
                file,
                minutes,
                opts,
            } => handle_simulate_command(&file, minutes, &opts, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ bms --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings if they weren't provided, then start the logger
fn init(settings: Option<Settings>) -> Result<Settings> {
    let settings = match settings {
        Some(settings) => settings,
        None => Settings::load().context("Failed to load settings.")?,
    };

    if !log::is_logger_initialised() {
        log::init(Some(&settings.log_level)).context("Failed to initialise logging.")?;
    }

    Ok(settings)
}

/// Load buildings, registering their maintenance schedules with `timer`
fn load(file_path: &Path, timer: &mut TimedItemManager) -> Result<Vec<Building>> {
    load_buildings(file_path, timer)
        .with_context(|| format!("Failed to load buildings from {}.", file_path.display()))
}

/// Handle the `validate` command.
pub fn handle_validate_command(file_path: &Path, settings: Option<Settings>) -> Result<()> {
    init(settings)?;
    load(file_path, &mut TimedItemManager::default())?;
    info!("Save file is valid!");

    Ok(())
}

/// Handle the `save` command.
pub fn handle_save_command(
    file_path: &Path,
    opts: &SaveOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = init(settings)?;
    let buildings = load(file_path, &mut TimedItemManager::default())?;
    match &opts.output {
        Some(output) => save_buildings(output, &buildings, opts.overwrite || settings.overwrite)?,
        None => write_buildings(std::io::stdout().lock(), &buildings)
            .context("Failed to write buildings to stdout.")?,
    }

    Ok(())
}

/// Handle the `simulate` command.
pub fn handle_simulate_command(
    file_path: &Path,
    minutes: u32,
    opts: &SaveOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = init(settings)?;
    let mut timer = TimedItemManager::default();
    let mut buildings = load(file_path, &mut timer)?;

    for _ in 0..minutes {
        timer.elapse_one_minute(&mut buildings);
    }
    info!("Simulated {} minute(s)", timer.minutes_elapsed());
    report(&buildings);

    if let Some(output) = &opts.output {
        save_buildings(output, &buildings, opts.overwrite || settings.overwrite)?;
    }

    Ok(())
}

/// Log where maintenance is happening and which rooms are being evacuated
fn report(buildings: &[Building]) {
    for building in buildings {
        for floor in building.floors().values() {
            if let Some(schedule) = floor.maintenance_schedule() {
                info!(
                    "{}, floor {}: maintaining room {}",
                    building.name(),
                    floor.number(),
                    schedule.current_room()
                );
            }

            let evacuating = floor
                .rooms()
                .values()
                .filter(|room| room.evaluate_room_state() == RoomState::Evacuate)
                .map(|room| room.number())
                .collect_vec();
            if !evacuating.is_empty() {
                info!(
                    "{}, floor {}: evacuating room(s) {}",
                    building.name(),
                    floor.number(),
                    evacuating.iter().join(", ")
                );
            }
        }
    }
}
