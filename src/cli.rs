//! The command line interface for the feasibility engine.
use crate::appraisal::appraise_model;
use crate::input::load_model;
use crate::log;
use crate::output::{
    create_output_directory, get_output_dir, write_appraisal, write_scenario_comparison,
};
use crate::portfolio::{PortfolioSummary, compare_scenarios};
use crate::regional::recommend;
use crate::scenario::{ScenarioType, parse_scenario, resolve};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the feasibility engine.
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

/// Options for the `run` command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Market scenario to apply, instead of the one given in the model
    #[arg(short, long, value_parser = parse_scenario)]
    pub scenario: Option<ScenarioType>,
    /// Weight of economic performance in the priority score (0 to 1)
    #[arg(short, long)]
    pub economic_weight: Option<f64>,
    /// Number of regions to recommend
    #[arg(long)]
    pub top_n: Option<usize>,
}

/// Options for the `compare` command
#[derive(Args)]
pub struct CompareOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Weight of economic performance in the priority score (0 to 1)
    #[arg(short, long)]
    pub economic_weight: Option<f64>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Appraise a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Appraise a model under every preset scenario and compare the results.
    Compare {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other options
        #[command(flatten)]
        opts: CompareOpts,
    },
    /// List the market scenarios and their multipliers.
    Scenarios,
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Compare { model_dir, opts } => handle_compare_command(&model_dir, &opts, None),
            Self::Scenarios => {
                handle_scenarios_command();
                Ok(())
            }
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ biogas-feasibility --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        // No command provided. Show help.
        Cli::command().print_long_help()?;
    }

    Ok(())
}

/// Load program settings, if not provided
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Create the output folder and start logging to it.
///
/// The output folder is `output_dir` if given, otherwise one named after the model under the
/// results root.
fn prepare_output_dir(
    model_path: &Path,
    output_dir: Option<&Path>,
    settings: &Settings,
) -> Result<PathBuf> {
    let output_path = if let Some(p) = output_dir {
        p.to_path_buf()
    } else {
        get_output_dir(model_path, settings.results_root.clone())?
    };

    let overwrite =
        create_output_directory(&output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(&output_path))
        .context("Failed to initialise logging.")?;

    info!("Starting biogas-feasibility v{}", env!("CARGO_PKG_VERSION"));
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = settings_or_load(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }
    if let Some(top_n) = opts.top_n {
        settings.top_n_regions = top_n;
    }

    // The output folder is only touched once the model has been appraised successfully
    let model = load_model(model_path).context("Failed to load model.")?;
    let appraisal = appraise_model(&model, opts.scenario, opts.economic_weight)
        .context("Invalid configuration.")?;

    let output_path = prepare_output_dir(model_path, opts.output_dir.as_deref(), &settings)?;
    info!("Loaded model from {}", model_path.display());
    model.parameters.economics.warn_if_unusual();
    appraisal.log_skipped();
    PortfolioSummary::from_appraisal(&appraisal).log();

    let recommended = recommend(&appraisal.regions, settings.top_n_regions);
    info!(
        "Recommended regions: {}",
        recommended.iter().map(|summary| &summary.region_id).join(", ")
    );

    write_appraisal(
        &output_path,
        model_path,
        &appraisal,
        settings.top_n_regions,
    )
    .context("Failed to write output files.")?;
    info!("Appraisal complete!");

    Ok(())
}

/// Handle the `compare` command.
pub fn handle_compare_command(
    model_path: &Path,
    opts: &CompareOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = settings_or_load(settings)?;
    if opts.overwrite {
        settings.overwrite = true;
    }

    let model = load_model(model_path).context("Failed to load model.")?;
    let summaries =
        compare_scenarios(&model, opts.economic_weight).context("Invalid configuration.")?;

    let output_path = prepare_output_dir(model_path, opts.output_dir.as_deref(), &settings)?;
    info!("Loaded model from {}", model_path.display());
    model.parameters.economics.warn_if_unusual();
    for summary in &summaries {
        info!("Scenario {}:", summary.scenario);
        summary.log();
    }

    write_scenario_comparison(&output_path, model_path, &summaries)
        .context("Failed to write output files.")?;
    info!("Scenario comparison complete!");

    Ok(())
}

/// Handle the `scenarios` command.
fn handle_scenarios_command() {
    println!("scenario,commodity,electricity,capital,operating,carbon,description");
    for scenario in ScenarioType::ALL {
        let m = resolve(scenario);
        println!(
            "{scenario},{},{},{},{},{},{}",
            m.commodity,
            m.electricity,
            m.capital,
            m.operating,
            m.carbon,
            scenario.description()
        );
    }
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the model
    let model = load_model(model_path).context("Failed to validate model.")?;
    info!(
        "Model validation successful! ({} entities)",
        model.entities.len()
    );

    Ok(())
}
