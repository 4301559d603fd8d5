//! HRFlow CLI Entry Point
//!
//! Validates and simulates exported workflow documents from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Simulate a workflow
//! hrflow workflow.json
//!
//! # Only run the structural checks
//! hrflow workflow.json --validate-only
//!
//! # Machine-readable outcome
//! hrflow workflow.json --json
//!
//! # Convert an export to YAML
//! hrflow workflow.json --export workflow.yaml
//!
//! # Show the automation catalog
//! hrflow --list-automations --catalog automations.yaml
//! ```

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use log::{error, info};

use hrflow::catalog::{AutomationCatalog, StaticCatalog};
use hrflow::execution::{SimulationOutcome, Simulator};
use hrflow::workflow::{load_workflow, save_workflow};
use hrflow::{APP_NAME, VERSION};

/// Default workflow file used when none is specified.
const DEFAULT_WORKFLOW: &str = "workflow.json";

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    workflow_path: String,
    validate_only: bool,
    json: bool,
    export_path: Option<String>,
    catalog_path: Option<String>,
    list_automations: bool,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workflow_path: DEFAULT_WORKFLOW.to_string(),
            validate_only: false,
            json: false,
            export_path: None,
            catalog_path: None,
            list_automations: false,
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME.bold(), VERSION);
    println!("HR Workflow Validation and Simulation");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: hrflow [OPTIONS] <WORKFLOW_FILE>");
    println!();
    println!("Arguments:");
    println!("  <WORKFLOW_FILE>       Exported workflow (.json, .yaml or .yml)");
    println!();
    println!("Options:");
    println!("  --validate-only       Run structural checks without simulating");
    println!("  --json                Print the outcome as JSON");
    println!("  --export PATH         Write the loaded workflow to PATH (format by extension)");
    println!("  --catalog PATH        Automation catalog file (default: built-in actions)");
    println!("  --list-automations    Print the automation catalog and exit");
    println!("  --verbose             Enable debug logging");
    println!("  --help                Show this help message");
    println!("  --version             Show version information");
    println!();
    println!("Examples:");
    println!("  hrflow onboarding.json");
    println!("  hrflow onboarding.json --validate-only");
    println!("  hrflow onboarding.json --export onboarding.yaml");
}

/// What the parsed arguments ask for.
enum Command {
    Run(Config),
    Help,
    Version,
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Command, String> {
    let mut config = Config::default();
    let mut positional_index = 0;
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--validate-only" => config.validate_only = true,
            "--json" => config.json = true,
            "--list-automations" => config.list_automations = true,
            "--verbose" | "-v" => config.verbose = true,
            "--export" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "--export requires a path argument".to_string())?;
                config.export_path = Some(path.clone());
            }
            "--catalog" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "--catalog requires a path argument".to_string())?;
                config.catalog_path = Some(path.clone());
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                match positional_index {
                    0 => config.workflow_path = arg.clone(),
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    Ok(Command::Run(config))
}

/// Prints the automation catalog.
fn print_automations(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match &config.catalog_path {
        Some(path) => StaticCatalog::load(path)?,
        None => StaticCatalog::builtin(),
    };
    let automations = catalog.list_automations();

    if config.json {
        println!("{}", serde_json::to_string_pretty(&automations)?);
        return Ok(());
    }

    println!("Available automations ({}):", automations.len());
    for automation in &automations {
        println!(
            "  {} {} ({})",
            format!("{:16}", automation.id).cyan(),
            automation.label,
            automation.params.join(", ")
        );
    }
    Ok(())
}

/// Prints a simulation outcome for humans.
fn print_outcome(outcome: &SimulationOutcome, validate_only: bool) {
    match outcome {
        SimulationOutcome::Failure { errors } => {
            println!("{}", "Validation Errors".red().bold());
            for err in errors {
                println!("  - {}", err);
            }
        }
        SimulationOutcome::Success {
            steps,
            message,
            unreached,
        } => {
            if validate_only {
                println!("{}", "Workflow is valid".green().bold());
                return;
            }

            println!("{}", message.green().bold());
            println!();
            println!("Execution Steps:");
            for step in steps {
                println!(
                    "  {:>3}. {} [{}]",
                    step.step_number,
                    step.label.bold(),
                    step.status
                );
                println!("       {}", step.details);
            }

            if !unreached.is_empty() {
                println!();
                println!(
                    "{} {}",
                    "Not reached from Start:".yellow(),
                    unreached.join(", ")
                );
            }
        }
    }
}

/// Main application entry point.
fn run(config: Config) -> Result<bool, Box<dyn std::error::Error>> {
    setup_logging(config.verbose);

    if config.list_automations {
        print_automations(&config)?;
        return Ok(true);
    }

    if !config.json {
        print_banner();
    }

    let graph = load_workflow(&config.workflow_path).map_err(|e| {
        error!("Failed to load workflow: {}", e);
        e
    })?;

    info!(
        "Workflow loaded: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    if let Some(path) = &config.export_path {
        save_workflow(&graph, path)?;
        if !config.json {
            println!("Exported workflow to {}", path);
            println!();
        }
    }

    let report = Simulator::report(&graph);
    let success = report.outcome.is_success();

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Total Nodes: {}  Total Connections: {}",
            report.node_count, report.edge_count
        );
        println!();
        print_outcome(&report.outcome, config.validate_only);
    }

    Ok(success)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let config = match parse_arguments(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{} {}", APP_NAME, VERSION);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
