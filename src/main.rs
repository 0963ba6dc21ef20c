use std::path::PathBuf;
use std::process;
use clap::{Parser, Subcommand, ValueEnum};
use anyhow::{Result, Context};
use colored::*;
use log::{info, error};
use simple_logger::SimpleLogger;

use unitstyle::core::config::{ColorChoice, OutputFormat, RunnerConfig};
use unitstyle::core::runner::TestRunner;
use unitstyle::demo;


#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format: list, dots, jsstream, json, progress, min, tap or spec
    #[arg(short, long)]
    format: Option<String>,

    /// Load settings from a TOML or JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log what the runner is doing
    #[arg(short, long)]
    verbose: bool,

    /// When to use ANSI colors and cursor movement
    #[arg(long, value_enum)]
    color: Option<ColorArg>,

    /// Stop after the first failure or error
    #[arg(long)]
    failfast: bool,

    /// Ask the executor to buffer test output
    #[arg(long)]
    buffer: bool,

    /// Do not show test descriptions
    #[arg(long)]
    no_descriptions: bool,

    #[command(subcommand)]
    command: Commands,
}


#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}


#[derive(Subcommand)]
enum Commands {
    /// Run one of the bundled demonstration suites
    Demo {
        #[arg(value_enum, default_value_t = DemoSuite::KitchenSink)]
        suite: DemoSuite,
    },

    /// List the available output formats
    Formats,
}


#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DemoSuite {
    Simple,
    KitchenSink,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            process::exit(2);
        }
    }
}


/// Returns whether every test passed.
fn run(cli: Cli) -> Result<bool> {

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    SimpleLogger::new()
        .with_level(log_level)
        .init()
        .context("Failed to initialize logger")?;

    info!("Unitstyle v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => RunnerConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RunnerConfig::default(),
    };
    update_config_from_args(&mut config, &cli);

    let mut suite = match cli.command {
        Commands::Formats => {
            print_formats(config.format);
            return Ok(true);
        }
        Commands::Demo { suite: DemoSuite::Simple } => demo::simple()?,
        Commands::Demo { suite: DemoSuite::KitchenSink } => demo::kitchen_sink()?,
    };

    // Panics inside test bodies are reported as errors; keep the default
    // hook from printing over the report.
    std::panic::set_hook(Box::new(|info| {
        log::debug!("Test panicked: {}", info);
    }));

    let runner = TestRunner::new(config);
    runner
        .install_interrupt_handler()
        .context("Failed to install interrupt handler")?;

    let stats = runner.run(&mut suite).map_err(|e| {
        error!("Test run failed: {}", e);
        e
    })?;

    info!(
        "{} of {} tests passed in {}",
        stats.passed,
        stats.tests_run,
        humantime::format_duration(stats.timing.map(|t| t.elapsed()).unwrap_or_default())
    );

    Ok(stats.successful())
}


fn update_config_from_args(config: &mut RunnerConfig, cli: &Cli) {
    if let Some(format) = &cli.format {
        config.format = OutputFormat::from_name(format);
    }

    if let Some(color) = cli.color {
        config.color = match color {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
        };
    }

    if cli.failfast {
        config.failfast = true;
    }

    if cli.buffer {
        config.buffer = true;
    }

    if cli.no_descriptions {
        config.descriptions = false;
    }

    if cli.verbose {
        config.verbosity = config.verbosity.max(2);
    }
}


fn print_formats(selected: OutputFormat) {
    println!("Available formats:");
    for format in OutputFormat::ALL {
        let marker = if format == selected { "*" } else { " " };
        println!("{} {:<10} {}", marker, format.name().cyan().bold(), format.summary());
    }
}
