// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use range_strip::config::DEFAULT_CONFIG_PATH;
use range_strip::utils::logging::{format_error, format_pass, format_success, format_warning};
use range_strip::{
    Config, LineRangeStripper, OperationTimer, PassJournal, PassRunner, RemovalRange, StripOptions,
    StripReport, Validator,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "range_strip")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Remove hardcoded line ranges of orphaned code from source files", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Defaults to `list`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Copy)]
struct StripFlags {
    /// Report what would be removed without writing
    #[arg(long)]
    dry_run: bool,

    /// Keep a copy of the original next to the target
    #[arg(long)]
    backup: bool,

    /// Refuse inverted or out-of-bounds ranges instead of warning
    #[arg(long)]
    strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run configured passes
    Run {
        /// Name of the pass to run
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        pass: Option<String>,

        /// Run every configured pass in declared order
        #[arg(long)]
        all: bool,

        /// Run even if the journal shows the pass was already applied
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        flags: StripFlags,
    },

    /// Strip a half-open line range [start, end) from a file
    Strip {
        file: PathBuf,

        #[arg(long)]
        start: usize,

        #[arg(long)]
        end: usize,

        #[command(flatten)]
        flags: StripFlags,
    },

    /// List configured passes
    List,

    /// Show applied passes from the journal
    History {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }
    range_strip::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    if let Err(e) = dispatch(&config, cli.command.unwrap_or(Commands::List)).await {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            pass,
            all,
            force,
            flags,
        } => {
            cmd_run(config, pass.as_deref(), all, force, flags).await?;
        }
        Commands::Strip {
            file,
            start,
            end,
            flags,
        } => {
            cmd_strip(config, file, RemovalRange::new(start, end), flags).await?;
        }
        Commands::List => {
            cmd_list(config);
        }
        Commands::History { json } => {
            cmd_history(config, json).await?;
        }
    }

    Ok(())
}

fn strip_options(config: &Config, flags: StripFlags) -> StripOptions {
    StripOptions {
        dry_run: flags.dry_run,
        backup: flags.backup || config.output.backup,
        backup_suffix: config.output.backup_suffix.clone(),
        strict: flags.strict,
    }
}

async fn cmd_run(
    config: &Config,
    pass: Option<&str>,
    all: bool,
    force: bool,
    flags: StripFlags,
) -> Result<()> {
    let passes = if all {
        config.passes.clone()
    } else {
        let name = pass.context("--pass or --all is required")?;
        let selected = config
            .find_pass(name)
            .with_context(|| format!("No pass named {} in configuration", name))?;
        vec![selected.clone()]
    };

    if passes.is_empty() {
        warn!("No passes configured");
        return Ok(());
    }

    let mut runner = PassRunner::from_config(config, strip_options(config, flags), force)
        .await
        .context("Failed to open pass journal")?;

    let timer = OperationTimer::new(&format!("{} passes", passes.len()));
    let mut reports = Vec::with_capacity(passes.len());

    for pass in &passes {
        let report = runner
            .run_pass(pass)
            .await
            .with_context(|| format!("Pass {} failed", pass.name))?;
        if !flags.json {
            print_report(&report, false)?;
        }
        reports.push(report);
    }

    timer.finish();

    if flags.json {
        println!("{}", StripReport::to_json_array(&reports, true)?);
    }

    Ok(())
}

async fn cmd_strip(
    config: &Config,
    file: PathBuf,
    range: RemovalRange,
    flags: StripFlags,
) -> Result<()> {
    Validator::validate_file_path(&file)?;

    let stripper = LineRangeStripper::new(strip_options(config, flags));
    let report = stripper
        .strip(&file, range)
        .await
        .with_context(|| format!("Failed to strip {}", file.display()))?;

    print_report(&report, flags.json)
}

fn cmd_list(config: &Config) {
    if config.passes.is_empty() {
        println!("No passes configured");
        return;
    }

    for pass in &config.passes {
        println!(
            "{}",
            format_pass(&pass.name, &pass.range(), &pass.target().display().to_string())
        );
        if let Some(description) = &pass.description {
            println!("    {}", description);
        }
    }
}

async fn cmd_history(config: &Config, json: bool) -> Result<()> {
    let journal = PassJournal::load(&config.journal.path)
        .await
        .context("Failed to load pass journal")?;

    if json {
        println!("{}", serde_json::to_string_pretty(journal.entries())?);
        return Ok(());
    }

    if journal.entries().is_empty() {
        println!("No passes applied yet");
        return Ok(());
    }

    for entry in journal.entries() {
        println!(
            "{}  {}  {} -> {} lines",
            entry.applied_at,
            format_pass(&entry.pass, &entry.range, &entry.path.display().to_string()),
            entry.original_lines,
            entry.kept_lines
        );
    }

    Ok(())
}

fn print_report(report: &StripReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json(true)?);
        return Ok(());
    }

    if report.dry_run {
        println!("{}", format_warning("Dry run, nothing written"));
    }
    println!("{}", format_success(&report.removed_line()));
    println!("{}", report.reduced_line());

    if let Some(backup) = &report.backup {
        println!("Original saved to {}", backup.display());
    }

    Ok(())
}
