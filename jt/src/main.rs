//! JournalTemplate - daily journal helpers
//!
//! CLI entry point for word counts and stoic prompts.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use journaltemplate::cli::{Cli, Command};
use journaltemplate::config::Config;
use journaltemplate::stoic::{
    JsonProgressStore, MemoryProgressStore, Persisted, ProgressStore, PromptTable, StoicScheduler, format_prompts,
    wrap_day,
};
use journaltemplate::wordcount::wordcount;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install subscriber: {}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Wordcount { file, goal } => cmd_wordcount(&config, file.as_deref(), goal),
        Command::Stoic { date, dry_run } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            cmd_stoic(&config, today, dry_run)
        }
        Command::Progress => cmd_progress(&config),
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

fn cmd_wordcount(config: &Config, file: Option<&Path>, goal: bool) -> Result<()> {
    let content = read_input(file)?;
    let count = wordcount(&content);
    println!("{}", count);
    if goal {
        println!("Goal WC: {}", count + config.wordcount.goal);
    }
    Ok(())
}

fn cmd_stoic(config: &Config, today: NaiveDate, dry_run: bool) -> Result<()> {
    let table = PromptTable::load(&config.stoic.prompts_file).context(format!(
        "Failed to load stoic prompts from {}",
        config.stoic.prompts_file.display()
    ))?;
    info!(%today, dry_run, "cmd_stoic: scheduling prompts");

    let outcome = if dry_run {
        // Seed from the real file but keep every write in memory
        let seed = JsonProgressStore::new(&config.stoic.progress_file).load();
        let scheduler = StoicScheduler::new(table, MemoryProgressStore::with_progress(seed), config.stoic.catchup_rate);
        let outcome = scheduler.run(today)?;
        if let Some(progress) = scheduler.store().current()
            && scheduler.store().writes() > 0
        {
            eprintln!("{} {}", "would save:".yellow(), serde_json::to_string(&progress)?);
        }
        outcome
    } else {
        let store = JsonProgressStore::new(&config.stoic.progress_file);
        StoicScheduler::new(table, store, config.stoic.catchup_rate).run(today)?
    };

    print!("{}", format_prompts(&outcome.entries));

    if let Persisted::Failed(e) = &outcome.persisted {
        eprintln!(
            "{} stoic progress was not saved ({}); the same prompts may appear next run",
            "warning:".yellow().bold(),
            e
        );
    }
    Ok(())
}

fn cmd_progress(config: &Config) -> Result<()> {
    let store = JsonProgressStore::new(&config.stoic.progress_file);
    let progress = store.load();
    println!("Progress file: {}", store.path().display().to_string().cyan());
    println!("  Day: {} (cycle day {})", progress.day, wrap_day(progress.day));
    println!("  Updated on: {}", progress.updated_on);
    Ok(())
}
