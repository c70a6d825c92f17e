mod registry;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crmsynth_generate::{
    GenerationConfig, GenerationEngine, GenerationError, OutputFormat, verify_dataset,
    write_dataset,
};
use registry::{
    RunContext, init_run_logging, start_run, write_generation_report, write_verification_report,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),
    #[error("dataset verification failed with {0} violation(s)")]
    VerificationFailed(usize),
}

#[derive(Parser, Debug)]
#[command(name = "crmsynth", version, about = "Synthetic CRM dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset into a new run directory.
    Generate(GenerateArgs),
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML configuration file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// File format for entity collections.
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,
    /// Verify dataset invariants and fail the run on any violation.
    #[arg(long, default_value_t = false)]
    verify: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// First business date (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Last business date (YYYY-MM-DD).
    #[arg(long)]
    end_date: Option<NaiveDate>,
    /// Reference "today" (YYYY-MM-DD); defaults to the end date.
    #[arg(long)]
    as_of: Option<NaiveDate>,
    #[arg(long)]
    users: Option<usize>,
    #[arg(long)]
    accounts: Option<usize>,
    /// Cap on contacts; derived from account size when absent.
    #[arg(long)]
    contacts: Option<usize>,
    #[arg(long)]
    leads: Option<usize>,
    #[arg(long)]
    campaigns: Option<usize>,
    #[arg(long)]
    products: Option<usize>,
    #[arg(long)]
    opportunities: Option<usize>,
    #[arg(long)]
    activities: Option<usize>,
}

impl GenerateArgs {
    fn resolve_config(&self) -> Result<GenerationConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(start) = self.start_date {
            config.start_date = start;
        }
        if let Some(end) = self.end_date {
            config.end_date = end;
        }
        if self.as_of.is_some() {
            config.as_of = self.as_of;
        }
        if self.contacts.is_some() {
            config.counts.contacts = self.contacts;
        }
        let counts = &mut config.counts;
        let overrides = [
            (&mut counts.users, self.users),
            (&mut counts.accounts, self.accounts),
            (&mut counts.leads, self.leads),
            (&mut counts.campaigns, self.campaigns),
            (&mut counts.products, self.products),
            (&mut counts.opportunities, self.opportunities),
            (&mut counts.activities, self.activities),
        ];
        for (target, value) in overrides {
            if let Some(value) = value {
                *target = value;
            }
        }
        Ok(config)
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Config => {
            print!("{}", toml::to_string_pretty(&GenerationConfig::default())?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<GenerationConfig, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let config = args.resolve_config()?;
    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir: args.run_dir.clone(),
        format: args.format.into(),
        verify: args.verify,
        config: config.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, seed = config.seed);
    let timer = Instant::now();

    let result = GenerationEngine::new(config).run().inspect_err(|err| {
        tracing::error!(event = "run_finished", status = "failed", error = %err);
    })?;
    write_generation_report(&run_paths, &result.report)?;

    let files = write_dataset(&run_paths.data_dir, &result.dataset, run_ctx.format)?;
    let bytes: u64 = files.iter().map(|file| file.bytes).sum();
    tracing::info!(
        event = "dataset_written",
        files = files.len(),
        bytes,
        path = %run_paths.data_dir.display()
    );

    if run_ctx.verify {
        let verification = verify_dataset(&result.dataset);
        write_verification_report(&run_paths, &verification)?;
        if !verification.is_clean() {
            for (code, count) in verification.count_by_code() {
                tracing::error!(event = "verification_failed", code, count);
            }
            return Err(CliError::VerificationFailed(verification.violations.len()));
        }
        tracing::info!(
            event = "verification_passed",
            records = verification.records_checked
        );
    }

    let duration_ms = timer.elapsed().as_millis() as u64;
    tracing::info!(
        event = "run_finished",
        status = "success",
        duration_ms,
        fingerprint = %result.report.fingerprint
    );
    println!("{}", run_paths.root.display());

    Ok(())
}
