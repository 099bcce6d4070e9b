use clap::{Parser, Subcommand};
use corpus_core::core::abbreviations::AbbreviationTable;
use corpus_core::extract::job::WriteOptions;
use corpus_core::persistence::{export_json, load_snapshot, save_snapshot};
use corpus_core::report::Printer;
use corpus_core::{CorpusEngine, CorpusError};
use crossterm::tty::IsTty;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tika")]
#[command(about = "Extract, index and check a corpus of root-text and commentary snippets")]
struct Cli {
    /// Configuration file; defaults are used when it does not exist
    #[arg(short, long, global = true, default_value = "tika.toml")]
    config: PathBuf,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "debug", global = true)]
    debug: bool,
    /// Never colour the output
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split configured source documents into snippet files
    Extract {
        /// Run only this job
        #[arg(short, long)]
        job: Option<String>,
        /// Report what would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
        /// Replace snippet files that already exist
        #[arg(long)]
        overwrite: bool,
        /// Print the first N extracted passages of each job
        #[arg(long, default_value = "0")]
        preview: usize,
    },
    /// Count root-commentary pairs in a snippet directory
    Pairs {
        dir: PathBuf,
        /// Show examples and a per-text breakdown
        #[arg(long)]
        verbose: bool,
        /// List every file in the directory
        #[arg(long)]
        list_files: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check names, abbreviations and pairing of a snippet directory
    Validate {
        dir: PathBuf,
        #[arg(long)]
        json: bool,
        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
    /// Inspect the abbreviation table
    Abbrev {
        #[command(subcommand)]
        command: AbbrevCommands,
    },
    /// Build or inspect a saved corpus index
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
}

#[derive(Subcommand)]
enum AbbrevCommands {
    /// List every known code
    List,
    /// Show one code, or the closest known one
    Show { code: String },
    /// Compare the tables of two Markdown files
    Drift { left: PathBuf, right: PathBuf },
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Scan a directory and save the index
    Build {
        dir: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        /// Also export the index as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Summarise a saved index
    Show { file: PathBuf },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    let printer = Printer::new(!cli.no_color && io::stdout().is_tty());
    let engine = CorpusEngine::from_config_or_default(&cli.config)?;
    debug!(
        "Loaded {} abbreviation(s) and {} job(s)",
        engine.abbreviations.len(),
        engine.config.jobs.len()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Commands::Extract {
            job,
            dry_run,
            overwrite,
            preview,
        } => {
            let options = WriteOptions { overwrite, dry_run };
            let reports = match job {
                Some(name) => vec![engine.run_job(&name, options)?],
                None => engine.run_jobs(options)?,
            };
            if reports.is_empty() {
                info!("No extraction jobs configured in {}", cli.config.display());
            }
            for report in &reports {
                printer.job(&mut out, report, preview)?;
            }
            ExitCode::SUCCESS
        }
        Commands::Pairs {
            dir,
            verbose,
            list_files,
            json,
        } => {
            let index = engine.scan(&dir)?;
            let summary = engine.pairs(&index);
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                if list_files {
                    printer.file_list(&mut out, &dir, &index.all_files())?;
                    writeln!(out)?;
                }
                printer.pair_summary(&mut out, &summary, verbose)?;
            }
            ExitCode::SUCCESS
        }
        Commands::Validate { dir, json, strict } => {
            let index = engine.scan(&dir)?;
            let report = engine.validate(&index);
            if json {
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                printer.validation(&mut out, &report)?;
            }
            if report.passes(strict) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Abbrev { command } => match command {
            AbbrevCommands::List => {
                printer.abbreviations(&mut out, &engine.abbreviations)?;
                ExitCode::SUCCESS
            }
            AbbrevCommands::Show { code } => match engine.lookup(&code) {
                Some(entry) => {
                    match &entry.author {
                        Some(author) => writeln!(out, "{}: {} ({})", entry.code, entry.title, author)?,
                        None => writeln!(out, "{}: {}", entry.code, entry.title)?,
                    }
                    ExitCode::SUCCESS
                }
                None => {
                    match engine.suggest(&code) {
                        Some(near) => writeln!(out, "unknown code `{}`; did you mean `{}`?", code, near)?,
                        None => writeln!(out, "unknown code `{}`", code)?,
                    }
                    ExitCode::FAILURE
                }
            },
            AbbrevCommands::Drift { left, right } => {
                let drift = read_table(&left)?.drift(&read_table(&right)?);
                printer.drift(
                    &mut out,
                    &drift,
                    &left.display().to_string(),
                    &right.display().to_string(),
                )?;
                if drift.is_empty() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
        },
        Commands::Index { command } => match command {
            IndexCommands::Build { dir, out: file, json } => {
                let index = engine.scan(&dir)?;
                save_snapshot(&index, &file)?;
                info!("Saved index of {} snippet(s) to {}", index.snippet_count(), file.display());
                if let Some(json) = json {
                    export_json(&index, &json)?;
                    info!("Exported index to {}", json.display());
                }
                printer.index(&mut out, &index)?;
                ExitCode::SUCCESS
            }
            IndexCommands::Show { file } => {
                let index = load_snapshot(&file)?;
                printer.index(&mut out, &index)?;
                ExitCode::SUCCESS
            }
        },
    };

    out.flush()?;
    Ok(code)
}

fn read_table(path: &Path) -> Result<AbbreviationTable, CorpusError> {
    let text = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    Ok(AbbreviationTable::from_markdown(&text))
}
