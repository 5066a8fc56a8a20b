use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use oc_app::{
    AppError, AppResult, Session, SessionConfig, SessionEvent, SessionOutput, UploadOutcome,
    load_config,
};
use oc_core::ChartType;
use oc_data::UploadFile;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "oc-cli")]
#[command(about = "OptiCompare CLI - compare image-analysis results of optical samples", long_about = None)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// Session config YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding uploaded datasets (overrides config)
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,
    /// Analysis type the datasets are grouped under (overrides config)
    #[arg(long, global = true)]
    analysis_type: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload measurement CSV files
    Upload {
        /// CSV files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List stored datasets
    List,
    /// Render a comparison figure over every stored dataset
    Render {
        /// Chart type to render (see `chart-types`)
        #[arg(long, default_value = "scatter")]
        chart_type: ChartType,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the chart types a chart can show
    ChartTypes,
    /// Delete every stored dataset
    Reset,
    /// Replay a YAML event script in one session and print the charts
    Replay {
        /// Path to the event script (a YAML list of events)
        script: PathBuf,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli.session)?;
    info!(
        storage_root = %config.storage_root.display(),
        analysis_type = %config.analysis_type,
        "session config"
    );

    match cli.command {
        Commands::Upload { files } => cmd_upload(config, &files),
        Commands::List => cmd_list(config),
        Commands::Render { chart_type, output } => cmd_render(config, chart_type, output.as_deref()),
        Commands::ChartTypes => cmd_chart_types(),
        Commands::Reset => cmd_reset(config),
        Commands::Replay { script, output } => cmd_replay(config, &script, output.as_deref()),
    }
}

fn resolve_config(args: &SessionArgs) -> AppResult<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(root) = &args.storage_root {
        config.storage_root = root.clone();
    }
    if let Some(analysis_type) = &args.analysis_type {
        config.analysis_type = analysis_type.clone();
    }
    Ok(config)
}

fn read_upload(path: &Path) -> AppResult<UploadFile> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| AppError::InvalidInput(format!("not a file: {}", path.display())))?;
    let bytes = std::fs::read(path)?;
    let last_modified: DateTime<Utc> = std::fs::metadata(path)?
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());
    Ok(UploadFile::from_bytes(filename, &bytes, last_modified))
}

fn cmd_upload(config: SessionConfig, files: &[PathBuf]) -> AppResult<()> {
    let uploads = files
        .iter()
        .map(|path| read_upload(path))
        .collect::<AppResult<Vec<_>>>()?;

    let mut session = Session::new(config)?;
    match session.dispatch(SessionEvent::Upload { files: uploads }) {
        Ok(SessionOutput::Uploads(outcomes)) => {
            print_outcomes(&outcomes);
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(err) => {
            if let AppError::PartialBatch { outcomes, .. } = &err {
                print_outcomes(outcomes);
            }
            Err(err)
        }
    }
}

fn print_outcomes(outcomes: &[UploadOutcome]) {
    for outcome in outcomes {
        match outcome {
            UploadOutcome::Accepted(summary) => println!("✓ {}", summary),
            UploadOutcome::Rejected { filename, message } => {
                println!("✗ {}: {}", filename, message)
            }
        }
    }
}

fn cmd_list(config: SessionConfig) -> AppResult<()> {
    let session = Session::new(config)?;
    let datasets = session.ingestion().list_datasets()?;

    if datasets.is_empty() {
        println!("No datasets found");
    } else {
        println!("Stored datasets:");
        for (name, table) in datasets {
            println!("  {} ({} entries)", name, table.len());
        }
    }
    Ok(())
}

fn cmd_render(config: SessionConfig, chart_type: ChartType, output: Option<&Path>) -> AppResult<()> {
    let session = Session::new(config)?;
    let datasets = session.ingestion().list_datasets()?;
    let figure = oc_viz::render(chart_type, &datasets);
    write_json(&figure.to_json()?, output)
}

fn cmd_chart_types() -> AppResult<()> {
    for chart_type in ChartType::ALL {
        println!("  {:<16} {}", chart_type.as_str(), chart_type.label());
    }
    Ok(())
}

fn cmd_reset(config: SessionConfig) -> AppResult<()> {
    let mut session = Session::new(config)?;
    // The CLI reset is always an explicit click.
    match session.dispatch(SessionEvent::Reset { count: 1 })? {
        SessionOutput::Reset {
            message: Some(message),
            ..
        } => println!("{}", message),
        _ => println!("Nothing to delete"),
    }
    Ok(())
}

fn cmd_replay(config: SessionConfig, script: &Path, output: Option<&Path>) -> AppResult<()> {
    let content = std::fs::read_to_string(script)?;
    let events: Vec<SessionEvent> = serde_yaml::from_str(&content)
        .map_err(|e| AppError::InvalidInput(format!("Failed to parse event script: {}", e)))?;

    let mut session = Session::new(config)?;
    for event in events {
        match session.dispatch(event)? {
            SessionOutput::Uploads(outcomes) => {
                for outcome in outcomes {
                    if let UploadOutcome::Rejected { filename, message } = outcome {
                        eprintln!("✗ {}: {}", filename, message);
                    }
                }
            }
            SessionOutput::Reset {
                message: Some(message),
                ..
            } => eprintln!("{}", message),
            _ => {}
        }
    }

    let charts = session.render_charts()?;
    write_json(&serde_json::to_string_pretty(&charts)?, output)
}

fn write_json(json: &str, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("✓ Wrote {}", path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}
