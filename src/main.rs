//! sqlite-schema-diff CLI
//!
//! Entry point for the command-line tool. Exit codes: 0 on success, 1 for
//! I/O or database failures, 2 when either schema has parse errors
//! (rendered to stderr), 3 when an unimplemented parser branch is hit.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use sqlite_schema_diff::input::{self, SchemaSource, SqliteDatabase, load_schema_file};
use sqlite_schema_diff::pipeline::{MigrationPipeline, Parsed, PipelineError};
use sqlite_schema_diff::report::{Renderer, Report};
use sqlite_schema_diff::{Config, config};

#[derive(Parser, Debug)]
#[command(name = "sqlite-schema-diff")]
#[command(about = "Generate SQLite DDL migrating a live database to a schema file", long_about = None)]
struct Args {
    /// Path to the SQL file holding the desired schema
    #[arg(required_unless_present = "explain_config")]
    schema: Option<PathBuf>,

    /// Path to the SQLite database holding the current schema
    #[arg(required_unless_present = "explain_config")]
    database: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "sqlite-schema-diff.toml")]
    config: PathBuf,

    /// Override output format (sql, json, plan)
    #[arg(long)]
    format: Option<String>,

    /// Override maximum line width for the printer
    #[arg(long)]
    max_width: Option<usize>,

    /// Override the two-character identifier bracket ("" for bare)
    #[arg(long)]
    quote: Option<String>,

    /// Explain a configuration section (e.g. --explain-config output)
    #[arg(long)]
    explain_config: Option<String>,
}

enum AppError {
    /// Configuration, file, or database trouble.
    Infrastructure(anyhow::Error),
    /// One of the schemas failed to parse; reports already carry labels.
    Parse {
        source_name: String,
        reports: Vec<Report>,
    },
    /// The parser hit a branch that is not built yet.
    Unimplemented(&'static str),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Infrastructure(_) => 1,
            AppError::Parse { .. } => 2,
            AppError::Unimplemented(_) => 3,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Parse {
                source_name,
                reports,
            } => AppError::Parse {
                source_name,
                reports,
            },
            PipelineError::Unimplemented(what) => AppError::Unimplemented(what),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn report_failure(err: &AppError) {
    match err {
        AppError::Infrastructure(e) => eprintln!("error: {e:#}"),
        AppError::Parse {
            source_name,
            reports,
        } => {
            show_reports(reports);
            eprintln!("{} parse error(s) in {}", reports.len(), source_name);
        }
        AppError::Unimplemented(what) => eprintln!("internal error: not implemented: {what}"),
    }
}

fn show_reports(reports: &[Report]) {
    let mut renderer = Renderer::new();
    let mut out = String::new();
    for report in reports {
        renderer.render_into(report, &mut out);
    }
    eprint!("{out}");
}

fn run(args: Args) -> Result<(), AppError> {
    // Handle --explain-config early exit
    if let Some(section) = args.explain_config {
        return config::explain_config(&section)
            .context("Failed to explain configuration")
            .map_err(AppError::Infrastructure);
    }

    // Load configuration
    let mut config = if args.config.exists() {
        Config::from_file(&args.config)
            .context("Failed to load configuration")
            .map_err(AppError::Infrastructure)?
    } else {
        eprintln!(
            "Warning: Config file {} not found, using defaults",
            args.config.display()
        );
        Config::default()
    };

    // CLI overrides
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(max_width) = args.max_width {
        config.output.max_width = max_width;
    }
    if let Some(quote) = args.quote {
        config.output.quote_identifiers = quote;
    }
    config
        .validate()
        .context("Invalid configuration")
        .map_err(AppError::Infrastructure)?;

    let pipeline = MigrationPipeline::from_config(&config);

    // Desired schema: the SQL file. clap enforces both positionals
    // whenever --explain-config is absent.
    let (Some(schema_path), Some(database_path)) = (args.schema, args.database) else {
        return Err(AppError::Infrastructure(anyhow::anyhow!(
            "schema file and database path are required"
        )));
    };
    let desired_source = load_schema_file(&schema_path)
        .context("Failed to read schema file")
        .map_err(AppError::Infrastructure)?;
    let desired = pipeline.parse(desired_source)?;
    show_warnings(&desired);

    // Current schema: exported from the database.
    let database = SqliteDatabase::open(&database_path)
        .context("Failed to open database")
        .map_err(AppError::Infrastructure)?;
    let ddl = database
        .export_data_definitions()
        .context("Failed to read sqlite_schema")
        .map_err(AppError::Infrastructure)?;
    let current_source = input::source_from(database.url(), &ddl);
    let current = pipeline.parse(current_source)?;
    show_warnings(&current);

    let edits = pipeline.diff(&current.program, &desired.program);

    match config.output.format.as_str() {
        "json" => {
            let json = pipeline
                .render_json(&edits)
                .context("Failed to serialize edit plan")
                .map_err(AppError::Infrastructure)?;
            println!("{json}");
        }
        "plan" => print!("{}", pipeline.render_plan(&edits)),
        _ => print!("{}", pipeline.render_sql(&edits)),
    }

    Ok(())
}

fn show_warnings(parsed: &Parsed) {
    if !parsed.warnings.is_empty() {
        show_reports(&parsed.warnings);
    }
}
