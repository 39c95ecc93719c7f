//! Reportal CLI - inspect report parameter metadata offline
//!
//! Usage:
//!   reportal fields <descriptors.json> --module <id>
//!   reportal validate <descriptors.json> --module <id> [--values <values.json>]
//!   reportal payload <descriptors.json> --module <id> [--values <values.json>]
//!   reportal page <rows.json> [--page <n>] [--size <n>]
//!
//! Examples:
//!   reportal fields demos/client_activity.json --module 42
//!   reportal payload demos/client_activity.json --module 42 --values filled.json
//!   reportal page demos/rows.json --page 1 --size 10

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use reportal::context::SessionContext;
use reportal::filter::{self, FieldValue, FilterValueStore};
use reportal::render;
use reportal::report::{Pager, DEFAULT_PAGE_SIZE};
use reportal::schema::{interpret, FilterField, FilterLayout, RawDescriptor};
use reportal::service::ReportRow;

#[derive(Parser)]
#[command(name = "reportal")]
#[command(about = "Reportal - metadata-driven report parameter engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a descriptor file into filter fields
    Fields {
        /// Path to the descriptor JSON file
        file: PathBuf,

        /// Module id to interpret for
        #[arg(short, long)]
        module: i64,

        /// Report id (enables per-report overrides)
        #[arg(short, long, default_value_t = 0)]
        report: i64,
    },

    /// Check mandatory filters against a value file
    Validate {
        /// Path to the descriptor JSON file
        file: PathBuf,

        #[arg(short, long)]
        module: i64,

        #[arg(short, long, default_value_t = 0)]
        report: i64,

        /// JSON object of item name to value, overriding seeded defaults
        #[arg(long)]
        values: Option<PathBuf>,
    },

    /// Print the serialized execution payload
    Payload {
        /// Path to the descriptor JSON file
        file: PathBuf,

        #[arg(short, long)]
        module: i64,

        #[arg(short, long, default_value_t = 0)]
        report: i64,

        #[arg(long)]
        values: Option<PathBuf>,
    },

    /// Render one page of a saved result-row file
    Page {
        /// Path to a JSON array of result rows
        file: PathBuf,

        /// Zero-based page index
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields {
            file,
            module,
            report,
        } => cmd_fields(file, module, report),
        Commands::Validate {
            file,
            module,
            report,
            values,
        } => cmd_validate(file, module, report, values),
        Commands::Payload {
            file,
            module,
            report,
            values,
        } => cmd_payload(file, module, report, values),
        Commands::Page { file, page, size } => cmd_page(file, page, size),
    }
}

fn cmd_fields(file: PathBuf, module: i64, report: i64) -> ExitCode {
    let layout = match load_layout(&file, module, report) {
        Ok(layout) => layout,
        Err(message) => return fail(&message),
    };

    if layout.is_empty() {
        println!("No parameters for module {module}");
        return ExitCode::SUCCESS;
    }

    for (index, field) in layout.fields().iter().enumerate() {
        if index == layout.initial().len() && layout.has_advanced() {
            println!("--- advanced ---");
        }
        println!("{}", describe_field(field));
    }
    for rejected in layout.rejected() {
        eprintln!("warning: {rejected}");
    }
    ExitCode::SUCCESS
}

fn cmd_validate(file: PathBuf, module: i64, report: i64, values: Option<PathBuf>) -> ExitCode {
    let (layout, store) = match load_layout_and_store(&file, module, report, values) {
        Ok(parts) => parts,
        Err(message) => return fail(&message),
    };

    match filter::validate(&layout, &store) {
        Ok(()) => {
            println!("All mandatory filters are set");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err.to_string()),
    }
}

fn cmd_payload(file: PathBuf, module: i64, report: i64, values: Option<PathBuf>) -> ExitCode {
    let (layout, store) = match load_layout_and_store(&file, module, report, values) {
        Ok(parts) => parts,
        Err(message) => return fail(&message),
    };

    let payload = filter::serialize(&layout, &store);
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&format!("failed to encode payload: {err}")),
    }
}

fn cmd_page(file: PathBuf, page: usize, size: usize) -> ExitCode {
    let rows: Vec<ReportRow> = match load_json(&file) {
        Ok(rows) => rows,
        Err(message) => return fail(&message),
    };

    let mut pager = Pager::new(size);
    pager.set_page_index(page);
    if page > 0 && page >= pager.total_pages(rows.len()) {
        return fail(&format!(
            "page {page} out of range, {} pages available",
            pager.total_pages(rows.len())
        ));
    }

    println!("{}", render::render_page(&rows, &pager));
    ExitCode::SUCCESS
}

fn describe_field(field: &FilterField) -> String {
    let marker = if field.is_mandatory() { "*" } else { " " };
    match field {
        FilterField::Single(d) => {
            format!("[{marker}] {} ({})", d.label(), d.item_type.as_str())
        }
        FilterField::Range { from, to } => format!(
            "[{marker}] {} .. {} ({})",
            from.label(),
            to.label(),
            from.item_type.as_str()
        ),
    }
}

fn load_layout(file: &PathBuf, module: i64, report: i64) -> Result<FilterLayout, String> {
    let descriptors: Vec<RawDescriptor> = load_json(file)?;
    Ok(interpret(&descriptors, module, report))
}

fn load_layout_and_store(
    file: &PathBuf,
    module: i64,
    report: i64,
    values: Option<PathBuf>,
) -> Result<(FilterLayout, FilterValueStore), String> {
    let layout = load_layout(file, module, report)?;
    let context = SessionContext::default();
    let mut store = FilterValueStore::seed(&layout, &context);

    if let Some(path) = values {
        let overrides: Value = load_json(&path)?;
        let Some(map) = overrides.as_object() else {
            return Err(format!("{}: expected a JSON object", path.display()));
        };
        for (name, value) in map {
            store.set(name.clone(), FieldValue::from_json(value));
        }
    }

    Ok((layout, store))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, String> {
    let content =
        fs::read_to_string(path).map_err(|err| format!("{}: {err}", path.display()))?;
    serde_json::from_str(&content).map_err(|err| format!("{}: {err}", path.display()))
}

fn fail(message: &str) -> ExitCode {
    eprintln!("Error: {message}");
    ExitCode::FAILURE
}
