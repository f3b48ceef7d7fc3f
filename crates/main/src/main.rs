use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use flowdoc::batch::generate_documents;
use flowdoc::builder::BuildContext;
use flowdoc::catalog::{builtin_records, placeholder_logo};
use flowdoc::render::PdfRenderer;
use flowdoc::style::StyleRegistry;

/// Generates specification documents for the built-in integration flows.
///
/// Fonts must be present under `assets/fonts` relative to the `flowdoc` crate
/// or provided via the `FLOWDOC_FONTS_DIR` environment variable before
/// running the `generate` command.
#[derive(Parser)]
#[command(author, version, about = "Specification document generator for integration flows")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in flow records.
    #[command(name = "list")]
    List,

    /// Render specification documents into the output directory.
    #[command(name = "generate", aliases = ["gen"])]
    Generate {
        /// Output directory for the rendered documents.
        #[arg(long, default_value = "target/iflow-docs")]
        out: PathBuf,

        /// Only generate the flow with this technical name.
        #[arg(long)]
        flow: Option<String>,

        /// Release date stamped into each document (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => list(),
        Commands::Generate { out, flow, date } => generate(&out, flow.as_deref(), date),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn list() -> Result<(), Box<dyn Error>> {
    for record in builtin_records() {
        println!(
            "{:<36} {:<44} {}",
            record.technical_name(),
            record.name(),
            record.endpoint()
        );
    }
    Ok(())
}

fn generate(
    out: &std::path::Path,
    flow: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<(), Box<dyn Error>> {
    let mut records = builtin_records();
    if let Some(technical_name) = flow {
        records.retain(|r| r.technical_name() == technical_name);
        if records.is_empty() {
            return Err(format!("unknown flow '{}'; try `list`", technical_name).into());
        }
    }

    let release_date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let ctx = BuildContext::new(release_date, placeholder_logo()?);
    let styles = StyleRegistry::standard();
    let renderer = PdfRenderer::new(styles);

    let report = generate_documents(&records, &styles, &ctx, &renderer, out)?;

    for path in &report.artifacts {
        println!("wrote {}", path.display());
    }
    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.record, failure.error);
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(format!("{} of {} records failed", report.failures.len(), records.len()).into())
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
