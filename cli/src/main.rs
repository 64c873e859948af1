use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use omas_schema_codegen::{generate, Dialect};
use omas_schema_core::{convert_file, ConvertOptions, Target};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "omas-convert")]
#[command(about = "Convert the OMAS gyrokinetics schema into JSON Schema, an Elasticsearch mapping or Python classes")]
#[command(version)]
struct Cli {
    /// OMAS schema file (flat dotted-path JSON document)
    input: PathBuf,

    /// Output format
    #[arg(value_enum)]
    target: TargetArg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TargetArg {
    #[value(name = "jsonschema")]
    JsonSchema,
    Elasticsearch,
    Marshmallow,
    Dataclasses,
}

impl TargetArg {
    /// Schema target for the conversion pipeline. Code generators read JSON Schema.
    fn schema_target(self) -> Target {
        match self {
            TargetArg::Elasticsearch => Target::SearchMapping,
            TargetArg::JsonSchema | TargetArg::Marshmallow | TargetArg::Dataclasses => {
                Target::JsonSchema
            }
        }
    }

    fn dialect(self) -> Option<Dialect> {
        match self {
            TargetArg::Marshmallow => Some(Dialect::Marshmallow),
            TargetArg::Dataclasses => Some(Dialect::Dataclasses),
            TargetArg::JsonSchema | TargetArg::Elasticsearch => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the generated output
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = ConvertOptions::with_target(cli.target.schema_target());
    tracing::info!(input = %cli.input.display(), target = ?cli.target, "converting");

    let schema = convert_file(&cli.input, &options)
        .map_err(|e| anyhow::Error::from(e).context("Conversion failed"))?;

    match cli.target.dialect() {
        None => write_json(&schema)?,
        Some(dialect) => {
            let source = generate(&schema, &options.root, dialect)
                .with_context(|| format!("Failed to generate {dialect} classes"))?;
            write_text(&source)?;
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(val: &T) -> Result<()> {
    let mut writer = BufWriter::new(io::stdout());
    serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;
    Ok(())
}

fn write_text(text: &str) -> Result<()> {
    let mut writer = BufWriter::new(io::stdout());
    writer
        .write_all(text.as_bytes())
        .context("Failed to write output")?;
    if !text.ends_with('\n') {
        writeln!(writer).context("Failed to write trailing newline")?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(())
}
