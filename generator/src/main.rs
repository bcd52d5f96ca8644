mod cli;
mod db;
mod source;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xsd2sql::{table_name_for_path, IdentifierPolicy, TypeRegistry};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    info!("Start ...");

    let options = cli.walk_options();
    let naming = IdentifierPolicy::from_normalize_flag(options.normalize);
    let mut registry = TypeRegistry::new(cli.schema_prefix.as_str());
    let mut batches = Vec::new();

    for input in &cli.inputs {
        if cli.isolate_types {
            registry.clear_user_types();
        }

        let source = source::load(input)?;
        let parsing_options = roxmltree::ParsingOptions {
            allow_dtd: cli.allow_dtd,
            ..Default::default()
        };
        let xsd = roxmltree::Document::parse_with_options(&source.text, parsing_options)
            .with_context(|| format!("failed to parse {input}"))?;

        let root_table = table_name_for_path(&source.file_name, naming);
        let conversion = xsd2sql::convert_document(&xsd, &mut registry, &root_table, &options)
            .with_context(|| format!("failed to convert {input}"))?;

        for dropped in &conversion.dropped {
            warn!(input = input.as_str(), "dropped field {dropped}");
        }
        if conversion.is_empty() {
            warn!(input = input.as_str(), "no tables inferred");
            continue;
        }
        info!(
            input = input.as_str(),
            tables = conversion.statements.len(),
            "converted"
        );
        batches.push(conversion.ddl());
    }

    if batches.is_empty() {
        bail!("no tables could be inferred from the given schemas");
    }

    match cli.connection_settings() {
        Some(settings) => db::execute(&settings, &batches)?,
        None => {
            for ddl in &batches {
                println!("{ddl}");
            }
        }
    }
    Ok(())
}
