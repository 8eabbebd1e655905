//! moonlight-anno CLI
//!
//! # Usage
//!
//! ```bash
//! # Annotate a corpus in place and write the aggregate under ./out
//! moonlight-anno annotate --corpus ui-source --out out --authoritative vendor-annotations
//!
//! # Mark a directory of annotation files as meta files
//! moonlight-anno meta --dir vendor-annotations
//! ```

use clap::{Parser, Subcommand};
use moonlight_anno::{apply_meta_headers, AnnotatorConfig, MixinAnnotator, RunPaths, ValidatedConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moonlight-anno")]
#[command(about = "Infer and insert mixin class annotations for UI source trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate construction sites and write the aggregate file
    Annotate {
        /// Corpus root (markup and source)
        #[arg(short, long)]
        corpus: PathBuf,

        /// Output root for the aggregate file
        #[arg(short, long)]
        out: PathBuf,

        /// Directory of existing annotations to leave alone
        #[arg(short, long)]
        authoritative: Option<PathBuf>,

        /// YAML configuration (schema version 1)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Override worker count
        #[arg(long)]
        workers: Option<usize>,

        /// Override the rewrite pass bound
        #[arg(long)]
        max_passes: Option<usize>,
    },

    /// Prepend the meta header to every source file in a directory
    Meta {
        /// Directory to update in place
        #[arg(short, long)]
        dir: PathBuf,

        /// YAML configuration (schema version 1)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(
    path: Option<&PathBuf>,
    workers: Option<usize>,
    max_passes: Option<usize>,
) -> moonlight_anno::Result<ValidatedConfig> {
    let base = match path {
        Some(path) => AnnotatorConfig::from_yaml(path)?.into_inner(),
        None => AnnotatorConfig::default(),
    };
    let config = base
        .scan(|c| match workers {
            Some(n) => c.workers(n),
            None => c,
        })
        .rewrite(|c| match max_passes {
            Some(n) => c.max_passes(n),
            None => c,
        })
        .build()?;
    Ok(config)
}

fn run(cli: Cli) -> moonlight_anno::Result<()> {
    match cli.command {
        Commands::Annotate {
            corpus,
            out,
            authoritative,
            config,
            report,
            workers,
            max_passes,
        } => {
            let config = load_config(config.as_ref(), workers, max_passes)?;
            let mut paths = RunPaths::new(corpus, out);
            if let Some(dir) = authoritative {
                paths = paths.with_authoritative(dir);
            }

            let run_report = MixinAnnotator::new(config).run(&paths)?;
            if let Some(path) = report {
                run_report.write_json(&path)?;
                info!("Run report written to {}", path.display());
            }
            Ok(())
        }
        Commands::Meta { dir, config } => {
            let config = load_config(config.as_ref(), None, None)?;
            match &config.rewrite().meta_header {
                Some(header) => {
                    apply_meta_headers(&dir, &config.scan().source_extension, header)?;
                }
                None => info!("Meta header disabled in configuration, nothing to do"),
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
