//! md2map: split Markdown documents into indexed, AI-friendly parts.
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use md2map::config::Config;
use md2map::llm::{build_provider, LlmConfig};
use md2map::output::{dry_run_report, write_outputs};
use md2map::parser::{assign_ids, MarkdownParser, SourceDocument};
use md2map::refine::{Refiner, SplitMode};
use md2map::tokenizer::LexicalTokenizer;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "md2map")]
#[command(about = "Split Markdown files into semantic parts and index them", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a Markdown file and write parts, INDEX.md and MAP.json
    Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Markdown file to analyse
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output directory
    #[arg(long, default_value = "./md2map-out")]
    out: PathBuf,

    /// Deepest heading level to split on (1-6)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    max_depth: Option<u8>,

    /// Section id prefix (MD gives MD1, MD2, ...)
    #[arg(long)]
    id_prefix: Option<String>,

    /// Log debug output
    #[arg(long)]
    verbose: bool,

    /// Preview sections and files without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Section split mode
    #[arg(long, short = 'm', value_parser = ["heading", "nlp", "ai"])]
    split_mode: Option<String>,

    /// Minimum own-content words (English) or characters (CJK) before refining
    #[arg(long, value_name = "N")]
    split_threshold: Option<usize>,

    /// Most virtual sections generated from one section
    #[arg(long, value_name = "N")]
    max_subsections: Option<usize>,

    /// Language model provider for ai mode
    #[arg(long, value_parser = ["openai", "anthropic", "bedrock"])]
    ai_provider: Option<String>,

    /// Model id (defaults to the provider's default)
    #[arg(long)]
    ai_model: Option<String>,

    /// Bedrock region (defaults to AWS_REGION, then ap-northeast-1)
    #[arg(long)]
    ai_region: Option<String>,
}

impl BuildArgs {
    /// Applies command line overrides on top of md2map.toml.
    fn apply(&self, config: &mut Config) {
        if let Some(depth) = self.max_depth {
            config.max_depth = usize::from(depth);
        }
        if let Some(prefix) = &self.id_prefix {
            config.id_prefix.clone_from(prefix);
        }
        if let Some(mode) = &self.split_mode {
            config.split_mode.clone_from(mode);
        }
        if let Some(threshold) = self.split_threshold {
            config.split_threshold = threshold;
        }
        if let Some(max) = self.max_subsections {
            config.max_subsections = max;
        }
        if let Some(provider) = &self.ai_provider {
            config.ai_provider.clone_from(provider);
        }
        if let Some(model) = &self.ai_model {
            config.ai_model.clone_from(model);
        }
        if let Some(region) = &self.ai_region {
            config.ai_region.clone_from(region);
        }
    }
}

fn build_refiner(config: &Config) -> Result<Refiner> {
    Ok(match config.split_mode()? {
        SplitMode::Heading => Refiner::None,
        SplitMode::Nlp => Refiner::paragraph_similarity(Box::new(LexicalTokenizer::default())),
        SplitMode::Ai => {
            let mut llm = LlmConfig::from_env(
                config.ai_provider()?,
                config.ai_model(),
                config.ai_region(),
            )?;
            llm.max_tokens = config.ai_max_tokens;
            llm.timeout = Duration::from_secs(config.ai_timeout_secs);
            info!("Using {} model {}", llm.provider, llm.model);
            Refiner::collaborator_assisted(build_provider(&llm)?)
        }
    })
}

/// Runs `build`; returns whether any warning was raised.
fn build(args: &BuildArgs) -> Result<bool> {
    let mut config = Config::load();
    args.apply(&mut config);

    let input = &args.input_file;
    let is_markdown = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if !is_markdown {
        warn!("File extension is not .md: {}", input.display());
    }

    let document = SourceDocument::read(input)?;
    let parser = MarkdownParser::new(config.parse_options(), build_refiner(&config)?);
    let mut outcome = parser.parse_document(&document);
    assign_ids(&mut outcome.sections, &config.id_prefix);

    if args.dry_run {
        print!(
            "{}",
            dry_run_report(&args.out, &mut outcome.sections, &document.lines)
        );
        return Ok(!outcome.warnings.is_empty());
    }

    write_outputs(
        &args.out,
        &document.file_name,
        &mut outcome.sections,
        &outcome.warnings,
        &document.lines,
    )
    .with_context(|| format!("Failed to write output to {}", args.out.display()))?;

    Ok(!outcome.warnings.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Command::Build(args) = &cli.command;

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to install the log subscriber");
    }

    match build(args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(2),
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
