//! `docfuse` command-line front end.
//!
//! JSON goes to stdout, logs go to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docfuse_core::config::{expand_path, Config, Settings};
use docfuse_core::data_processor::{DataProcessor, ProcessorRegistry};
use docfuse_core::types::{FusedResult, Metadata, ScoredDocument};
use docfuse_core::{DocumentChunker, SplitterKind};
use docfuse_hybrid::{build_context, HybridSearchEngine, RankFusion};

const INDEX_BATCH: usize = 256;

#[derive(Parser)]
#[command(name = "docfuse")]
#[command(version, about = "Chunk documents and fuse semantic and keyword rankings", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to config.toml + config.<env>.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one text file and print its chunks as JSON
    Split {
        file: String,

        #[command(flatten)]
        chunking: ChunkingArgs,
    },

    /// Fuse two ranked lists (JSON arrays of scored documents)
    Fuse {
        semantic: String,
        keyword: String,

        #[command(flatten)]
        retrieval: RetrievalArgs,
    },

    /// Ingest a directory into both channels and run one hybrid query
    Query {
        dir: String,
        text: String,

        /// Ingest at most this many files
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        chunking: ChunkingArgs,

        #[command(flatten)]
        retrieval: RetrievalArgs,
    },
}

#[derive(clap::Args)]
struct ChunkingArgs {
    /// character, recursive or sentence
    #[arg(long)]
    splitter: Option<SplitterKind>,

    #[arg(long)]
    chunk_size: Option<usize>,

    #[arg(long)]
    chunk_overlap: Option<usize>,
}

#[derive(clap::Args)]
struct RetrievalArgs {
    /// Weight of the semantic channel in [0, 1]
    #[arg(long)]
    alpha: Option<f64>,

    #[arg(short = 'k', long)]
    top_k: Option<usize>,
}

impl ChunkingArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(kind) = self.splitter { settings.chunking.splitter = kind; }
        if let Some(size) = self.chunk_size { settings.chunking.chunk_size = size; }
        if let Some(overlap) = self.chunk_overlap { settings.chunking.chunk_overlap = overlap; }
    }
}

impl RetrievalArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(alpha) = self.alpha { settings.retrieval.alpha = alpha; }
        if let Some(top_k) = self.top_k { settings.retrieval.top_k = top_k; }
    }
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    results: &'a [FusedResult],
    context: String,
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(&expand_path(path))?,
        None => Config::load()?,
    };
    let mut settings = config.settings()?;

    match cli.command {
        Commands::Split { file, chunking } => {
            chunking.apply(&mut settings);
            let chunker = DocumentChunker::new(settings.chunking.build_splitter()?);
            let path = expand_path(&file);
            let document = ProcessorRegistry::default().process(&path, &Metadata::new())?;
            let chunks = chunker.chunk(&document);
            info!(file = %path.display(), chunks = chunks.len(), "split file");
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }

        Commands::Fuse { semantic, keyword, retrieval } => {
            retrieval.apply(&mut settings);
            let fusion = RankFusion::new(settings.retrieval.alpha, settings.retrieval.top_k)?;
            let semantic = read_ranking(&expand_path(&semantic))?;
            let keyword = read_ranking(&expand_path(&keyword))?;
            let fused = fusion.fuse(&semantic, &keyword);
            println!("{}", serde_json::to_string_pretty(&fused)?);
        }

        Commands::Query { dir, text, limit, json, chunking, retrieval } => {
            chunking.apply(&mut settings);
            retrieval.apply(&mut settings);
            let processor = DataProcessor::new(
                ProcessorRegistry::default(),
                DocumentChunker::new(settings.chunking.build_splitter()?),
            );
            let data_dir = expand_path(&dir);
            let chunks = processor.process_directory_limited(&data_dir, limit.unwrap_or(usize::MAX))?;

            let engine = HybridSearchEngine::in_memory(&settings.retrieval)?;
            let pb = ProgressBar::new(chunks.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")?
                    .progress_chars("#>-"),
            );
            for batch in chunks.chunks(INDEX_BATCH) {
                engine.index(batch)?;
                pb.inc(batch.len() as u64);
            }
            pb.finish_and_clear();
            info!(dir = %data_dir.display(), chunks = chunks.len(), "indexed directory");

            let results = engine.search(&text)?;
            let context = build_context(&results);
            if json {
                let output = QueryOutput { query: &text, results: &results, context };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_results(&results, &context);
            }
        }
    }
    Ok(())
}

fn read_ranking(path: &Path) -> Result<Vec<ScoredDocument>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing ranked list {}", path.display()))
}

fn print_results(results: &[FusedResult], context: &str) {
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, r) in results.iter().enumerate() {
        let source = r.metadata.get("filename").and_then(|v| v.as_str()).unwrap_or("-");
        println!("{:>2}. {:.4}  {}  ({})", i + 1, r.fused_score, r.id, source);
    }
    println!("\n--- context ---\n{context}");
}
