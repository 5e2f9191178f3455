//! storygraph
//!
//! Extracts subject-verb-object relations from a story, folds them into a
//! labelled graph and answers fixed questions against it.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use extract::{Extractor, VerbNormalizer};
use graph::{GraphCache, LayoutConfig, PlotOptions};
use parse::{ConlluParser, CoreNlpClient, ParserBackend, SentenceParser};
use query::{QueryDriver, RelationStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build a relation graph from a story and query it
#[derive(Parser)]
#[command(name = "storygraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file (defaults reproduce the built-in run)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input text (.txt, .md) or pre-annotated .conllu file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Parser backend: corenlp or conllu
    #[arg(short, long)]
    backend: Option<ParserBackend>,

    /// CoreNLP server URL
    #[arg(long)]
    parser_url: Option<String>,

    /// Render the graph to this file (.png or .svg)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write the graph as Graphviz DOT
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write the graph as JSON
    #[arg(long)]
    graph_json: Option<PathBuf>,

    /// Write the extraction records as JSON
    #[arg(long)]
    records: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(backend) = self.backend {
            config.parser.backend = backend;
        }
        if let Some(url) = &self.parser_url {
            config.parser.url = url.clone();
        }
        if let Some(plot) = &self.plot {
            config.plot.enabled = true;
            config.plot.output = plot.clone();
        }
        if let Some(dot) = &self.dot {
            config.export.dot = Some(dot.clone());
        }
        if let Some(graph_json) = &self.graph_json {
            config.export.graph_json = Some(graph_json.clone());
        }
        if let Some(records) = &self.records {
            config.export.records = Some(records.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.resolve_config()?;
    run(config).await
}

/// Logs go to stderr; stdout carries only answers
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_parser(config: &AppConfig) -> Result<Arc<dyn SentenceParser>> {
    let parser: Arc<dyn SentenceParser> = match config.parser.backend {
        ParserBackend::CoreNlp => Arc::new(CoreNlpClient::new(
            config.parser.url.clone(),
            Duration::from_secs(config.parser.request_timeout_secs),
        )?),
        ParserBackend::Conllu => Arc::new(ConlluParser::new()),
    };

    info!(backend = parser.name(), "Parser ready");
    Ok(parser)
}

fn build_normalizer(config: &AppConfig) -> VerbNormalizer {
    let mut normalizer = VerbNormalizer::new();
    for (lemma, canonical) in &config.normalizer.aliases {
        normalizer.add_alias(lemma, canonical);
    }
    normalizer
}

async fn run(config: AppConfig) -> Result<()> {
    let document = ingest::load_document(&config.input).await?;
    let parser = build_parser(&config)?;
    let extractor = Extractor::new(build_normalizer(&config));
    let extracted = extractor
        .extract_document(parser.as_ref(), &document)
        .await?;

    if let Some(path) = &config.export.records {
        let json = serde_json::to_string_pretty(&extracted)?;
        tokio::fs::write(path, json)
            .await
            .context(format!("Failed to write records: {:?}", path))?;
        info!(path = ?path, records = extracted.records.len(), "Saved extraction records");
    }

    let store = RelationStore::with_cache(
        extracted.records,
        GraphCache::new(config.cache.max_entries),
    );

    if config.plot.enabled
        || config.export.dot.is_some()
        || config.export.graph_json.is_some()
    {
        let relation_graph = store.graph();

        if config.plot.enabled {
            let options = PlotOptions {
                width: config.plot.width,
                height: config.plot.height,
                layout: LayoutConfig {
                    seed: config.plot.seed,
                    ..LayoutConfig::default()
                },
                ..PlotOptions::default()
            };
            graph::render_graph(&relation_graph, &config.plot.output, &options)?;
        }
        if let Some(path) = &config.export.dot {
            graph::write_dot(&relation_graph, path).await?;
        }
        if let Some(path) = &config.export.graph_json {
            tokio::fs::write(path, graph::to_json(&relation_graph)?)
                .await
                .context(format!("Failed to write graph JSON: {:?}", path))?;
        }
    }

    let driver = QueryDriver::new(parser, extractor.get_normalizer().clone());
    for question in &config.questions {
        if let Some(answer) = driver.ask(&store, question).await? {
            println!("{:?}", answer.targets);
        }
    }

    Ok(())
}
