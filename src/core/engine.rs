use std::path::{Path, PathBuf};

use anyhow::Result;
use tera::{Context, Tera};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::demo::{self, functional::CallError};
use super::segmenter::{escape_markup, segment};
use super::{
    format_records, BlockExtractor, CommentParser, CommentRecord, ConsoleSink, DefaultFetcher,
    ExampleRunner, OutputMerger, SourceFetcher, SourceLocation, TraceSink,
};

const PAGE_TEMPLATE_NAME: &str = "page.html";
const PAGE_TEMPLATE: &str = include_str!("page.html");

/// The routine whose traced output annotates the example markup
pub type ExampleRoutine = fn(&mut dyn TraceSink) -> std::result::Result<(), CallError>;

/// Result of one fetch-then-render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub name: &'static str,

    /// Rendered markup, or `None` when the source could not be fetched
    pub html: Option<String>,
}

impl PassOutcome {
    pub fn is_complete(&self) -> bool {
        self.html.is_some()
    }
}

/// Orchestrates the example and documentation passes and renders the page
pub struct Engine {
    config: Config,
    fetcher: Box<dyn SourceFetcher>,
    extractor: BlockExtractor,
    merger: OutputMerger,
    comment_parser: CommentParser,
    runner: ExampleRunner,
    routine: ExampleRoutine,
    templates: Tera,
}

impl Engine {
    /// Create a new engine from the configuration at `config_path`
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        debug!("Loaded configuration: {:?}", config);
        Self::with_fetcher(config, Box::new(DefaultFetcher::new()))
    }

    pub fn with_fetcher(config: Config, fetcher: Box<dyn SourceFetcher>) -> Result<Self> {
        let extractor = BlockExtractor::new(&config.examples.routine_marker)?;
        let merger = OutputMerger::new(&config.examples.trace_marker, &config.examples.call_close);

        let mut templates = Tera::default();
        match &config.output.template {
            Some(path) => templates.add_template_file(path, Some(PAGE_TEMPLATE_NAME))?,
            None => templates.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?,
        }

        Ok(Self {
            config,
            fetcher,
            extractor,
            merger,
            comment_parser: CommentParser::new(),
            runner: ExampleRunner::new(),
            routine: demo::examples,
            templates,
        })
    }

    /// Replace the routine run to produce example output
    pub fn with_routine(mut self, routine: ExampleRoutine) -> Self {
        self.routine = routine;
        self
    }

    /// Annotate the example routine found in `source` with its output.
    ///
    /// A missing routine yields an empty string. If the captured outputs do
    /// not line up with the call sites, the error is logged and only the call
    /// sites with an output are annotated.
    pub fn annotate_examples(&self, source: &str) -> String {
        let block = match self.extractor.extract(source) {
            Ok(block) => block,
            Err(e) => {
                error!("Could not extract example routine: {}", e);
                return String::new();
            }
        };

        debug!("Extracted example routine with {} lines", block.lines().len());
        let markup = escape_markup(&block.join());
        let segments = segment(&markup, &self.config.examples.trace_marker);
        let outputs = self.runner.run(self.routine);
        debug!(
            "{} call sites, {} captured outputs",
            segments.len().saturating_sub(1),
            outputs.len()
        );

        match self.merger.merge(&segments, &outputs) {
            Ok(html) => html,
            Err(e) => {
                error!("Example output does not line up with call sites: {}", e);
                self.merger.merge_available(&segments, &outputs)
            }
        }
    }

    /// Scan library source for documented declarations
    pub fn document_library(&self, source: &str) -> Vec<CommentRecord> {
        self.comment_parser.parse(source)
    }

    pub async fn examples_pass(&self, location: &SourceLocation) -> PassOutcome {
        let html = match self.fetcher.fetch(location).await {
            Ok(source) => Some(self.annotate_examples(&source)),
            Err(e) => {
                error!("Examples pass did not complete: {}", e);
                None
            }
        };
        info!("Examples pass finished for {}", location);
        PassOutcome { name: "examples", html }
    }

    pub async fn docs_pass(&self, location: &SourceLocation) -> PassOutcome {
        let html = match self.fetcher.fetch(location).await {
            Ok(source) => {
                let records = self.document_library(&source);
                debug!("Found {} documented declarations", records.len());
                Some(format_records(&records))
            }
            Err(e) => {
                error!("Docs pass did not complete: {}", e);
                None
            }
        };
        info!("Docs pass finished for {}", location);
        PassOutcome { name: "docs", html }
    }

    /// Run both passes concurrently and render the page
    pub async fn render_page(&self, examples: &SourceLocation, library: &SourceLocation) -> Result<String> {
        let (examples_outcome, docs_outcome) =
            tokio::join!(self.examples_pass(examples), self.docs_pass(library));

        let complete = examples_outcome.is_complete() && docs_outcome.is_complete();
        for outcome in [&examples_outcome, &docs_outcome] {
            if !outcome.is_complete() {
                warn!("Rendering page without the {} section", outcome.name);
            }
        }

        let mut context = Context::new();
        context.insert("title", &self.config.output.title);
        context.insert(
            "examples",
            &examples_outcome
                .html
                .unwrap_or_else(|| escape_markup(&examples.to_string())),
        );
        context.insert(
            "docs",
            &docs_outcome
                .html
                .unwrap_or_else(|| escape_markup(&library.to_string())),
        );
        context.insert("complete", &complete);
        context.insert("generated_at", &chrono::Utc::now().to_rfc3339());

        Ok(self.templates.render(PAGE_TEMPLATE_NAME, &context)?)
    }

    /// Render the page and write it to disk
    pub async fn render(
        &self,
        examples: Option<String>,
        library: Option<String>,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let examples: SourceLocation = examples
            .as_deref()
            .unwrap_or(&self.config.sources.examples)
            .parse()?;
        let library: SourceLocation = library
            .as_deref()
            .unwrap_or(&self.config.sources.library)
            .parse()?;
        let output = output.unwrap_or_else(|| self.config.output.path.clone());

        info!("🔍 Rendering examples from {} and docs from {}", examples, library);
        let page = self.render_page(&examples, &library).await?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&output, page)?;
        info!("✅ Page written to {}", output.display());

        Ok(())
    }

    /// Print the annotated example markup
    pub async fn print_examples(&self, source: Option<String>) -> Result<()> {
        let location: SourceLocation = source
            .as_deref()
            .unwrap_or(&self.config.sources.examples)
            .parse()?;
        let text = self.fetcher.fetch(&location).await?;
        println!("{}", self.annotate_examples(&text));
        Ok(())
    }

    /// Print documentation markup, or the parsed records as JSON
    pub async fn print_docs(&self, source: Option<String>, json: bool) -> Result<()> {
        let location: SourceLocation = source
            .as_deref()
            .unwrap_or(&self.config.sources.library)
            .parse()?;
        let text = self.fetcher.fetch(&location).await?;
        let records = self.document_library(&text);

        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            println!("{}", format_records(&records));
        }
        Ok(())
    }

    /// Run the examples, printing each trace call as it happens
    pub fn run_live(&self) -> Result<()> {
        let mut sink = ConsoleSink;
        (self.routine)(&mut sink)?;
        Ok(())
    }

    /// Write a default configuration file
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let dir = path.unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir)?;

        let config_path = dir.join("partials-demo.toml");
        if config_path.exists() {
            warn!("{} already exists, leaving it untouched", config_path.display());
            return Ok(());
        }

        Config::default().save(&config_path)?;
        info!("✅ Wrote default configuration to {}", config_path.display());
        Ok(())
    }
}
