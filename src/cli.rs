use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "partials-demo")]
#[command(about = "A literate demo page for a partial application and currying library")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Render the demo page with annotated examples and API docs
    Render {
        /// Source holding the example routine (URL, path or embedded:examples)
        #[arg(short, long)]
        examples: Option<String>,

        /// Library source to document (URL, path or embedded:library)
        #[arg(short, long)]
        library: Option<String>,

        /// Where to write the page
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the annotated example markup
    Examples {
        /// Source holding the example routine
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Print the API documentation extracted from library comments
    Docs {
        /// Library source to document
        #[arg(short, long)]
        source: Option<String>,

        /// Emit the parsed records as JSON instead of markup
        #[arg(long)]
        json: bool,
    },

    /// Run the examples and print each trace call
    Run,
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => engine.init(path).await,
            Commands::Render { examples, library, output } => {
                engine.render(examples, library, output).await
            }
            Commands::Examples { source } => engine.print_examples(source).await,
            Commands::Docs { source, json } => engine.print_docs(source, json).await,
            Commands::Run => engine.run_live(),
        }
    }
}
