mod comments;
mod engine;
mod extractor;
mod fetcher;
mod formatter;
mod merger;
mod runner;
mod segmenter;

pub use comments::{CommentParser, CommentRecord};
pub use extractor::BlockExtractor;
pub use fetcher::{DefaultFetcher, SourceFetcher, SourceLocation};
pub use formatter::format_records;
pub use merger::OutputMerger;
pub use runner::{ConsoleSink, ExampleRunner, TraceArg, TraceSink};

// Export the main engine
pub use engine::Engine;
