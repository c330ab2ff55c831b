use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

/// One traced argument, classified by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceArg {
    /// Anything callable. Rendered as the bare word `function`
    Callable,
    /// A string value. Rendered double-quoted
    Text(String),
    /// Any other value, already in its default textual form
    Other(String),
}

impl TraceArg {
    pub fn render(&self) -> String {
        match self {
            TraceArg::Callable => "function".to_string(),
            TraceArg::Text(text) => format!("\"{}\"", text),
            TraceArg::Other(text) => text.clone(),
        }
    }
}

impl From<&str> for TraceArg {
    fn from(value: &str) -> Self {
        TraceArg::Text(value.to_string())
    }
}

impl From<String> for TraceArg {
    fn from(value: String) -> Self {
        TraceArg::Text(value)
    }
}

macro_rules! impl_other_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for TraceArg {
            fn from(value: $ty) -> Self {
                TraceArg::Other(value.to_string())
            }
        })*
    };
}

impl_other_from!(bool, i32, i64, u32, u64, usize, f64);

/// Render one trace call: each argument by kind, joined by a single space
pub fn format_call(args: &[TraceArg]) -> String {
    args.iter().map(TraceArg::render).collect::<Vec<_>>().join(" ")
}

/// Receiver for trace calls made by an example routine
pub trait TraceSink {
    fn trace(&mut self, args: Vec<TraceArg>);
}

/// Records each call as its formatted string, in call order
#[derive(Debug, Default)]
pub struct CaptureSink {
    results: Vec<String>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn into_results(self) -> Vec<String> {
        self.results
    }
}

impl TraceSink for CaptureSink {
    fn trace(&mut self, args: Vec<TraceArg>) {
        self.results.push(format_call(&args));
    }
}

/// Prints every call to stdout as it happens
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl TraceSink for ConsoleSink {
    fn trace(&mut self, args: Vec<TraceArg>) {
        println!("{}", format_call(&args));
    }
}

/// Record a trace call on a sink.
///
/// `trace!(t, "label", value)` converts every argument with
/// `TraceArg::from` and hands the list to `t`.
#[macro_export]
macro_rules! trace {
    ($sink:expr $(, $arg:expr)* $(,)?) => {
        $crate::core::TraceSink::trace(
            &mut *$sink,
            vec![$($crate::core::TraceArg::from($arg)),*],
        )
    };
}

/// Executes example routines against a capturing sink
#[derive(Debug, Default)]
pub struct ExampleRunner;

impl ExampleRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `routine` once and return the captured outputs in call order.
    ///
    /// A routine that fails or panics is logged and whatever it traced
    /// before the fault is returned.
    pub fn run<F, E>(&self, routine: F) -> Vec<String>
    where
        F: FnOnce(&mut dyn TraceSink) -> std::result::Result<(), E>,
        E: Display,
    {
        let mut sink = CaptureSink::new();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| routine(&mut sink)));
        match outcome {
            Ok(Ok(())) => {
                debug!("Example routine finished with {} trace calls", sink.results().len());
            }
            Ok(Err(e)) => {
                error!(
                    "Example routine failed after {} trace calls: {}",
                    sink.results().len(),
                    e
                );
            }
            Err(payload) => {
                error!(
                    "Example routine panicked after {} trace calls: {}",
                    sink.results().len(),
                    panic_message(payload.as_ref())
                );
            }
        }

        sink.into_results()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_by_kind() {
        assert_eq!(TraceArg::Callable.render(), "function");
        assert_eq!(TraceArg::from("abc").render(), "\"abc\"");
        assert_eq!(TraceArg::from(5).render(), "5");
        assert_eq!(TraceArg::from(2.5).render(), "2.5");
    }

    #[test]
    fn test_call_arguments_join_with_single_space() {
        let args = vec![TraceArg::from("halve 10"), TraceArg::from(5), TraceArg::Callable];
        assert_eq!(format_call(&args), "\"halve 10\" 5 function");
    }

    #[test]
    fn test_runner_captures_in_call_order() {
        let outputs = ExampleRunner::new().run(|t| {
            crate::trace!(t, "x", 1 + 1);
            crate::trace!(t, 3);
            crate::trace!(t);
            Ok::<(), String>(())
        });
        assert_eq!(outputs, vec!["\"x\" 2", "3", ""]);
    }

    #[test]
    fn test_runner_keeps_partial_results_on_error() {
        let outputs = ExampleRunner::new().run(|t: &mut dyn TraceSink| -> Result<(), String> {
            crate::trace!(t, 1);
            let failing: Result<i32, String> = Err("boom".to_string());
            let value = failing?;
            crate::trace!(t, value);
            Ok(())
        });
        assert_eq!(outputs, vec!["1"]);
    }

    fn explode() -> i32 {
        panic!("example exploded")
    }

    #[test]
    fn test_runner_keeps_partial_results_on_panic() {
        let outputs = ExampleRunner::new().run(|t: &mut dyn TraceSink| -> Result<(), String> {
            crate::trace!(t, "before");
            crate::trace!(t, explode());
            Ok(())
        });
        assert_eq!(outputs, vec!["\"before\""]);
    }
}
