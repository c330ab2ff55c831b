//! The demonstrated library and the example routine shown on the page.
//!
//! Both files are embedded verbatim so the page can annotate its own source.

pub mod examples;
pub mod functional;

use crate::core::TraceArg;
use functional::{Func, Value};

pub use examples::examples;

pub const EXAMPLES_SOURCE: &str = include_str!("examples.rs");
pub const LIBRARY_SOURCE: &str = include_str!("functional.rs");

impl From<Value> for TraceArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Func(_) => TraceArg::Callable,
            Value::Str(s) => TraceArg::Text(s),
            other => TraceArg::Other(other.to_string()),
        }
    }
}

impl From<Func> for TraceArg {
    fn from(_: Func) -> Self {
        TraceArg::Callable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExampleRunner;
    use crate::vals;

    #[test]
    fn test_values_classify_by_kind() {
        assert_eq!(TraceArg::from(Value::from("abc")).render(), "\"abc\"");
        assert_eq!(TraceArg::from(Value::from(5)).render(), "5");
        assert_eq!(TraceArg::from(Value::from(vals![1, 2])).render(), "1,2");
        let f = Func::new("id", |args| Ok(args[0].clone()));
        assert_eq!(TraceArg::from(f.clone()).render(), "function");
        assert_eq!(TraceArg::from(Value::Func(f)).render(), "function");
    }

    #[test]
    fn test_examples_run_cleanly() {
        let outputs = ExampleRunner::new().run(examples);
        let calls = EXAMPLES_SOURCE.matches("trace!(t, ").count();
        assert_eq!(outputs.len(), calls);
        assert_eq!(outputs[0], "\"list is a\" function");
        assert_eq!(outputs[1], "\"f2 3, 4 ->\" 1,3,2,4");
        assert!(outputs.contains(&"\"thubthtitute my eththeth\"".to_string()));
        assert_eq!(outputs.last().map(String::as_str), Some("\"hemidemisemiquaver\""));
    }
}
