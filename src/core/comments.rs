//! Documentation comment scanner
//!
//! A documentation block is a run of lines starting with `//` in column 0,
//! immediately followed by a declaration. Recognized declarations, tried in
//! this order:
//!
//! 1. `name = function(args)` or `a.b.name = function(args)`
//! 2. `function name(args)`
//! 3. `var name =`
//! 4. `fn name(args)`, optionally `pub` or `pub(crate)`
//!
//! Any other line after a block discards it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::segmenter::escape_markup;

/// Documentation for one declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Description lines, already escaped with inline emphasis applied
    pub description: Vec<String>,

    /// Owning namespace including its trailing dot, e.g. `list.`
    pub target: Option<String>,

    /// Bound identifier
    pub name: String,

    /// Parameter list text, absent for plain variables
    pub args: Option<String>,

    /// Explicit signature from a `::` line, unescaped
    pub signature: Option<String>,
}

/// How a declaration line introduced its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `a.b.name = function(args)`
    FunctionAssignment { name: String, args: String },
    /// `function name(args)`
    FunctionStatement { name: String, args: String },
    /// `var name =`
    Variable { name: String },
    /// `pub fn name(args)`
    RustFunction { name: String, args: String },
}

impl Declaration {
    fn into_parts(self) -> (String, Option<String>) {
        match self {
            Declaration::FunctionAssignment { name, args }
            | Declaration::FunctionStatement { name, args }
            | Declaration::RustFunction { name, args } => (name, Some(args)),
            Declaration::Variable { name } => (name, None),
        }
    }
}

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A `//` line containing `::`; holds the text after it
    Signature(&'a str),
    /// Any other `//` line
    Description(&'a str),
    /// A recognized declaration
    Declaration(Declaration),
    /// Blank lines, code, anything else
    Other,
}

#[derive(Debug, Default)]
struct PendingRecord {
    description: Vec<String>,
    signature: Option<String>,
}

enum ScanState {
    OutsideBlock,
    InsideBlock(PendingRecord),
}

impl ScanState {
    fn into_pending(self) -> PendingRecord {
        match self {
            ScanState::InsideBlock(pending) => pending,
            ScanState::OutsideBlock => PendingRecord::default(),
        }
    }
}

pub struct CommentParser {
    comment_regex: Regex,
    signature_regex: Regex,
    variable_emphasis_regex: Regex,
    emphasis_regex: Regex,
    assignment_regex: Regex,
    function_regex: Regex,
    var_regex: Regex,
    rust_fn_regex: Regex,
    target_regex: Regex,
}

impl CommentParser {
    pub fn new() -> Self {
        Self {
            comment_regex: Regex::new(r"^//\s*(.*)").expect("Invalid comment regex"),
            signature_regex: Regex::new(r"\s*::\s*(.*)").expect("Invalid signature regex"),
            variable_emphasis_regex: Regex::new(r"\+([\w()_]+)\+")
                .expect("Invalid variable emphasis regex"),
            emphasis_regex: Regex::new(r"\*(\w+)\*").expect("Invalid emphasis regex"),
            assignment_regex: Regex::new(r"^((?:\w+\.)*\w+)\s*=\s*function\s*\((.*?)\)")
                .expect("Invalid function assignment regex"),
            function_regex: Regex::new(r"^function\s+(\w+)\s*\((.*?)\)")
                .expect("Invalid function statement regex"),
            var_regex: Regex::new(r"^var\s+(\w+)\s+=").expect("Invalid var regex"),
            rust_fn_regex: Regex::new(r"^(?:pub(?:\([\w:]+\))?\s+)?fn\s+(\w+)\s*(?:<[^(]*>)?\s*\((.*?)\)")
                .expect("Invalid fn regex"),
            target_regex: Regex::new(r"(.*\.)(\w+)").expect("Invalid target regex"),
        }
    }

    /// Scan source text and return one record per documented declaration
    pub fn parse(&self, source: &str) -> Vec<CommentRecord> {
        self.parse_lines(source.split('\n').map(|line| line.trim_end_matches('\r')))
    }

    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<CommentRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut records = Vec::new();
        let mut state = ScanState::OutsideBlock;

        for line in lines {
            state = match (state, self.classify(line)) {
                (state, LineKind::Signature(signature)) => {
                    let mut pending = state.into_pending();
                    pending.signature = Some(signature.to_string());
                    ScanState::InsideBlock(pending)
                }
                (state, LineKind::Description(text)) => {
                    let mut pending = state.into_pending();
                    pending.description.push(self.describe(text));
                    ScanState::InsideBlock(pending)
                }
                (ScanState::OutsideBlock, _) => ScanState::OutsideBlock,
                (ScanState::InsideBlock(pending), LineKind::Declaration(declaration)) => {
                    records.push(self.complete(pending, declaration));
                    ScanState::OutsideBlock
                }
                (ScanState::InsideBlock(_), LineKind::Other) => {
                    debug!("Discarding comment block before unrecognized line: {}", line);
                    ScanState::OutsideBlock
                }
            };
        }

        if let ScanState::InsideBlock(_) = state {
            debug!("Dropping comment block left open at end of input");
        }

        records
    }

    /// Classify a line by the first rule that matches
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if let Some(caps) = self.comment_regex.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            return match self.signature_regex.captures(text) {
                Some(sig) => LineKind::Signature(sig.get(1).map_or("", |m| m.as_str())),
                None => LineKind::Description(text),
            };
        }

        self.declaration(line)
            .map(LineKind::Declaration)
            .unwrap_or(LineKind::Other)
    }

    fn declaration(&self, line: &str) -> Option<Declaration> {
        if let Some(caps) = self.assignment_regex.captures(line) {
            return Some(Declaration::FunctionAssignment {
                name: caps[1].to_string(),
                args: caps[2].to_string(),
            });
        }
        if let Some(caps) = self.function_regex.captures(line) {
            return Some(Declaration::FunctionStatement {
                name: caps[1].to_string(),
                args: caps[2].to_string(),
            });
        }
        if let Some(caps) = self.var_regex.captures(line) {
            return Some(Declaration::Variable {
                name: caps[1].to_string(),
            });
        }
        if let Some(caps) = self.rust_fn_regex.captures(line) {
            return Some(Declaration::RustFunction {
                name: caps[1].to_string(),
                args: caps[2].to_string(),
            });
        }
        None
    }

    fn complete(&self, pending: PendingRecord, declaration: Declaration) -> CommentRecord {
        let (qualified, args) = declaration.into_parts();

        let (target, name) = match self.target_regex.captures(&qualified) {
            Some(caps) => (Some(caps[1].to_string()), caps[2].to_string()),
            None => (None, qualified),
        };

        CommentRecord {
            description: pending.description,
            target,
            name,
            args: args.map(|a| a.replace("/*", "").replace("*/", "")),
            signature: pending.signature,
        }
    }

    /// Escape a description line and apply `+var+` and `*em*` emphasis
    fn describe(&self, text: &str) -> String {
        let escaped = escape_markup(text);
        let with_vars = self.variable_emphasis_regex.replace_all(&escaped, "<var>$1</var>");
        self.emphasis_regex
            .replace_all(&with_vars, "<em>$1</em>")
            .into_owned()
    }
}

impl Default for CommentParser {
    fn default() -> Self {
        Self::new()
    }
}
