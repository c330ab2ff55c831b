//! Partial application and currying over dynamically typed values.
//!
//! Functions take and return [`Value`]s so that arguments can be bound in any
//! position, with [`HOLE`] marking positions left open for a later call.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Errors raised while calling a [`Func`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("{name}: expected an argument at position {position}")]
    MissingArgument { name: String, position: usize },

    #[error("{name}: expected {expected}, got {actual}")]
    Type {
        name: String,
        expected: &'static str,
        actual: String,
    },

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("{target} has no {member}")]
    UnknownMember { target: String, member: String },
}

type Body = dyn Fn(&[Value]) -> Result<Value, CallError>;

/// A callable value
#[derive(Clone)]
pub struct Func {
    name: Rc<str>,
    body: Rc<Body>,
}

impl Func {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + 'static,
    {
        Self {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, CallError> {
        (self.body)(&args)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name)
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    List(Vec<Value>),
    Func(Func),
    /// An unfilled argument position
    Hole,
}

/// The placeholder for arguments supplied later
pub const HOLE: Value = Value::Hole;

impl Value {
    pub fn is_hole(&self) -> bool {
        matches!(self, Value::Hole)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Func(_) => "function",
            Value::Hole => "placeholder",
        }
    }

    pub fn as_num(&self) -> Result<f64, CallError> {
        match self {
            Value::Num(n) => Ok(*n),
            other => Err(type_error("value", "number", other)),
        }
    }

    /// Call this value, which must be a function
    pub fn call(&self, args: Vec<Value>) -> Result<Value, CallError> {
        match self {
            Value::Func(f) => f.call(args),
            other => Err(CallError::NotCallable(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            Value::Func(_) => write!(f, "function"),
            Value::Hole => write!(f, "_"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Value::Func(f)
    }
}

/// Build an argument list, converting each element with `Value::from`
#[macro_export]
macro_rules! vals {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::demo::functional::Value::from($value)),*]
    };
}

fn type_error(name: &str, expected: &'static str, actual: &Value) -> CallError {
    CallError::Type {
        name: name.to_string(),
        expected,
        actual: actual.kind().to_string(),
    }
}

// Returns argument +position+ of +args+, or an error naming +name+.
pub fn arg<'a>(name: &str, args: &'a [Value], position: usize) -> Result<&'a Value, CallError> {
    args.get(position).ok_or_else(|| CallError::MissingArgument {
        name: name.to_string(),
        position,
    })
}

// Returns a function that applies +f+ to +args+, with each hole filled
// from the arguments of the later call, left to right. Arguments beyond
// the holes are appended. If any hole is still open the result is another
// *partial* rather than a call to +f+.
// :: (fn(a, _, c, _), [a, _, c, _]) -> fn(b, d)
pub fn partial(f: &Func, args: Vec<Value>) -> Func {
    let holes: Vec<usize> = args
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_hole())
        .map(|(ix, _)| ix)
        .collect();

    let target = f.clone();
    let name = format!("{} (partial)", f.name());
    Func::new(&name, move |supplied| {
        let mut specialized = args.clone();
        specialized.extend(supplied.iter().skip(holes.len()).cloned());
        for (pos, value) in holes.iter().zip(supplied) {
            specialized[*pos] = value.clone();
        }

        if specialized.iter().any(Value::is_hole) {
            Ok(Value::Func(partial(&target, specialized)))
        } else {
            target.call(specialized)
        }
    })
}

// Returns a function that calls +f+ with +args+ followed by its own
// arguments. Like a left section in Haskell: `(10 /)`.
// :: (fn(a, b), [a]) -> fn(b)
pub fn curry(f: &Func, args: Vec<Value>) -> Func {
    let target = f.clone();
    let name = format!("{} (curry)", f.name());
    Func::new(&name, move |supplied| {
        let mut all = args.clone();
        all.extend_from_slice(supplied);
        target.call(all)
    })
}

// Returns a function that calls +f+ with its own arguments followed by
// +args+. Like a right section in Haskell: `(/ 2)`.
// :: (fn(a, b), [b]) -> fn(a)
pub fn rcurry(f: &Func, args: Vec<Value>) -> Func {
    let target = f.clone();
    let name = format!("{} (rcurry)", f.name());
    Func::new(&name, move |supplied| {
        let mut all = supplied.to_vec();
        all.extend(args.iter().cloned());
        target.call(all)
    })
}

// Like *curry*, but keeps collecting arguments until at least +n+ have
// been supplied before calling +f+.
// :: (fn(a, b, c), 3, [a]) -> fn(b) -> fn(c)
pub fn ncurry(f: &Func, n: usize, args: Vec<Value>) -> Func {
    let target = f.clone();
    let name = format!("{} (ncurry)", f.name());
    Func::new(&name, move |supplied| {
        let mut all = args.clone();
        all.extend_from_slice(supplied);
        if all.len() < n {
            Ok(Value::Func(ncurry(&target, n, all)))
        } else {
            target.call(all)
        }
    })
}

// Like *rcurry*, but keeps collecting arguments until at least +n+ have
// been supplied. Later arguments are placed before earlier ones.
// :: (fn(a, b, c), 3, [c]) -> fn(b) -> fn(a)
pub fn rncurry(f: &Func, n: usize, args: Vec<Value>) -> Func {
    let target = f.clone();
    let name = format!("{} (rncurry)", f.name());
    Func::new(&name, move |supplied| {
        let mut all = supplied.to_vec();
        all.extend(args.iter().cloned());
        if all.len() < n {
            Ok(Value::Func(rncurry(&target, n, all)))
        } else {
            target.call(all)
        }
    })
}

// Composes +fns+ right to left: the last function receives the call's
// arguments and each earlier one receives the previous result.
// :: [fn(b) -> c, fn(a) -> b] -> fn(a) -> c
pub fn compose(fns: Vec<Func>) -> Func {
    Func::new("compose", move |supplied| {
        let mut fns = fns.iter().rev();
        let Some(first) = fns.next() else {
            return Ok(supplied.first().cloned().unwrap_or(Value::Hole));
        };
        let mut result = first.call(supplied.to_vec())?;
        for f in fns {
            result = f.call(vec![result])?;
        }
        Ok(result)
    })
}

// Composes +fns+ left to right, the reverse of *compose*.
// :: [fn(a) -> b, fn(b) -> c] -> fn(a) -> c
pub fn sequence(mut fns: Vec<Func>) -> Func {
    fns.reverse();
    compose(fns)
}

// Returns a function that reads the member +name+ of its argument.
// Strings and lists have a `length`; lists are indexed by number.
// :: name -> fn(object) -> object[name]
pub fn pluck(name: &str) -> Func {
    let member = name.to_string();
    Func::new(&format!("pluck {}", name), move |supplied| {
        let target = arg("pluck", supplied, 0)?;
        match (target, member.as_str()) {
            (Value::Str(s), "length") => Ok(Value::from(s.chars().count() as f64)),
            (Value::List(items), "length") => Ok(Value::from(items.len() as f64)),
            (Value::List(items), index) => index
                .parse::<usize>()
                .ok()
                .and_then(|ix| items.get(ix).cloned())
                .ok_or_else(|| CallError::UnknownMember {
                    target: target.to_string(),
                    member: member.clone(),
                }),
            _ => Err(CallError::UnknownMember {
                target: target.to_string(),
                member: member.clone(),
            }),
        }
    })
}

// Returns a function that invokes the method +name+ on its argument with
// +args+. Supports `reverse` on strings and lists and `concat`.
// :: (name, [args]) -> fn(object) -> object.name(args)
pub fn invoke(name: &str, args: Vec<Value>) -> Func {
    let method = name.to_string();
    Func::new(&format!("invoke {}", name), move |supplied| {
        let target = arg("invoke", supplied, 0)?;
        match (target, method.as_str()) {
            (Value::List(items), "reverse") => {
                Ok(Value::List(items.iter().rev().cloned().collect()))
            }
            (Value::Str(s), "reverse") => Ok(Value::Str(s.chars().rev().collect())),
            (Value::List(items), "concat") => {
                let mut joined = items.clone();
                joined.extend(args.iter().cloned());
                Ok(Value::List(joined))
            }
            (Value::Str(s), "concat") => {
                let mut joined = s.clone();
                for value in &args {
                    joined.push_str(&value.to_string());
                }
                Ok(Value::Str(joined))
            }
            _ => Err(CallError::UnknownMember {
                target: target.to_string(),
                member: method.clone(),
            }),
        }
    })
}
