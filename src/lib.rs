//! Blueprint is a small lisp. This crate contains the reader, the evaluator and the standard
//! library bootstrap. All the values are "garbage collected" using reference counting.
//!
//! # Supported Syntax
//! The evaluator handles a fixed set of special forms, everything else is either a macro call or
//! an application.
//!
//! ```lisp
//! (quote <value>)
//! (define <name> <value>)
//! (define (<name> <param>*) <body>+)
//! (set! <name> <value>)
//! (cons <head> <rest>)
//! (first <list>)
//! (rest <list>)
//! (list <value>*)
//! (lambda (<param>*) <body>+)
//! (defmacro (<name> <param>*) <template>+)
//! (cond (<predicate> <body>*)* (else <body>*))
//! (begin <expr>*)
//! ```
//!
//! The standard library (`if`, `let`, `let*`, `and`, `or`, `map`, `reduce`, `filter`,
//! quasiquote...) is written in the language itself, see `prelude.lisp`.

pub mod environment;
pub mod error;
pub mod eval;
pub mod expand;
pub mod intrinsics;
pub mod prelude;
pub mod primitive;
pub mod reader;
pub mod value;

use std::path::Path;

pub use environment::{Environment, Frame, MAX_CALL_DEPTH};
pub use error::{Location, Result, RuntimeError};
pub use eval::{apply, eval};
pub use reader::read;
pub use value::{Closure, Macro, Value};

/// Stack size of a thread that can run [MAX_CALL_DEPTH] nested calls. Threads with smaller stacks
/// should lower the limit with [Environment::set_call_limit].
pub const STACK_SIZE: usize = 512 * 1024 * 1024;

/// An interpreter owns a global environment, so definitions made by one call are seen by the
/// next ones.
#[derive(Clone)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: prelude::global_environment()?,
        })
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn eval(&self, expr: &Value) -> Result<Value> {
        expr.eval(&self.env)
    }

    /// Reads every expression of `source` and evaluates them in order, returning the last value.
    pub fn run(&self, source: &str) -> Result<Value> {
        reader::read(source, None)?
            .iter()
            .try_fold(Value::nil(), |_, expr| self.eval(expr))
    }

    /// Loads a source file, see [intrinsics::load_file].
    pub fn load(&self, path: &Path) -> Result<Value> {
        intrinsics::load_file(path, &self.env)
    }
}
