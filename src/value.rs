//! This module defines the values that are used by the interpreter. Code and data share the same
//! representation, so a [Value] is both what the reader produces and what evaluation returns.

use std::fmt::{Debug, Display};
use std::rc::Rc;

use im_rc::Vector;

use crate::environment::Environment;
use crate::error::{Result, RuntimeError};
use crate::primitive::Primitive;

/// A scope for a native function call. The arguments are already evaluated.
pub struct CallScope<'a> {
    pub args: Vec<Value>,
    pub env: &'a Environment,
}

impl CallScope<'_> {
    pub fn at(&self, nth: usize) -> Value {
        self.args.get(nth).cloned().unwrap_or_else(Value::nil)
    }

    pub fn assert_arity(&self, size: usize) -> Result<()> {
        if self.args.len() != size {
            Err(RuntimeError::ArityMismatch(size, self.args.len()))
        } else {
            Ok(())
        }
    }
}

pub type Native = fn(CallScope<'_>) -> Result<Value>;

/// External functions that can be called from the interpreter.
#[derive(Clone)]
pub struct Extern {
    pub name: &'static str,
    pub call: Native,
}

impl Debug for Extern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extern").field("name", &self.name).finish()
    }
}

/// A parameter of a closure or a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Required(String),
    /// Introduced by `&optional`, defaults to the empty list.
    Optional(String),
    /// Introduced by `&rest`, collects the remaining arguments in a list.
    Variadic(String),
}

impl Param {
    /// Parses a parameter list like `(a b &optional c &rest d)`.
    pub fn parse_list(value: &Value) -> Result<Vec<Param>> {
        let names = value
            .assert_list()?
            .iter()
            .map(Value::assert_identifier)
            .collect::<Result<Vec<_>>>()?;

        let mut iter = names.into_iter();
        let mut params = vec![];

        while let Some(param) = iter.next() {
            if param == "&rest" {
                let Some(param) = iter.next() else {
                    return Err(RuntimeError::ExpectedIdentifier("nothing".to_string()));
                };
                params.push(Param::Variadic(param));
            } else if param == "&optional" {
                let Some(param) = iter.next() else {
                    return Err(RuntimeError::ExpectedIdentifier("nothing".to_string()));
                };
                params.push(Param::Optional(param));
            } else {
                params.push(Param::Required(param));
            }
        }

        Ok(params)
    }
}

/// A closure is a user-defined procedure. The environment is the one that was active when the
/// closure was created and it's shared with every other holder of it.
#[derive(Clone)]
pub struct Closure {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: Value,
    pub env: Environment,
}

impl Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// A macro transforms the unevaluated arguments of its call site into a new expression, which is
/// then evaluated in place of the call.
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub params: Vec<Param>,
    pub template: Value,
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Id(String),
    List(Vector<Value>),
    Closure(Rc<Closure>),
    Macro(Rc<Macro>),
    Prim(Primitive),
    Extern(Extern),
}

impl Value {
    /// The empty list, used as the nil sentinel.
    pub fn nil() -> Value {
        Value::List(Vector::new())
    }

    pub fn id(name: &str) -> Value {
        Value::Id(name.to_string())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::List(list) if list.is_empty())
    }

    /// Only `false` and the empty list are false.
    pub fn is_true(&self) -> bool {
        !matches!(self, Value::Bool(false)) && !self.is_nil()
    }

    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(self, Value::Id(id) if id == name)
    }

    pub fn assert_identifier(&self) -> Result<String> {
        match self {
            Value::Id(id) => Ok(id.clone()),
            _ => Err(RuntimeError::ExpectedIdentifier(self.to_string())),
        }
    }

    pub fn assert_list(&self) -> Result<Vector<Value>> {
        match self {
            Value::List(list) => Ok(list.clone()),
            _ => Err(RuntimeError::ExpectedList(self.to_string())),
        }
    }

    pub fn assert_string(&self) -> Result<String> {
        match self {
            Value::Str(string) => Ok(string.clone()),
            _ => Err(RuntimeError::ExpectedString(self.to_string())),
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(left), Value::Int(right)) => left == right,
            (Value::Str(left), Value::Str(right)) => left == right,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Id(left), Value::Id(right)) => left == right,
            (Value::List(left), Value::List(right)) => left == right,
            (Value::Closure(left), Value::Closure(right)) => Rc::ptr_eq(left, right),
            (Value::Macro(left), Value::Macro(right)) => Rc::ptr_eq(left, right),
            (Value::Prim(left), Value::Prim(right)) => left == right,
            (Value::Extern(left), Value::Extern(right)) => left.name == right.name,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(int) => write!(f, "{}", int),
            Value::Str(string) => write!(f, "{:?}", string),
            Value::Bool(boolean) => write!(f, "{}", boolean),
            Value::Id(id) => write!(f, "{}", id),
            Value::List(list) => {
                write!(f, "(")?;
                let mut iter = list.iter();
                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;
                    for item in iter {
                        write!(f, " {}", item)?;
                    }
                }
                write!(f, ")")
            }
            Value::Closure(closure) => match &closure.name {
                Some(name) => write!(f, "<closure {}>", name),
                None => write!(f, "<closure>"),
            },
            Value::Macro(macro_) => write!(f, "<macro {}>", macro_.name),
            Value::Prim(prim) => write!(f, "<primitive {}>", prim),
            Value::Extern(extern_) => write!(f, "<extern {}>", extern_.name),
        }
    }
}
