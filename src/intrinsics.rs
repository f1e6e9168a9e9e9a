//! Native procedures of the outer language layer. They receive their arguments already
//! evaluated, along with the environment of the caller.

use std::path::Path;

use crate::environment::{Environment, Frame};
use crate::error::{Result, RuntimeError};
use crate::expand;
use crate::reader;
use crate::value::{CallScope, Extern, Native, Value};

pub const INTRINSICS: &[(&str, Native)] = &[
    ("apply", apply),
    ("eval", eval),
    ("read", read),
    ("slurp-file", slurp_file),
    ("load", load),
    ("print", print),
    ("pair?", is_pair),
    ("macroexpand", macroexpand),
];

/// Installs every intrinsic in `frame`.
pub fn register(frame: &mut Frame) {
    for &(name, call) in INTRINSICS {
        frame.insert(name.to_string(), Value::Extern(Extern { name, call }));
    }
}

/// apply : fn -> list a -> b
///
/// The function can be given by name, so `(apply '+ '(1 2))` works.
pub fn apply(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(2)?;

    let function = match scope.at(0) {
        Value::Id(name) => scope.env.lookup(&name)?,
        function => function,
    };
    let args = scope.at(1).assert_list()?.into_iter().collect();

    function.apply(args, scope.env)
}

/// eval : expr -> a
pub fn eval(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    scope.at(0).eval(scope.env)
}

/// macroexpand : expr -> expr
pub fn macroexpand(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    expand::expand(scope.at(0), scope.env)
}

/// read : string -> list expr
pub fn read(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    let source = scope.at(0).assert_string()?;

    Ok(reader::read(&source, None)?.into_iter().collect())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|err| RuntimeError::Io(path.display().to_string(), err.to_string()))
}

/// slurp-file : string -> string
pub fn slurp_file(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    let path = scope.at(0).assert_string()?;

    Ok(Value::Str(read_file(Path::new(&path))?))
}

/// Reads a file and evaluates each of its expressions, returning the last value.
pub fn load_file(path: &Path, env: &Environment) -> Result<Value> {
    log::info!(target: "blueprint::load", "loading {}", path.display());

    let contents = read_file(path)?;
    let values = reader::read(&contents, Some(path.display().to_string()))?;

    values
        .iter()
        .try_fold(Value::nil(), |_, next| next.eval(env))
}

/// load : string -> a
pub fn load(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    let path = scope.at(0).assert_string()?;

    load_file(Path::new(&path), scope.env)
}

/// print : a... -> nil
pub fn print(scope: CallScope<'_>) -> Result<Value> {
    let line = scope
        .args
        .iter()
        .map(|arg| match arg {
            Value::Str(string) => string.clone(),
            arg => arg.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    println!("{}", line);

    Ok(Value::nil())
}

/// pair? : a -> bool
pub fn is_pair(scope: CallScope<'_>) -> Result<Value> {
    scope.assert_arity(1)?;

    let value = scope.at(0);

    Ok(Value::Bool(matches!(value, Value::List(list) if !list.is_empty())))
}
