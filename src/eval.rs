//! Evaluates expressions. Dispatch happens on the head of a list: special forms first, in a fixed
//! order, then macros, then ordinary application.

use std::rc::Rc;

use im_rc::Vector;

use crate::environment::{Environment, Frame};
use crate::error::{Result, RuntimeError};
use crate::value::{CallScope, Closure, Macro, Param, Value};

/// Forms handled directly by the evaluator. Their names are never looked up, so they can't be
/// shadowed by definitions or macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Quote,
    Define,
    Set,
    Cons,
    First,
    Rest,
    List,
    Lambda,
    Defmacro,
    Cond,
    Begin,
}

impl SpecialForm {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "quote" => SpecialForm::Quote,
            "define" => SpecialForm::Define,
            "set!" => SpecialForm::Set,
            "cons" => SpecialForm::Cons,
            "first" => SpecialForm::First,
            "rest" => SpecialForm::Rest,
            "list" => SpecialForm::List,
            "lambda" => SpecialForm::Lambda,
            "defmacro" => SpecialForm::Defmacro,
            "cond" => SpecialForm::Cond,
            "begin" => SpecialForm::Begin,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::Define => "define",
            SpecialForm::Set => "set!",
            SpecialForm::Cons => "cons",
            SpecialForm::First => "first",
            SpecialForm::Rest => "rest",
            SpecialForm::List => "list",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Defmacro => "defmacro",
            SpecialForm::Cond => "cond",
            SpecialForm::Begin => "begin",
        }
    }

    /// Takes exactly `N` operands, or fails with a malformed form error.
    fn operands<const N: usize>(self, args: &Vector<Value>) -> Result<[&Value; N]> {
        if args.len() != N {
            return Err(RuntimeError::MalformedForm(
                self.name(),
                format!("expected {} operands, got {}", N, args.len()),
            ));
        }

        Ok(std::array::from_fn(|i| &args[i]))
    }

    /// Takes at least `size` operands, or fails with a malformed form error.
    fn at_least(self, args: &Vector<Value>, size: usize) -> Result<()> {
        if args.len() < size {
            return Err(RuntimeError::MalformedForm(
                self.name(),
                format!("expected at least {} operands, got {}", size, args.len()),
            ));
        }

        Ok(())
    }
}

/// Binds parameters to arguments in a fresh frame.
pub fn bind_parameters(params: &[Param], args: Vec<Value>) -> Result<Frame> {
    let required = params
        .iter()
        .filter(|param| matches!(param, Param::Required(_)))
        .count();
    let arity = args.len();

    let mut iter = args.into_iter();
    let mut frame = Frame::new();

    for param in params {
        match param {
            Param::Required(name) => {
                let Some(value) = iter.next() else {
                    return Err(RuntimeError::ArityMismatch(required, arity));
                };
                frame.insert(name.clone(), value);
            }
            Param::Optional(name) => {
                let value = iter.next().unwrap_or_else(Value::nil);
                frame.insert(name.clone(), value);
            }
            Param::Variadic(name) => {
                frame.insert(name.clone(), iter.by_ref().collect());
                return Ok(frame);
            }
        }
    }

    if iter.next().is_some() {
        Err(RuntimeError::ArityMismatch(params.len(), arity))
    } else {
        Ok(frame)
    }
}

/// Turns a list of body expressions into a single expression.
fn body(mut exprs: Vector<Value>) -> Value {
    if exprs.len() == 1 {
        exprs[0].clone()
    } else {
        exprs.push_front(Value::id("begin"));
        Value::List(exprs)
    }
}

/// Evaluates the expressions in order and returns the last value.
fn sequence(exprs: &Vector<Value>, env: &Environment) -> Result<Value> {
    exprs
        .iter()
        .try_fold(Value::nil(), |_, expr| expr.eval(env))
}

impl Closure {
    pub fn apply(&self, args: Vec<Value>) -> Result<Value> {
        let _call = self.env.enter_call()?;
        let frame = bind_parameters(&self.params, args)?;
        self.body.eval(&self.env.extend(frame))
    }
}

impl Value {
    /// Evaluates the value as an expression in the given environment.
    pub fn eval(&self, env: &Environment) -> Result<Value> {
        log::trace!(target: "blueprint::eval", "{}", self);

        match self {
            Value::Id(name) => env.lookup(name),
            Value::List(list) => match list.front() {
                None => Ok(Value::nil()),
                Some(head) => {
                    let args = list.skip(1);
                    Value::eval_form(head, args, env)
                }
            },
            _ => Ok(self.clone()),
        }
    }

    fn eval_form(head: &Value, args: Vector<Value>, env: &Environment) -> Result<Value> {
        if let Value::Id(name) = head {
            if let Some(form) = SpecialForm::from_name(name) {
                return Value::eval_special(form, args, env);
            }

            if let Some(Value::Macro(macro_)) = env.find(name) {
                return macro_.call(args.into_iter().collect(), env);
            }
        }

        let procedure = head.eval(env)?;
        let args = args
            .iter()
            .map(|arg| arg.eval(env))
            .collect::<Result<Vec<_>>>()?;

        procedure.apply(args, env)
    }

    fn eval_special(form: SpecialForm, args: Vector<Value>, env: &Environment) -> Result<Value> {
        match form {
            SpecialForm::Quote => {
                let [value] = form.operands::<1>(&args)?;
                Ok(value.clone())
            }
            SpecialForm::Define => {
                form.at_least(&args, 2)?;
                match &args[0] {
                    Value::List(signature) => {
                        let Some(name) = signature.front() else {
                            return Err(RuntimeError::MalformedForm(
                                form.name(),
                                "missing function name".to_string(),
                            ));
                        };
                        let name = name.assert_identifier()?;
                        let params = Param::parse_list(&Value::List(signature.skip(1)))?;
                        let closure = Value::Closure(Rc::new(Closure {
                            name: Some(name.clone()),
                            params,
                            body: body(args.skip(1)),
                            env: env.clone(),
                        }));
                        env.define(name, closure.clone());
                        Ok(closure)
                    }
                    target => {
                        let name = target.assert_identifier()?;
                        let [_, expr] = form.operands::<2>(&args)?;
                        let value = expr.eval(env)?;
                        env.define(name, value.clone());
                        Ok(value)
                    }
                }
            }
            SpecialForm::Set => {
                let [target, expr] = form.operands::<2>(&args)?;
                let name = target.assert_identifier()?;
                let value = expr.eval(env)?;
                env.set(&name, value.clone())?;
                Ok(value)
            }
            SpecialForm::Cons => {
                let [head, tail] = form.operands::<2>(&args)?;
                let head = head.eval(env)?;
                match tail.eval(env)? {
                    Value::List(mut list) => {
                        list.push_front(head);
                        Ok(Value::List(list))
                    }
                    tail => Err(RuntimeError::TypeMismatch(
                        form.name().to_string(),
                        format!("{} and {}", head, tail),
                    )),
                }
            }
            SpecialForm::First => {
                let [expr] = form.operands::<1>(&args)?;
                match expr.eval(env)? {
                    Value::List(list) if !list.is_empty() => Ok(list[0].clone()),
                    value => Err(RuntimeError::EmptySequenceAccess(form.name(), value.to_string())),
                }
            }
            SpecialForm::Rest => {
                let [expr] = form.operands::<1>(&args)?;
                match expr.eval(env)? {
                    Value::List(list) if !list.is_empty() => Ok(Value::List(list.skip(1))),
                    value => Err(RuntimeError::EmptySequenceAccess(form.name(), value.to_string())),
                }
            }
            SpecialForm::List => args.iter().map(|arg| arg.eval(env)).collect(),
            SpecialForm::Lambda => {
                form.at_least(&args, 2)?;
                let params = Param::parse_list(&args[0])?;
                Ok(Value::Closure(Rc::new(Closure {
                    name: None,
                    params,
                    body: body(args.skip(1)),
                    env: env.clone(),
                })))
            }
            SpecialForm::Defmacro => {
                form.at_least(&args, 2)?;
                let signature = args[0].assert_list()?;
                let Some(name) = signature.front() else {
                    return Err(RuntimeError::MalformedForm(
                        form.name(),
                        "missing macro name".to_string(),
                    ));
                };
                let name = name.assert_identifier()?;
                let params = Param::parse_list(&Value::List(signature.skip(1)))?;
                let value = Value::Macro(Rc::new(Macro {
                    name: name.clone(),
                    params,
                    template: body(args.skip(1)),
                }));
                env.define(name, value.clone());
                Ok(value)
            }
            SpecialForm::Cond => {
                for clause in args.iter() {
                    let clause = clause.assert_list()?;
                    let Some(predicate) = clause.front() else {
                        return Err(RuntimeError::MalformedForm(
                            form.name(),
                            "empty clause".to_string(),
                        ));
                    };

                    if predicate.is_identifier("else") {
                        return sequence(&clause.skip(1), env);
                    }

                    let value = predicate.eval(env)?;
                    if value.is_true() {
                        if clause.len() == 1 {
                            return Ok(value);
                        }
                        return sequence(&clause.skip(1), env);
                    }
                }

                Ok(Value::nil())
            }
            SpecialForm::Begin => sequence(&args, env),
        }
    }

    /// Applies an already evaluated procedure to already evaluated arguments. The environment is
    /// the caller's one, it's used by native functions and by macros applied as values.
    pub fn apply(&self, args: Vec<Value>, env: &Environment) -> Result<Value> {
        match self {
            Value::Prim(prim) => prim.fold(args),
            Value::Extern(extern_) => (extern_.call)(CallScope { args, env }),
            Value::Closure(closure) => closure.apply(args),
            Value::Macro(macro_) => macro_.call(args, env),
            _ => Err(RuntimeError::NotApplicable(self.to_string())),
        }
    }
}

/// Evaluates `expr` in `env`.
pub fn eval(expr: &Value, env: &Environment) -> Result<Value> {
    expr.eval(env)
}

/// Applies `procedure` to `args`, on behalf of a caller running in `env`.
pub fn apply(procedure: &Value, args: Vec<Value>, env: &Environment) -> Result<Value> {
    procedure.apply(args, env)
}
