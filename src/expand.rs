//! Macro expansion. A macro call is evaluated in two steps: the template is evaluated with the
//! parameters bound to the unevaluated arguments, and the resulting expression is evaluated in
//! place of the call.

use crate::environment::Environment;
use crate::error::Result;
use crate::eval::{bind_parameters, SpecialForm};
use crate::value::{Macro, Value};

impl Macro {
    /// Produces the expression that replaces a call to this macro. The parameters are bound on top
    /// of the calling environment, so the template can use whatever the call site can see.
    pub fn expand(&self, args: Vec<Value>, env: &Environment) -> Result<Value> {
        let _call = env.enter_call()?;
        let frame = bind_parameters(&self.params, args)?;
        let expanded = self.template.eval(&env.extend(frame))?;

        log::debug!(target: "blueprint::expand", "{} => {}", self.name, expanded);

        Ok(expanded)
    }

    /// Expands the call and evaluates the expansion in the calling environment.
    pub fn call(&self, args: Vec<Value>, env: &Environment) -> Result<Value> {
        let _call = env.enter_call()?;
        self.expand(args, env)?.eval(env)
    }
}

/// Expands the outermost macro call of `expr` until its head is no longer a macro, the way the
/// evaluator would before running it. Subforms are left untouched.
pub fn expand(expr: Value, env: &Environment) -> Result<Value> {
    let mut expr = expr;

    loop {
        let Value::List(list) = &expr else {
            return Ok(expr);
        };

        let Some(Value::Id(name)) = list.front() else {
            return Ok(expr);
        };

        if SpecialForm::from_name(name).is_some() {
            return Ok(expr);
        }

        let Some(Value::Macro(macro_)) = env.find(name) else {
            return Ok(expr);
        };

        expr = macro_.expand(list.skip(1).into_iter().collect(), env)?;
    }
}
