//! Bootstrap of the default global environment. The primitive operators and the intrinsics are
//! installed natively; the rest of the standard library is written in the language itself and
//! evaluated by the ordinary evaluator.

use crate::environment::{Environment, Frame};
use crate::error::Result;
use crate::intrinsics;
use crate::primitive::Primitive;
use crate::reader;
use crate::value::Value;

const PRELUDE: &str = include_str!("prelude.lisp");

/// The frame with the primitive operators, the booleans and the intrinsics.
pub fn primitives() -> Frame {
    let mut frame = Frame::new();

    for prim in Primitive::ALL {
        frame.insert(prim.name().to_string(), Value::Prim(prim));
    }

    frame.insert("true".to_string(), Value::Bool(true));
    frame.insert("false".to_string(), Value::Bool(false));

    intrinsics::register(&mut frame);

    frame
}

/// Creates a global environment made of three frames: primitives, standard library and an empty
/// frame for user definitions.
pub fn global_environment() -> Result<Environment> {
    let mut env = Environment::from_frame(primitives());

    env.push_frame(Frame::new());
    for expr in reader::read(PRELUDE, Some("prelude.lisp".to_string()))? {
        expr.eval(&env)?;
    }

    log::debug!(
        target: "blueprint::prelude",
        "standard library loaded with {} bindings",
        env.current_frame().borrow().len()
    );

    env.push_frame(Frame::new());

    Ok(env)
}
