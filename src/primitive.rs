//! Primitive operators. Every operator is a binary operation, and applying it to a list of
//! arguments is a left fold that starts from the first argument.

use std::fmt::Display;

use crate::error::{Result, RuntimeError};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Lt,
    Gt,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Add,
        Primitive::Sub,
        Primitive::Mul,
        Primitive::Div,
        Primitive::Mod,
        Primitive::Eq,
        Primitive::Lt,
        Primitive::Gt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Add => "+",
            Primitive::Sub => "-",
            Primitive::Mul => "*",
            Primitive::Div => "/",
            Primitive::Mod => "%",
            Primitive::Eq => "==",
            Primitive::Lt => "<",
            Primitive::Gt => ">",
        }
    }

    /// Folds the operator over the arguments. A single argument is returned unchanged.
    pub fn fold(self, args: Vec<Value>) -> Result<Value> {
        let mut iter = args.into_iter();

        let Some(first) = iter.next() else {
            return Err(RuntimeError::MissingArguments(self.name().to_string()));
        };

        iter.try_fold(first, |acc, next| self.combine(acc, next))
    }

    /// The underlying binary operation.
    pub fn combine(self, left: Value, right: Value) -> Result<Value> {
        use Value::*;

        match (self, left, right) {
            (Primitive::Eq, left, right) => Ok(Bool(left == right)),
            (Primitive::Add, Str(left), Str(right)) => Ok(Str(left + &right)),
            (Primitive::Add, List(mut left), List(right)) => {
                left.append(right);
                Ok(List(left))
            }
            (_, Int(left), Int(right)) => self.arithmetic(left, right),
            (_, left, right) => Err(RuntimeError::TypeMismatch(
                self.name().to_string(),
                format!("{} and {}", left, right),
            )),
        }
    }

    fn arithmetic(self, left: i64, right: i64) -> Result<Value> {
        let overflow = || RuntimeError::IntegerOverflow(self.name().to_string());

        let value = match self {
            Primitive::Add => left.checked_add(right).ok_or_else(overflow)?,
            Primitive::Sub => left.checked_sub(right).ok_or_else(overflow)?,
            Primitive::Mul => left.checked_mul(right).ok_or_else(overflow)?,
            Primitive::Div => floor_div(left, right)?,
            Primitive::Mod => floor_mod(left, right)?,
            Primitive::Lt => return Ok(Value::Bool(left < right)),
            Primitive::Gt => return Ok(Value::Bool(left > right)),
            Primitive::Eq => return Ok(Value::Bool(left == right)),
        };

        Ok(Value::Int(value))
    }
}

/// Integer division rounding towards negative infinity.
fn floor_div(left: i64, right: i64) -> Result<i64> {
    if right == 0 {
        return Err(RuntimeError::DivisionByZero);
    }

    let quotient = left
        .checked_div(right)
        .ok_or_else(|| RuntimeError::IntegerOverflow("/".to_string()))?;

    if left % right != 0 && (left < 0) != (right < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(left: i64, right: i64) -> Result<i64> {
    if right == 0 {
        return Err(RuntimeError::DivisionByZero);
    }

    let remainder = left
        .checked_rem(right)
        .ok_or_else(|| RuntimeError::IntegerOverflow("%".to_string()))?;

    if remainder != 0 && (remainder < 0) != (right < 0) {
        Ok(remainder + right)
    } else {
        Ok(remainder)
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn folds_from_the_left() {
        assert_eq!(Primitive::Add.fold(ints(&[1, 2, 3])), Ok(Value::Int(6)));
        assert_eq!(Primitive::Sub.fold(ints(&[6, 2, 3])), Ok(Value::Int(1)));
        assert_eq!(Primitive::Mul.fold(ints(&[2, 2, 3])), Ok(Value::Int(12)));
        assert_eq!(Primitive::Div.fold(ints(&[12, 2, 3])), Ok(Value::Int(2)));
    }

    #[test]
    fn single_argument_is_returned_unchanged() {
        assert_eq!(Primitive::Sub.fold(ints(&[5])), Ok(Value::Int(5)));
        assert_eq!(
            Primitive::Add.fold(vec![Value::id("x")]),
            Ok(Value::id("x"))
        );
    }

    #[test]
    fn zero_arguments_fail() {
        assert_eq!(
            Primitive::Add.fold(vec![]),
            Err(RuntimeError::MissingArguments("+".into()))
        );
    }

    #[test]
    fn floor_semantics() {
        assert_eq!(Primitive::Div.fold(ints(&[-7, 2])), Ok(Value::Int(-4)));
        assert_eq!(Primitive::Mod.fold(ints(&[-7, 2])), Ok(Value::Int(1)));
        assert_eq!(Primitive::Mod.fold(ints(&[12, 5])), Ok(Value::Int(2)));
        assert_eq!(
            Primitive::Mod.fold(ints(&[12, 0])),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn add_joins_strings_and_lists() {
        assert_eq!(
            Primitive::Add.fold(vec!["foo".into(), "bar".into()]),
            Ok(Value::from("foobar"))
        );

        let joined = Primitive::Add.fold(vec![
            ints(&[1]).into_iter().collect(),
            ints(&[2, 3]).into_iter().collect(),
        ]);
        assert_eq!(joined, Ok(ints(&[1, 2, 3]).into_iter().collect()));
    }

    #[test]
    fn mismatched_operands() {
        assert!(matches!(
            Primitive::Add.fold(vec![Value::Int(1), "a".into()]),
            Err(RuntimeError::TypeMismatch(..))
        ));
        assert_eq!(
            Primitive::Add.fold(ints(&[i64::MAX, 1])),
            Err(RuntimeError::IntegerOverflow("+".into()))
        );
    }

    #[test]
    fn equality_is_structural() {
        let list = || -> Value { ints(&[1, 2]).into_iter().collect() };

        assert_eq!(Primitive::Eq.fold(vec![list(), list()]), Ok(Value::Bool(true)));
        assert_eq!(
            Primitive::Eq.fold(vec![Value::Int(1), "1".into()]),
            Ok(Value::Bool(false))
        );
    }
}
