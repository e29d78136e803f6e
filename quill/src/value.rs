//! Operations on render values.
//!
//! Failures are plain messages, the evaluator locates them.
use serde_json::{Map, Number, Value};
use quill_core::script::{BinOp, UnaryOp};

use crate::display::to_string;

pub(crate) type Fallible<T> = std::result::Result<T, String>;

/// `null`, `false`, `0`, `NaN` and `""` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(num) => num.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Non finite floats have no json representation and become `null`.
pub fn float(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

/// `target.name`, missing fields are `null`.
pub fn field(target: &Value, name: &str) -> Fallible<Value> {
    match (target, name) {
        (Value::Null, _) => Err(format!("cannot read field `{name}` of null")),
        (Value::Object(map), _) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        (Value::Array(items), "length") => Ok(items.len().into()),
        (Value::String(s), "length") => Ok(s.chars().count().into()),
        _ => Ok(Value::Null),
    }
}

/// `target[index]`, out of range is `null`.
///
/// Numbers index objects by their text, `o[1]` is `o['1']`.
pub fn index(target: &Value, index: &Value) -> Fallible<Value> {
    match (target, index) {
        (Value::Null, _) => Err(format!("cannot index null with `{}`", to_string(index))),
        (Value::Array(items), Value::Number(num)) => {
            Ok(position(num).and_then(|i| items.get(i)).cloned().unwrap_or(Value::Null))
        }
        (Value::String(s), Value::Number(num)) => Ok(position(num)
            .and_then(|i| s.chars().nth(i))
            .map_or(Value::Null, |ch| Value::String(ch.into()))),
        (Value::Object(_), Value::Number(_)) => field(target, &to_string(index)),
        (target, Value::String(name)) => field(target, name),
        (target, index) => Err(format!("cannot index {} with {}", type_name(target), type_name(index))),
    }
}

/// Non negative integral numbers, `1.0` included.
fn position(num: &Number) -> Option<usize> {
    if let Some(int) = num.as_u64() {
        return usize::try_from(int).ok();
    }
    let float = num.as_f64()?;
    match float >= 0.0 && float.fract() == 0.0 && float < usize::MAX as f64 {
        true => Some(float as usize),
        false => None,
    }
}

pub fn unary(op: UnaryOp, value: Value) -> Fallible<Value> {
    match (op, value) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!truthy(&value))),
        (UnaryOp::Neg, Value::Number(num)) => Ok(match num.as_i64().and_then(i64::checked_neg) {
            Some(int) => int.into(),
            None => float(-num.as_f64().unwrap_or(f64::NAN)),
        }),
        (UnaryOp::Neg, value) => Err(format!("cannot negate {}", type_name(&value))),
    }
}

/// Non short circuiting binary operators.
pub fn binary(lhs: Value, op: BinOp, rhs: Value) -> Fallible<Value> {
    match op {
        BinOp::Eq => Ok(Value::Bool(loose_eq(&lhs, &rhs))),
        BinOp::NotEq => Ok(Value::Bool(!loose_eq(&lhs, &rhs))),
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => compare(&lhs, op, &rhs).map(Value::Bool),
        BinOp::Add => add(lhs, rhs),
        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => arithmetic(&lhs, op, &rhs),
        // short circuiting, handled by the evaluator
        BinOp::Coalesce | BinOp::Or | BinOp::And => {
            Err(format!("unexpected short circuit operator {op:?}"))
        }
    }
}

/// `slot += value` in place.
pub fn append(slot: &mut Value, value: &Value) -> Fallible<()> {
    match slot {
        Value::String(s) => {
            // `Display` into a `String` is infallible
            let _ = crate::Display::display(value, s);
            Ok(())
        }
        slot => {
            *slot = add(slot.take(), value.clone())?;
            Ok(())
        }
    }
}

/// Concatenates when either side is a string.
fn add(lhs: Value, rhs: Value) -> Fallible<Value> {
    match (lhs, rhs) {
        (Value::String(mut s), rhs) => {
            s.push_str(&to_string(&rhs));
            Ok(Value::String(s))
        }
        (lhs, Value::String(s)) => Ok(Value::String(to_string(&lhs) + &s)),
        (lhs, rhs) => arithmetic(&lhs, BinOp::Add, &rhs),
    }
}

fn arithmetic(lhs: &Value, op: BinOp, rhs: &Value) -> Fallible<Value> {
    let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
        return Err(format!("cannot apply `{}` to {} and {}", symbol(op), type_name(lhs), type_name(rhs)));
    };

    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        let int = match op {
            BinOp::Add => a.checked_add(b),
            BinOp::Sub => a.checked_sub(b),
            BinOp::Mul => a.checked_mul(b),
            BinOp::Div if b != 0 && a % b == 0 => a.checked_div(b),
            BinOp::Rem if b != 0 => a.checked_rem(b),
            _ => None,
        };
        if let Some(int) = int {
            return Ok(int.into());
        }
    }

    let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
    Ok(float(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        _ => a % b,
    }))
}

fn compare(lhs: &Value, op: BinOp, rhs: &Value) -> Fallible<bool> {
    let ordering = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().partial_cmp(&b.as_f64()),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => return Err(format!("cannot compare {} with {}", type_name(lhs), type_name(rhs))),
    };

    // NaN compares false to everything
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::LtEq => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    })
}

/// Numbers compare by value, `1 == 1.0`.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (lhs, rhs) => lhs == rhs,
    }
}

/// `merge(a, b)`, shallow, `b` wins. `null` merges as an empty object.
pub fn merge(lhs: Value, rhs: Value) -> Fallible<Value> {
    let mut map = into_object(lhs)?;
    map.extend(into_object(rhs)?);
    Ok(Value::Object(map))
}

fn into_object(value: Value) -> Fallible<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        value => Err(format!("cannot merge {}", type_name(&value))),
    }
}

pub fn len(value: &Value) -> Fallible<usize> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(map) => Ok(map.len()),
        value => Err(format!("{} has no length", type_name(value))),
    }
}

/// `join(items, separator)`
pub fn join(items: &Value, separator: &str) -> Fallible<Value> {
    let Value::Array(items) = items else {
        return Err(format!("cannot join {}", type_name(items)));
    };
    let items: Vec<_> = items.iter().map(to_string).collect();
    Ok(Value::String(items.join(separator)))
}

fn symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Coalesce => "??",
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::LtEq => "<=",
        BinOp::Gt => ">",
        BinOp::GtEq => ">=",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
    }
}
