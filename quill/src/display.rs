//! The [`Display`] trait.
use serde_json::{Number, Value};

use crate::{Result, Writer};

/// Output conversion of rendered values.
pub trait Display {
    fn display(&self, f: &mut impl Writer) -> Result<()>;
}

impl<R> Display for &R where R: Display + ?Sized {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        R::display(*self, f)
    }
}

impl Display for str {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(self)
    }
}

impl Display for String {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(self)
    }
}

impl Display for bool {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(if *self { "true" } else { "false" })
    }
}

macro_rules! render_int {
    ($t:ty) => {
        impl Display for $t {
            fn display(&self, f: &mut impl Writer) -> Result<()> {
                f.write_str(itoa::Buffer::new().format(*self))
            }
        }
    };
}

render_int!(u64);
render_int!(i64);
render_int!(usize);

impl Display for f64 {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        match () {
            _ if self.is_nan() => f.write_str("NaN"),
            _ if self.is_infinite() => f.write_str(if *self > 0.0 { "Infinity" } else { "-Infinity" }),
            // `2.0` renders as `2`
            _ if self.fract() == 0.0 && self.abs() < 1e15 => (*self as i64).display(f),
            _ => f.write_str(&self.to_string()),
        }
    }
}

impl Display for Number {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        if let Some(int) = self.as_i64() {
            int.display(f)
        } else if let Some(int) = self.as_u64() {
            int.display(f)
        } else {
            self.as_f64().unwrap_or(f64::NAN).display(f)
        }
    }
}

/// Strings verbatim, `null` as nothing, arrays and objects as json.
impl Display for Value {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => b.display(f),
            Value::Number(num) => num.display(f),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => f.write_str(&serde_json::to_string(self)?),
        }
    }
}

/// Render a [`Display`] into a new string.
pub fn to_string(value: &(impl Display + ?Sized)) -> String {
    let mut buffer = String::new();
    // writing to `String` is infallible
    let _ = value.display(&mut buffer);
    buffer
}

#[cfg(test)]
mod test {
    use super::to_string;
    use serde_json::json;

    #[test]
    fn values() {
        assert_eq!(to_string(&json!(null)), "");
        assert_eq!(to_string(&json!("a<b")), "a<b");
        assert_eq!(to_string(&json!(42)), "42");
        assert_eq!(to_string(&json!(-7)), "-7");
        assert_eq!(to_string(&json!(2.0)), "2");
        assert_eq!(to_string(&json!(0.5)), "0.5");
        assert_eq!(to_string(&json!(true)), "true");
        assert_eq!(to_string(&json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(to_string(&json!({ "a": 1 })), r#"{"a":1}"#);
        assert_eq!(to_string(&f64::NAN), "NaN");
    }
}
