//! The [`Writer`] trait
use crate::Result;

/// Output sink of a render.
pub trait Writer {
    fn write_str(&mut self, value: &str) -> Result<()>;
}

impl<R> Writer for &mut R where R: Writer {
    fn write_str(&mut self, value: &str) -> Result<()> {
        R::write_str(self, value)
    }
}

impl Writer for Vec<u8> {
    fn write_str(&mut self, value: &str) -> Result<()> {
        self.extend_from_slice(value.as_bytes());
        Ok(())
    }
}

impl Writer for String {
    fn write_str(&mut self, value: &str) -> Result<()> {
        self.push_str(value);
        Ok(())
    }
}

impl Writer for bytes::BytesMut {
    fn write_str(&mut self, value: &str) -> Result<()> {
        bytes::BufMut::put(self, value.as_bytes());
        Ok(())
    }
}

/// Wrap [`Writer`] to escape input.
///
/// `& < > " '` become `&amp; &lt; &gt; &quot; &#39;`, based on [OWASP recommendation][1]
///
/// [1]: <https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html>
pub struct Escape<W>(pub W);

impl<W> Writer for Escape<W> where W: Writer {
    fn write_str(&mut self, value: &str) -> Result<()> {
        let mut latest = 0;

        for (i, ch) in value.char_indices() {
            let escaped = match ch {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                _ => continue,
            };

            self.0.write_str(&value[latest..i])?;
            self.0.write_str(escaped)?;

            // all escaped chars are single byte
            latest = i + 1;
        }

        if latest < value.len() {
            self.0.write_str(&value[latest..])?;
        }

        Ok(())
    }
}

/// Html escape a string.
pub fn escape(value: &str) -> String {
    let mut buffer = String::with_capacity(value.len());
    // writing to `String` is infallible
    let _ = Escape(&mut buffer).write_str(value);
    buffer
}

#[cfg(test)]
mod test {
    use super::{Escape, Writer, escape};

    #[test]
    fn escapes() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("ünï<"), "ünï&lt;");
    }

    #[test]
    fn escape_bytes() {
        let mut buffer = bytes::BytesMut::new();
        Escape(&mut buffer).write_str("a<b").unwrap();
        assert_eq!(&buffer[..], b"a&lt;b");
    }
}
