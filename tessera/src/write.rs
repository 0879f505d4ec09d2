//! The [`Writer`] trait
use crate::Result;

/// Render output buffer.
pub trait Writer {
    fn write_str(&mut self, value: &str) -> Result<()>;
}

impl<R> Writer for &mut R where R: Writer + ?Sized {
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

/// Wrap [`Writer`] to xml escape input.
///
/// `&`, `<` and `>` are always escaped, `"` only when `attribute` is set.
pub struct Escape<W> {
    pub writer: W,
    pub attribute: bool,
}

impl<W> Escape<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, attribute: false }
    }

    pub fn attribute(writer: W) -> Self {
        Self { writer, attribute: true }
    }
}

impl<W> Writer for Escape<W> where W: Writer {
    fn write_str(&mut self, value: &str) -> Result<()> {
        let mut latest = 0;

        for (i,ch) in value.char_indices() {
            let escaped = match ch {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' if self.attribute => "&quot;",
                _ => continue,
            };

            self.writer.write_str(&value[latest..i])?;
            self.writer.write_str(escaped)?;

            latest = i + 1;
        }

        if let Some(value) = value.get(latest..) {
            if !value.is_empty() {
                self.writer.write_str(value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escape() {
        let mut buffer = String::new();
        Escape::new(&mut buffer).write_str("<a href=\"x\">&</a>").unwrap();
        assert_eq!(buffer, "&lt;a href=\"x\"&gt;&amp;&lt;/a&gt;");

        let mut buffer = String::new();
        Escape::attribute(&mut buffer).write_str("say \"hi\"").unwrap();
        assert_eq!(buffer, "say &quot;hi&quot;");
    }

    #[test]
    fn bytes() {
        let mut buffer = bytes::BytesMut::new();
        buffer.write_str("héllo").unwrap();
        assert_eq!(&buffer[..], "héllo".as_bytes());
    }
}
