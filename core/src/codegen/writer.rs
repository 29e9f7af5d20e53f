#![deny(missing_docs)]

//! # Code Writer
//!
//! Line-oriented string builder that tracks indentation.

const INDENT: &str = "    ";

/// Accumulates generated source text.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    level: usize,
}

impl CodeWriter {
    /// Creates an empty writer at indentation level zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation. Empty text writes a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Writes `text` as `///` doc lines.
    pub fn doc(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {}", line));
            }
        }
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Decreases the indentation level.
    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Writes `header {` and indents.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.indent();
    }

    /// Dedents and writes `closing` (usually `}`).
    pub fn close(&mut self, closing: impl AsRef<str>) {
        self.dedent();
        self.line(closing);
    }

    /// Writes a `header { ... }` block around `body`.
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.open(header);
        body(self);
        self.close("}");
    }

    /// Returns the accumulated text.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_blocks() {
        let mut w = CodeWriter::new();
        w.doc("A thing.\n\nMore.");
        w.block("pub struct Thing", |w| {
            w.line("pub id: String,");
        });
        w.blank();
        w.block("impl Thing", |w| {
            w.block("fn id(&self) -> &str", |w| {
                w.line("&self.id");
            });
        });

        let expected = "/// A thing.\n///\n/// More.\npub struct Thing {\n    pub id: String,\n}\n\nimpl Thing {\n    fn id(&self) -> &str {\n        &self.id\n    }\n}\n";
        assert_eq!(w.finish(), expected);
    }
}
