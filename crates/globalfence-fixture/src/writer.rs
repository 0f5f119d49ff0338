//! Indentation-aware line buffer for generated source

const INDENT: &str = "    ";

/// Accumulates generated source lines
///
/// `doc_open` is set right after a doc comment is closed and cleared by any
/// other write, so a following `doc_comment` call extends the same block.
#[derive(Debug, Default)]
pub struct CodeWriter {
    lines: Vec<String>,
    indent: usize,
    doc_open: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, line: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.indent), line.as_ref()));
        self.doc_open = false;
    }

    /// Write several lines at the current indentation
    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
    }

    /// Write an empty line (never indented)
    pub fn blank(&mut self) {
        self.lines.push(String::new());
        self.doc_open = false;
    }

    /// Write `open`, the body one level deeper, then `close`
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indent += 1;
        body(self);
        self.indent -= 1;
        self.line(close);
    }

    /// Write `// ` line comments
    pub fn comment<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(format!("// {}", line.as_ref()));
        }
    }

    /// Write a `/** ... */` block, extending the previous one if it was just closed
    pub fn doc_comment<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.doc_open {
            self.lines.pop();
        } else {
            self.line("/**");
        }

        for line in lines {
            self.line(format!(" * {}", line.as_ref()));
        }

        self.line(" */");
        self.doc_open = true;
    }

    /// Buffered text, one `\n` per line
    pub fn finish(self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
