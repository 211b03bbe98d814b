use crate::error::ScanError;
use crate::tag::Tag;
use std::io::BufRead;

/// Line-pair tokenizer over an ASCII DXF stream.
///
/// Each tag spans a code line and a value line. Blank code lines are
/// skipped. The first error is kept and ends the stream.
pub struct Scanner<R> {
    reader: R,
    buf: Vec<u8>,
    line: usize,
    last: Tag,
    err: Option<ScanError>,
    done: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            last: Tag::default(),
            err: None,
            done: false,
        }
    }

    /// Reads the next tag into [`Scanner::last_tag`]. Returns false at end
    /// of stream or on error; check [`Scanner::err`] to tell them apart.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        match self.read_tag() {
            Ok(Some(tag)) => {
                self.last = tag;
                true
            }
            Ok(None) => {
                self.done = true;
                false
            }
            Err(err) => {
                self.err = Some(err);
                self.done = true;
                false
            }
        }
    }

    pub fn last_tag(&self) -> &Tag {
        &self.last
    }

    pub fn err(&self) -> Option<&ScanError> {
        self.err.as_ref()
    }

    pub fn take_err(&mut self) -> Option<ScanError> {
        self.err.take()
    }

    /// True once the stream ended or failed; no further tags will come.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    fn read_tag(&mut self) -> Result<Option<Tag>, ScanError> {
        let code = loop {
            let Some(raw) = self.read_line()? else {
                return Ok(None);
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            break trimmed.parse::<i32>().map_err(|_| ScanError::InvalidCode {
                line: self.line,
                raw: raw.clone(),
            })?;
        };

        let value = self.read_line()?.ok_or(ScanError::MissingValue {
            line: self.line,
            code,
        })?;
        Ok(Some(Tag { code, value }))
    }

    /// Next line without its terminator, `None` once nothing is left.
    fn read_line(&mut self) -> Result<Option<String>, ScanError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Tag, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            return Some(Ok(self.last.clone()));
        }
        self.take_err().map(Err)
    }
}
