// file: src/crawler/render.rs
// description: Transcript formatting: path headers, numbered lines, inline diagnostics
// reference: https://docs.rs/tokio/latest/tokio/io/trait.AsyncBufReadExt.html

use crate::error::Result;
use std::fmt::Display;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// How one entry's body ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyOutcome {
    Complete { lines: u64 },
    Interrupted { lines: u64, detail: String },
}

pub fn numbered_line(number: u64, line: &str) -> String {
    format!("{:05}| {}", number, line)
}

/// Writes the transcript format onto a borrowed sink. Errors returned from
/// these methods are sink failures; source read failures are written inline.
pub struct TranscriptWriter<'a, W> {
    out: &'a mut W,
}

impl<'a, W> TranscriptWriter<'a, W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    pub async fn header(&mut self, path: &str) -> Result<()> {
        self.out.write_all(format!("# {}\n", path).as_bytes()).await?;
        Ok(())
    }

    pub async fn metadata_failure(&mut self, path: &str, detail: impl Display) -> Result<()> {
        self.out
            .write_all(format!("Could not get info for {}: {}\n", path, detail).as_bytes())
            .await?;
        Ok(())
    }

    pub async fn read_failure(&mut self, path: &str, detail: impl Display) -> Result<()> {
        self.out
            .write_all(format!("Error reading {}: {}\n", path, detail).as_bytes())
            .await?;
        Ok(())
    }

    /// Copies `reader` line by line with 1-based, 5-digit counters, keeping
    /// each line's own terminator, then writes the blank separator line. A
    /// failed read stops the body and writes an `Error reading` line instead
    /// of the separator.
    pub async fn body<R>(&mut self, path: &str, mut reader: R) -> Result<BodyOutcome>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = String::new();
        let mut lines = 0u64;

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    lines += 1;
                    self.out
                        .write_all(numbered_line(lines, &line).as_bytes())
                        .await?;
                }
                Err(e) => {
                    self.read_failure(path, &e).await?;
                    return Ok(BodyOutcome::Interrupted {
                        lines,
                        detail: e.to_string(),
                    });
                }
            }
        }

        self.out.write_all(b"\n").await?;
        Ok(BodyOutcome::Complete { lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    async fn render(path: &str, content: &[u8]) -> (String, BodyOutcome) {
        let mut out = Vec::new();
        let mut writer = TranscriptWriter::new(&mut out);
        writer.header(path).await.unwrap();
        let outcome = writer.body(path, Cursor::new(content.to_vec())).await.unwrap();
        (String::from_utf8(out).unwrap(), outcome)
    }

    #[test]
    fn test_numbered_line_padding() {
        assert_eq!(numbered_line(1, "x\n"), "00001| x\n");
        assert_eq!(numbered_line(42, ""), "00042| ");
        assert_eq!(numbered_line(123456, "y"), "123456| y");
    }

    #[tokio::test]
    async fn test_two_line_file() {
        let (text, outcome) = render("file1.txt", b"hello\nworld\n").await;
        assert_eq!(text, "# file1.txt\n00001| hello\n00002| world\n\n");
        assert_eq!(outcome, BodyOutcome::Complete { lines: 2 });
    }

    #[tokio::test]
    async fn test_missing_final_newline_is_closed_by_separator() {
        let (text, _) = render("a.txt", b"one\ntwo").await;
        assert_eq!(text, "# a.txt\n00001| one\n00002| two\n");
    }

    #[tokio::test]
    async fn test_crlf_terminators_are_kept() {
        let (text, _) = render("win.txt", b"a\r\nb\r\n").await;
        assert_eq!(text, "# win.txt\n00001| a\r\n00002| b\r\n\n");
    }

    #[tokio::test]
    async fn test_empty_file_is_header_and_separator() {
        let (text, outcome) = render("empty.txt", b"").await;
        assert_eq!(text, "# empty.txt\n\n");
        assert_eq!(outcome, BodyOutcome::Complete { lines: 0 });
    }

    #[tokio::test]
    async fn test_invalid_utf8_interrupts_body() {
        let (text, outcome) = render("bin.dat", b"ok\n\xff\xfe\n").await;
        assert!(text.starts_with("# bin.dat\n00001| ok\nError reading bin.dat: "));
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
        assert!(matches!(outcome, BodyOutcome::Interrupted { lines: 1, .. }));
    }

    #[tokio::test]
    async fn test_diagnostic_lines() {
        let mut out = Vec::new();
        let mut writer = TranscriptWriter::new(&mut out);
        writer.metadata_failure("x.txt", "boom").await.unwrap();
        writer.read_failure("y.txt", "gone").await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Could not get info for x.txt: boom\nError reading y.txt: gone\n"
        );
    }
}
