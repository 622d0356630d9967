//! User-interaction capabilities: confirmation prompts and the clipboard.
//!
//! Both are traits so that operations can be driven by a terminal, by a
//! `--yes` flag, or by scripted test doubles.

use crate::errors::ClipboardError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// Asks the user to approve a destructive action.
///
/// # Examples
///
/// ```
/// use daybook::interaction::Confirm;
///
/// struct AlwaysNo;
///
/// impl Confirm for AlwaysNo {
///     fn confirm(&mut self, _prompt: &str) -> bool {
///         false
///     }
/// }
///
/// assert!(!AlwaysNo.confirm("Delete everything?"));
/// ```
pub trait Confirm {
    /// Shows `prompt` and returns whether the user agreed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Consent given up front, e.g. with `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!(prompt, "Confirmation assumed");
        true
    }
}

/// Line-oriented prompt over any reader/writer pair (usually stdin/stdout).
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Prompt reading answers from `input` and writing questions to `output`.
    pub fn new(input: R, output: W) -> Self {
        LinePrompt { input, output }
    }

    /// Reads one line without its line ending. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Where prompts and messages are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consumes the prompt, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    /// Asks `prompt [y/N]` until the answer is yes, no or empty.
    ///
    /// An empty answer, end of input or an I/O error count as "no".
    fn confirm(&mut self, prompt: &str) -> bool {
        loop {
            if write!(self.output, "{} [y/N] ", prompt)
                .and_then(|_| self.output.flush())
                .is_err()
            {
                return false;
            }

            let answer = match self.read_line() {
                Ok(Some(answer)) => answer,
                Ok(None) | Err(_) => return false,
            };

            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "" | "n" | "no" => return false,
                _ => {
                    if writeln!(self.output, "Please answer yes or no.").is_err() {
                        return false;
                    }
                }
            }
        }
    }
}

/// Puts text on the system clipboard.
pub trait Clipboard {
    /// Copies `text`. Failure never affects diary data.
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard via the OSC 52 terminal escape sequence.
///
/// Works over SSH and inside multiplexers that forward OSC 52; requires the
/// output to be a terminal.
#[derive(Debug)]
pub struct Osc52Clipboard<W> {
    out: W,
    attached: bool,
}

impl Osc52Clipboard<io::Stdout> {
    /// Clipboard writing to standard output, available only when it is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let attached = out.is_terminal();
        Osc52Clipboard { out, attached }
    }
}

impl<W: Write> Osc52Clipboard<W> {
    /// Clipboard writing escape sequences to `out` unconditionally.
    pub fn new(out: W) -> Self {
        Osc52Clipboard {
            out,
            attached: true,
        }
    }

    /// Consumes the clipboard, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.attached {
            return Err(ClipboardError::Unavailable(io::Error::new(
                io::ErrorKind::Unsupported,
                "standard output is not a terminal",
            )));
        }

        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(ClipboardError::Unavailable)?;
        debug!(bytes = text.len(), "Copied to clipboard via OSC 52");
        Ok(())
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn prompt(input: &str) -> LinePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_confirm_yes() {
        let mut p = prompt("y\n");
        assert!(p.confirm("Delete?"));
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "Delete? [y/N] ");
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert!(!prompt("\n").confirm("Delete?"));
        assert!(!prompt("no\n").confirm("Delete?"));
        assert!(!prompt("").confirm("Delete?"));
    }

    #[test]
    fn test_confirm_reprompts_on_unclear_answer() {
        let mut p = prompt("maybe\nYES\n");
        assert!(p.confirm("Clear?"));
        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(output.matches("Clear? [y/N]").count(), 2);
        assert!(output.contains("Please answer yes or no."));
    }

    #[test]
    fn test_read_line_strips_line_endings() {
        let mut p = prompt("first\r\nsecond\nlast");
        assert_eq!(p.read_line().unwrap().as_deref(), Some("first"));
        assert_eq!(p.read_line().unwrap().as_deref(), Some("second"));
        assert_eq!(p.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(p.read_line().unwrap(), None);
    }

    #[test]
    fn test_assume_yes() {
        assert!(AssumeYes.confirm("anything"));
    }

    #[test]
    fn test_osc52_sequence() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("hi\n").unwrap();
        assert_eq!(
            String::from_utf8(clipboard.into_inner()).unwrap(),
            "\x1b]52;c;aGkK\x1b\\"
        );
    }

    #[test]
    fn test_osc52_reports_write_failure() {
        let mut clipboard = Osc52Clipboard::new(BrokenWriter);
        match clipboard.copy("data") {
            Err(ClipboardError::Unavailable(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            Ok(()) => panic!("Expected clipboard failure"),
        }
    }
}
