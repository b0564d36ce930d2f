use std::io::{self, BufRead, Write};

use crate::error::{ErrorContext, Result};

/// One line of interactive input.
pub trait Prompt {
    /// Show `question` and return the raw answer, line terminator included.
    /// End of input yields an empty string.
    fn ask(&self, question: &str) -> Result<String>;
}

/// [`Prompt`] on the process terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        print!("{}", question);
        io::stdout()
            .flush()
            .with_io_context(|| "flushing prompt".to_string())?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .with_io_context(|| "reading answer from stdin".to_string())?;
        Ok(answer)
    }
}

/// Drop exactly one trailing `\n` or `\r\n`. `None` when the answer was not
/// newline-terminated (end of input).
pub fn answer_line(raw: &str) -> Option<&str> {
    raw.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// `n` / `N` declines; anything else, including end of input, accepts.
pub fn declines(raw: &str) -> bool {
    matches!(answer_line(raw), Some("n") | Some("N"))
}

/// Only `yes` / `YES` confirms a destructive operation.
pub fn confirms_destruction(raw: &str) -> bool {
    matches!(answer_line(raw), Some("yes") | Some("YES"))
}
