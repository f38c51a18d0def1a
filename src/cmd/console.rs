use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crate::error::AppResult;
use crate::render::markdown_for_terminal;
use crate::workflow::changelog::{Progress, ProgressSink};

/// Line-oriented prompt/print surface for the interactive commands.
pub struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let output = io::stdout();
        let color = output.is_terminal();
        Self::new(io::stdin().lock(), output, color)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    pub fn say(&mut self, line: &str) -> AppResult<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one trimmed line. `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> AppResult<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn show_markdown(&mut self, markdown: &str) -> AppResult<()> {
        let rendered = markdown_for_terminal(markdown, self.color);
        write!(self.output, "{rendered}")?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> ProgressSink for Console<R, W> {
    fn report(&mut self, progress: Progress) -> AppResult<()> {
        self.say(&progress.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asks_and_trims() {
        let mut console = Console::new("  owner/repo \n".as_bytes(), Vec::new(), false);
        assert_eq!(
            console.ask("Repository: ").unwrap().as_deref(),
            Some("owner/repo")
        );
        assert_eq!(console.ask("Again: ").unwrap(), None);
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "Repository: Again: ");
    }

    #[test]
    fn reports_progress_as_lines() {
        let mut console = Console::new("".as_bytes(), Vec::new(), false);
        console.report(Progress::Analyzing { total: 2 }).unwrap();
        console.report(Progress::Commit { index: 1, total: 2 }).unwrap();
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output, "\nAnalyzing 2 commits...\nProcessing commit 1/2\n");
    }
}
