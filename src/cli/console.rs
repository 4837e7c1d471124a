//! Line-oriented terminal I/O
//!
//! Every prompt and message goes through [`Console`], so the same flows run
//! against an interactive terminal, piped stdin, or scripted test input.

use anyhow::{anyhow, Result};
use crossterm::style::Stylize;
use inquire::{ui::RenderConfig, InquireError, Text};
use std::io::{BufRead, Write};

pub trait Console {
    /// Print one line of output
    fn say(&mut self, line: &str);

    /// Print a section title
    fn heading(&mut self, line: &str) {
        self.say(line);
    }

    /// Show `prompt` and read one line, without its line terminator.
    /// Fails when input is closed or interrupted.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Console for an interactive terminal, prompting with inquire
#[derive(Debug, Default)]
pub struct InquireConsole;

impl InquireConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for InquireConsole {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn heading(&mut self, line: &str) {
        // Keep leading blank lines outside the styled span
        let text = line.trim_start_matches('\n');
        let breaks = &line[..line.len() - text.len()];
        println!("{}{}", breaks, text.bold());
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        let result = Text::new(prompt)
            .with_render_config(minimal_render_config())
            .prompt();

        match result {
            Ok(input) => Ok(input),
            // Escape behaves like an empty answer
            Err(InquireError::OperationCanceled) => Ok(String::new()),
            Err(InquireError::OperationInterrupted) => Err(anyhow!("Interrupted")),
            Err(e) => Err(e.into()),
        }
    }
}

/// Console over any reader/writer pair: piped stdin, or a script in tests
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn say(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(anyhow!("End of input"));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}
