//! Line-based interactive prompts.
//!
//! End of input is cancellation and comes back as `Ok(None)`. Reading from any
//! `BufRead` lets tests script a whole session.

use console::style;
use std::io::{self, BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line without its line ending.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Yes/no question; an empty answer takes `default`.
    pub fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<Option<bool>> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let Some(answer) = self.read_line(&format!("{} {}", prompt, hint))? else {
                return Ok(None);
            };
            match answer.trim().to_lowercase().as_str() {
                "" => return Ok(Some(default)),
                "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "{}", style("Error: invalid input").red())?,
            }
        }
    }

    /// Ask for an index in `[0, count)`. Anything else is rejected and asked again.
    pub fn choose_index(
        &mut self,
        prompt: &str,
        count: usize,
        default: usize,
    ) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.read_line(prompt)? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() && default < count {
                return Ok(Some(default));
            }
            match parse_index(answer, count) {
                Some(idx) => return Ok(Some(idx)),
                None => writeln!(self.output, "{}", style("Error: invalid value.").red())?,
            }
        }
    }
}

pub fn parse_index(input: &str, count: usize) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&idx| idx < count)
}
