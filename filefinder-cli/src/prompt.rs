use filefinder::{delete::Confirm, FinderResult};
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};

use crate::render::start_deletion_spinner;

/// Asks on the terminal before anything is deleted.
/// Only an explicit `y`/`yes` counts as consent; end of input is a no.
pub struct InteractiveConfirm<'a> {
    progress: &'a ProgressBar,
    prompt_on_stderr: bool,
}

impl<'a> InteractiveConfirm<'a> {
    pub fn new(progress: &'a ProgressBar) -> Self {
        Self {
            progress,
            prompt_on_stderr: false,
        }
    }

    /// Writes the question to stderr, keeping stdout for machine-readable output
    pub fn prompt_on_stderr(mut self, enabled: bool) -> Self {
        self.prompt_on_stderr = enabled;
        self
    }
}

impl Confirm for InteractiveConfirm<'_> {
    fn confirm(&mut self, prompt: &str) -> FinderResult<bool> {
        let mut input = io::stdin().lock();
        let answer = if self.prompt_on_stderr {
            ask(prompt, &mut input, &mut io::stderr())?
        } else {
            ask(prompt, &mut input, &mut io::stdout())?
        };
        if answer {
            start_deletion_spinner(self.progress);
        }
        Ok(answer)
    }
}

fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} [y/N]: ", prompt)?;
    output.flush()?;

    let mut response = String::new();
    if input.read_line(&mut response)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(
        response.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
