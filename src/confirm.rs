//! Asking the user before destructive operations

use std::io::{stdin, stdout, BufRead, Write};


/// Something that can answer yes or no to a question
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Always says yes
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

/// Always says no
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        false
    }
}

/// Asks on the terminal, and waits for a `y` or `n` answer
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        let mut stdout = stdout();
        if stdout.write_all(format!("{} [y/N] ", question).as_bytes()).is_err() || stdout.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match stdin().lock().read_line(&mut answer) {
            Err(err) => {
                log::warn!("Unable to read the answer: {}", err);
                false
            },
            Ok(_) => is_yes(&answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
