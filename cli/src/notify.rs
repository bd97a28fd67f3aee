//! Terminal notifier: messages go to stderr, confirmations read stdin.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::io::{self, BufRead, Write};

use portal::Notifier;

#[derive(Debug, Default)]
pub struct StderrNotifier {
    /// Answer every confirmation with yes (`--yes`).
    pub assume_yes: bool,
}

impl StderrNotifier {
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// `y`/`yes` in any case accepts; anything else declines.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Notifier for StderrNotifier {
    fn success(&self, message: &str) {
        eprintln!("ok: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            eprintln!("{message} [y/N] y");
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}
