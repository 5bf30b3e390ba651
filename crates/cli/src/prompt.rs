//! Terminal confirmation prompts.

use std::io::{BufRead, Write};

use gadget_cart_client::cart::{Confirm, ConfirmPrompt};

/// Asks on stdin unless `--yes` was given.
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut out = std::io::stderr().lock();
        if write!(out, "{} [y/N] ", prompt.message())
            .and_then(|()| out.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "c" | "có" | "co"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(is_yes("có"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("không"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let confirm = StdinConfirm::new(true);
        assert!(confirm.confirm(&ConfirmPrompt::RemoveItem {
            label: "Tai nghe".to_string()
        }));
    }
}
