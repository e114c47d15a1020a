//! Human confirmation gate for destructive runs.
//!
//! Modeled as a capability so the pipeline can be tested without a real
//! input stream. Dry runs never reach the gate.

use std::io::{self, BufRead, Write};

/// Token an operator must type to authorize deletion.
const AFFIRMATIVE: &str = "yes";

/// Capability for asking the operator to authorize a destructive step.
pub trait Confirmer {
    /// Present `prompt` and return whether the operator approved.
    fn confirm(&self, prompt: &str) -> io::Result<bool>;
}

/// Interactive implementation: blocks on standard input and accepts only
/// a trimmed, case-insensitive `yes`. Anything else declines.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt} ")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(is_affirmative(&line))
    }
}

/// Non-interactive double returning a programmed answer.
pub struct StaticConfirmer(pub bool);

impl Confirmer for StaticConfirmer {
    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

fn is_affirmative(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(AFFIRMATIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_token_variants() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("  Yes \n"));
    }

    #[test]
    fn test_everything_else_declines() {
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("y"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yes please"));
    }

    #[test]
    fn test_static_confirmer_returns_programmed_answer() {
        assert!(StaticConfirmer(true).confirm("?").unwrap());
        assert!(!StaticConfirmer(false).confirm("?").unwrap());
    }
}
