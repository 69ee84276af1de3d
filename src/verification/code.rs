//! Fixed-length one-time-code entry buffer with focus tracking.

use crate::error::ValidationError;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// One-time-code entry buffer.
///
/// Each position holds either nothing or a single ASCII digit. `focus` is the
/// position that should receive the next keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    digits: [Option<char>; CODE_LENGTH],
    focus: usize,
}

impl Default for CodeEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeEntry {
    pub fn new() -> Self {
        Self {
            digits: [None; CODE_LENGTH],
            focus: 0,
        }
    }

    /// Store typed input at `index`.
    ///
    /// Input containing any non-digit is ignored. Otherwise only the last
    /// character is kept, so overtyping or pasting never overflows a box. An
    /// empty input clears the position. Returns whether the buffer changed.
    pub fn set_digit(&mut self, index: usize, raw: &str) -> bool {
        if index >= CODE_LENGTH || !raw.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        let digit = raw.chars().last();
        self.digits[index] = digit;
        if digit.is_some() && index < CODE_LENGTH - 1 {
            self.focus = index + 1;
        }
        true
    }

    /// Backspace on an empty box moves focus to the previous one.
    pub fn handle_backspace(&mut self, index: usize) {
        if index < CODE_LENGTH && index > 0 && self.digits[index].is_none() {
            self.focus = index - 1;
        }
    }

    /// Clear every position and refocus the first box.
    pub fn reset(&mut self) {
        self.digits = [None; CODE_LENGTH];
        self.focus = 0;
    }

    /// Entered digits in order. Shorter than [`CODE_LENGTH`] while any box is empty.
    pub fn joined(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    /// The joined code, or an error if any position is still empty.
    pub fn complete_code(&self) -> Result<String, ValidationError> {
        let code = self.joined();
        validate_code(&code)?;
        Ok(code)
    }

    /// Type a whole code at once, replacing the buffer.
    ///
    /// Input longer than [`CODE_LENGTH`] or containing a non-digit is refused
    /// and leaves the buffer as it was. Shorter input fills the leading boxes.
    pub fn fill(&mut self, code: &str) -> Result<(), ValidationError> {
        let actual = code.chars().count();
        if actual > CODE_LENGTH {
            return Err(ValidationError::CodeLength {
                expected: CODE_LENGTH,
                actual,
            });
        }
        if let Some(bad) = code.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ValidationError::NonDigitCode(bad));
        }
        self.reset();
        for (i, c) in code.chars().enumerate() {
            self.set_digit(i, c.encode_utf8(&mut [0; 4]));
        }
        Ok(())
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn digit(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }
}

/// A submitted code must be exactly [`CODE_LENGTH`] characters. It is never padded.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    let actual = code.chars().count();
    if actual != CODE_LENGTH {
        return Err(ValidationError::CodeLength {
            expected: CODE_LENGTH,
            actual,
        });
    }
    Ok(())
}
