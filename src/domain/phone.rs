use crate::domain::Field;

/// The longest phone number accepted on write, in characters.
pub const MAX_PHONE_LEN: usize = 100;

/// Checks a candidate phone number.
///
/// A phone number is valid when it is non-empty, consists only of ASCII
/// decimal digits and is at most [`MAX_PHONE_LEN`] characters long.
///
/// # Errors
///
/// Returns the first rule the value breaks.
pub fn validate(value: &str) -> Result<(), PhoneRule> {
    if value.is_empty() {
        return Err(PhoneRule::Empty);
    }

    if let Some(character) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(PhoneRule::NotDigit(character));
    }

    let len = value.chars().count();
    if len > MAX_PHONE_LEN {
        return Err(PhoneRule::TooLong(len));
    }

    Ok(())
}

/// The reason a phone number was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhoneRule {
    /// The number is empty.
    #[error("must not be empty")]
    Empty,
    /// The number contains something other than a decimal digit.
    #[error("must contain only digits (found '{0}')")]
    NotDigit(char),
    /// The number is longer than [`MAX_PHONE_LEN`].
    #[error("must be at most 100 digits long (got {0})")]
    TooLong(usize),
}

/// A phone field that failed validation on add or edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {}: {rule}", .field.label().to_lowercase())]
pub struct PhoneError {
    /// Which of the two phone fields was rejected.
    pub field: Field,
    /// Why it was rejected.
    pub rule: PhoneRule,
}
