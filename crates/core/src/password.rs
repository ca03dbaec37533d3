//! Password confirmation and strength checks for the user forms.
//!
//! Strength is an entropy estimate normalised to `0.0..=1.0`: the size of the character pool the
//! password draws from, raised to its length, measured in bits against [`STRONG_PASSWORD_BITS`].
//! Immediate repeats of the previous character only count half.

use crate::error::{ErrorKind, FieldError};
use crate::fields::{Field, FormField};

/// Entropy at which a password scores 1.0.
pub const STRONG_PASSWORD_BITS: f64 = 128.0;

fn pool_size(password: &str) -> u32 {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;
    let mut other = false;

    for c in password.chars() {
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            c if c.is_ascii() => symbol = true,
            _ => other = true,
        }
    }

    [(lower, 26), (upper, 26), (digit, 10), (symbol, 33), (other, 100)]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum()
}

/// Estimated strength of `password` between 0.0 (empty) and 1.0.
pub fn password_strength(password: &str) -> f64 {
    let pool = pool_size(password);
    if pool == 0 {
        return 0.0;
    }

    let mut length = 0.0;
    let mut previous = None;
    for c in password.chars() {
        length += if previous == Some(c) { 0.5 } else { 1.0 };
        previous = Some(c);
    }

    let bits = length * f64::from(pool).log2();
    (bits / STRONG_PASSWORD_BITS).min(1.0)
}

/// `verify` must repeat `new` exactly.
pub fn validate_passwords_match(new: &Field<String>, verify: &Field<String>) -> Option<FieldError> {
    if new.text() != verify.text() {
        return Some(FieldError::new(
            verify.name(),
            ErrorKind::Mismatch,
            "Passwords do not match",
        ));
    }
    None
}

/// A non-empty `new` password must reach `minimum` strength.
pub fn validate_password_strength(new: &Field<String>, minimum: f64) -> Option<FieldError> {
    if new.text().is_empty() {
        return None;
    }

    if password_strength(new.text()) < minimum {
        return Some(FieldError::new(
            new.name(),
            ErrorKind::WeakPassword,
            "Password is not strong enough",
        ));
    }
    None
}
