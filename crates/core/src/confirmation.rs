//! Confirmation codes for the signup/token exchange.
//!
//! A code is eight distinct decimal digits drawn uniformly without
//! repetition. It is emailed on every signup and compared verbatim on
//! token exchange.

use rand::seq::SliceRandom;

pub const CONFIRMATION_CODE_LENGTH: usize = 8;

pub const CONFIRMATION_EMAIL_SUBJECT: &str = "Код подтверждения YaMDb";

const DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Generate a fresh confirmation code.
pub fn generate_confirmation_code() -> String {
    let mut digits = DIGITS;
    digits.shuffle(&mut rand::rng());
    digits[..CONFIRMATION_CODE_LENGTH].iter().collect()
}

/// Body of the confirmation email.
pub fn confirmation_email_body(code: &str) -> String {
    format!("Ваш код подтверждения: {code}")
}

/// Compare a submitted code with the stored one.
///
/// An empty stored code never matches: the user has not requested one.
pub fn code_matches(stored: &str, submitted: &str) -> bool {
    !stored.is_empty() && stored == submitted
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn code_is_eight_distinct_digits() {
        for _ in 0..100 {
            let code = generate_confirmation_code();
            assert_eq!(code.len(), CONFIRMATION_CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let unique: HashSet<char> = code.chars().collect();
            assert_eq!(unique.len(), CONFIRMATION_CODE_LENGTH, "digits repeat in {code}");
        }
    }

    #[test]
    fn codes_vary_between_calls() {
        let codes: HashSet<String> = (0..20).map(|_| generate_confirmation_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn email_body_contains_code() {
        assert_eq!(
            confirmation_email_body("12345678"),
            "Ваш код подтверждения: 12345678"
        );
    }

    #[test]
    fn empty_stored_code_never_matches() {
        assert!(!code_matches("", ""));
        assert!(!code_matches("", "12345678"));
    }

    #[test]
    fn exact_code_matches() {
        assert!(code_matches("01234567", "01234567"));
        assert!(!code_matches("01234567", "01234568"));
    }
}
