//! Rule definitions for the contact form fields.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimal shape check used by the browser: `local@domain.tld`, no spaces.
pub const EMAIL_SHAPE_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Ten or more digits, `+`, `-`, whitespace or parentheses.
pub const PHONE_PATTERN: &str = r"^[0-9+\-\s()]{10,}$";

/// Shown for a blank optional field.
pub const NOT_ENTERED: &str = "未入力";

/// Shown when no contact method was picked.
pub const NO_PREFERENCE: &str = "指定なし";

/// Stand-in for request metadata the client did not send.
pub const UNKNOWN: &str = "不明";

/// Value a checked checkbox carries in a browser form submission.
pub const AGREEMENT_CHECKED: &str = "on";

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_SHAPE_PATTERN).expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"));

pub fn matches_email_shape(value: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// `"on"` is what a checkbox sends, `"1"` what hand-built clients tend to send.
pub fn is_agreement_token(value: &str) -> bool {
    value == AGREEMENT_CHECKED || value == "1"
}

/// Falls back to [`NOT_ENTERED`] for blank values.
pub fn or_not_entered(value: &str) -> &str {
    if value.is_empty() {
        NOT_ENTERED
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(matches_email_shape("a@b.co"));
        assert!(matches_email_shape("t@example.com"));
        assert!(!matches_email_shape("foo"));
        assert!(!matches_email_shape("foo@bar"));
        assert!(!matches_email_shape("foo bar@baz.com"));
        assert!(!matches_email_shape("a@b@c.com"));
    }

    #[test]
    fn phone_pattern() {
        assert!(is_valid_phone("03-1234-5678"));
        assert!(is_valid_phone("+81 (3) 1234 5678"));
        assert!(!is_valid_phone("abc"));
        assert!(!is_valid_phone("123-4567"));
        assert!(!is_valid_phone("03-1234-567x"));
    }

    #[test]
    fn agreement_tokens() {
        assert!(is_agreement_token("on"));
        assert!(is_agreement_token("1"));
        assert!(!is_agreement_token("true"));
        assert!(!is_agreement_token(""));
    }

    #[test]
    fn blank_values_fall_back() {
        assert_eq!(or_not_entered(""), NOT_ENTERED);
        assert_eq!(or_not_entered("090"), "090");
    }
}
