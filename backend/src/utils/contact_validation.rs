//! Server side validation of contact posts.
//!
//! Runs regardless of what the browser already checked.

use common::rules;
use common::{Field, FieldErrors, Violation, Violations};
use lettre::Address;

use crate::handlers::contact_dtos::ContactSubmission;

pub fn validate_submission(submission: &ContactSubmission) -> Violations {
    let mut violations = Violations::new();

    if submission.name.is_empty() {
        violations.record(Field::Name, Violation::Empty);
    }

    if submission.email.is_empty() {
        violations.record(Field::Email, Violation::Empty);
    } else if !is_valid_address(&submission.email) {
        violations.record(Field::Email, Violation::InvalidFormat);
    }

    if !submission.phone.is_empty() && !rules::is_valid_phone(&submission.phone) {
        violations.record(Field::Phone, Violation::InvalidFormat);
    }

    if submission.message.is_empty() {
        violations.record(Field::Message, Violation::Empty);
    }

    if !submission.agreement {
        violations.record(Field::Agreement, Violation::NotAccepted);
    }

    violations
}

/// RFC address syntax, and the domain must be dotted.
pub fn is_valid_address(email: &str) -> bool {
    match email.parse::<Address>() {
        Ok(address) => {
            let domain = address.domain();
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        Err(_) => false,
    }
}

pub fn server_message(field: Field, violation: Violation) -> &'static str {
    match (field, violation) {
        (Field::Name, _) => "お名前を入力してください。",
        (Field::Email, Violation::Empty) => "メールアドレスを入力してください。",
        (Field::Email, _) => "正しい形式のメールアドレスを入力してください。",
        (Field::Phone, _) => "電話番号は数字とハイフンで入力してください。",
        (Field::Message, _) => "お問い合わせ内容を入力してください。",
        (Field::Agreement, _) => "個人情報取り扱いへの同意が必要です。",
        (Field::ContactMethod, _) => "ご希望の連絡方法を確認してください。",
    }
}

pub fn validation_errors(submission: &ContactSubmission) -> FieldErrors {
    validate_submission(submission).to_messages(server_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::rules::NO_PREFERENCE;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "田中太郎".into(),
            email: "t@example.com".into(),
            phone: String::new(),
            message: "相談したいです".into(),
            contact_method_summary: NO_PREFERENCE.into(),
            agreement: true,
        }
    }

    #[test]
    fn complete_submission_passes() {
        assert!(validate_submission(&submission()).is_empty());
    }

    #[test]
    fn collects_every_failure() {
        let empty = ContactSubmission {
            name: String::new(),
            email: String::new(),
            phone: "abc".into(),
            message: String::new(),
            contact_method_summary: NO_PREFERENCE.into(),
            agreement: false,
        };
        let violations = validate_submission(&empty);

        assert_eq!(violations.len(), 5);
        assert_eq!(violations.get(Field::Name), Some(Violation::Empty));
        assert_eq!(violations.get(Field::Email), Some(Violation::Empty));
        assert_eq!(violations.get(Field::Phone), Some(Violation::InvalidFormat));
        assert_eq!(violations.get(Field::Message), Some(Violation::Empty));
        assert_eq!(violations.get(Field::Agreement), Some(Violation::NotAccepted));
    }

    #[test]
    fn email_needs_real_address_syntax() {
        assert!(is_valid_address("a@b.co"));
        assert!(is_valid_address("first.last+tag@example.co.jp"));
        assert!(!is_valid_address("foo"));
        assert!(!is_valid_address("foo@bar"));
        assert!(!is_valid_address("foo@@bar.com"));
        assert!(!is_valid_address("foo bar@example.com"));

        let mut bad = submission();
        bad.email = "foo@bar".into();
        let errors = validation_errors(&bad);
        assert_eq!(
            errors.get(Field::Email),
            Some("正しい形式のメールアドレスを入力してください。")
        );
    }

    #[test]
    fn phone_is_optional_but_checked() {
        let mut with_phone = submission();
        with_phone.phone = "03-1234-5678".into();
        assert!(validate_submission(&with_phone).is_empty());

        with_phone.phone = "0312".into();
        assert_eq!(
            validate_submission(&with_phone).get(Field::Phone),
            Some(Violation::InvalidFormat)
        );
    }

    #[test]
    fn missing_agreement_has_its_own_message() {
        let mut no_agreement = submission();
        no_agreement.agreement = false;
        let errors = validation_errors(&no_agreement);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Agreement),
            Some("個人情報取り扱いへの同意が必要です。")
        );
    }
}
