//! Browser side validation. A convenience for the visitor; the mail relay
//! validates again on its own.

use common::rules;
use common::{Field, FieldErrors, Violation, Violations};

use crate::contact::fields::FormFieldSet;

pub fn validate(fields: &FormFieldSet) -> Violations {
    let mut violations = Violations::new();

    if fields.name.is_empty() {
        violations.record(Field::Name, Violation::Empty);
    }

    if fields.email.is_empty() {
        violations.record(Field::Email, Violation::Empty);
    } else if !rules::matches_email_shape(&fields.email) {
        violations.record(Field::Email, Violation::InvalidFormat);
    }

    if !fields.phone.is_empty() && !rules::is_valid_phone(&fields.phone) {
        violations.record(Field::Phone, Violation::InvalidFormat);
    }

    if fields.message.is_empty() {
        violations.record(Field::Message, Violation::Empty);
    }

    if !fields.agreement {
        violations.record(Field::Agreement, Violation::NotAccepted);
    }

    violations
}

pub fn client_message(field: Field, violation: Violation) -> &'static str {
    match (field, violation) {
        (Field::Name, _) => "お名前を入力してください。",
        (Field::Email, Violation::Empty) => "メールアドレスを入力してください。",
        (Field::Email, _) => "正しい形式のメールアドレスを入力してください。",
        (Field::Phone, _) => "電話番号は数字とハイフンで入力してください。",
        (Field::Message, _) => "ご相談内容を入力してください。",
        (Field::Agreement, _) => "同意が必要です。",
        (Field::ContactMethod, _) => "ご希望の連絡方法を選択してください。",
    }
}

pub fn validation_errors(fields: &FormFieldSet) -> FieldErrors {
    validate(fields).to_messages(client_message)
}
