use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Form field names as they travel on the wire.
///
/// Declaration order is the order errors are reported and serialized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Message,
    ContactMethod,
    Agreement,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Message => "message",
            Field::ContactMethod => "contact_method",
            Field::Agreement => "agreement",
        }
    }
}

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    Empty,
    InvalidFormat,
    NotAccepted,
}

/// Every rule failure found in one validation pass, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(BTreeMap<Field, Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field: Field, violation: Violation) {
        self.0.insert(field, violation);
    }

    pub fn get(&self, field: Field) -> Option<Violation> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Violation)> + '_ {
        self.0.iter().map(|(field, violation)| (*field, *violation))
    }

    /// Turns violations into user-facing messages using the caller's wording.
    pub fn to_messages<F>(&self, message_for: F) -> FieldErrors
    where
        F: Fn(Field, Violation) -> &'static str,
    {
        let mut errors = FieldErrors::new();
        for (field, violation) in self.iter() {
            errors.set(field, message_for(field, violation));
        }
        errors
    }
}

/// Field → human readable error. A field that is absent is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty message clears whatever was shown for the field.
    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, message);
        }
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_serde() {
        let all = [
            Field::Name,
            Field::Email,
            Field::Phone,
            Field::Message,
            Field::ContactMethod,
            Field::Agreement,
        ];
        for field in all {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }

    #[test]
    fn empty_message_clears_error() {
        let mut errors = FieldErrors::new();
        errors.set(Field::Name, "required");
        errors.set(Field::Email, "bad");
        errors.set(Field::Name, "");

        assert!(!errors.contains(Field::Name));
        assert_eq!(errors.get(Field::Email), Some("bad"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn errors_serialize_in_field_order() {
        let mut errors = FieldErrors::new();
        errors.set(Field::Agreement, "a");
        errors.set(Field::Name, "n");
        errors.set(Field::Phone, "p");

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"name":"n","phone":"p","agreement":"a"}"#);
    }

    #[test]
    fn violations_map_to_messages() {
        let mut violations = Violations::new();
        violations.record(Field::Email, Violation::InvalidFormat);
        violations.record(Field::Agreement, Violation::NotAccepted);

        let errors = violations.to_messages(|_, violation| match violation {
            Violation::Empty => "empty",
            Violation::InvalidFormat => "invalid",
            Violation::NotAccepted => "not accepted",
        });
        assert_eq!(errors.get(Field::Email), Some("invalid"));
        assert_eq!(errors.get(Field::Agreement), Some("not accepted"));
        assert!(errors.get(Field::Name).is_none());
    }
}
