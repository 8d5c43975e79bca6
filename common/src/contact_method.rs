use crate::rules::NO_PREFERENCE;

/// A preferred way of being contacted back.
///
/// Values other than the two known ones pass through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContactMethod {
    Phone,
    Email,
    Other(String),
}

impl ContactMethod {
    pub fn parse(value: &str) -> Self {
        match value {
            "phone" => ContactMethod::Phone,
            "email" => ContactMethod::Email,
            other => ContactMethod::Other(other.to_string()),
        }
    }

    /// The checkbox value.
    pub fn value(&self) -> &str {
        match self {
            ContactMethod::Phone => "phone",
            ContactMethod::Email => "email",
            ContactMethod::Other(value) => value,
        }
    }

    pub fn display_phrase(&self) -> &str {
        match self {
            ContactMethod::Phone => "電話での連絡を希望",
            ContactMethod::Email => "メールでの連絡を希望",
            ContactMethod::Other(value) => value,
        }
    }
}

/// Human readable join of the selected methods; empty when none are selected.
pub fn summarize(methods: &[ContactMethod]) -> String {
    methods
        .iter()
        .map(ContactMethod::display_phrase)
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Like [`summarize`] but never blank.
pub fn summary_or_default(methods: &[ContactMethod]) -> String {
    let summary = summarize(methods);
    if summary.is_empty() {
        NO_PREFERENCE.to_string()
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_get_phrases() {
        let methods = vec![
            ContactMethod::parse("phone"),
            ContactMethod::parse("email"),
            ContactMethod::parse("line"),
        ];
        assert_eq!(
            summarize(&methods),
            "電話での連絡を希望 / メールでの連絡を希望 / line"
        );
    }

    #[test]
    fn nothing_selected() {
        assert_eq!(summarize(&[]), "");
        assert_eq!(summary_or_default(&[]), NO_PREFERENCE);
    }

    #[test]
    fn value_round_trips() {
        assert_eq!(ContactMethod::parse("fax").value(), "fax");
        assert_eq!(ContactMethod::Email.value(), "email");
    }
}
