use common::contact_method::{self, ContactMethod};
use common::Field;

/// What the inputs hold right now, untrimmed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub agreement: bool,
    pub contact_methods: Vec<String>,
}

impl RawFormInput {
    pub fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Message => self.message = value,
            Field::ContactMethod | Field::Agreement => {
                log::warn!("{} is not a text field", field.as_str());
            }
        }
    }

    pub fn set_contact_method(&mut self, value: &str, checked: bool) {
        let present = self.contact_methods.iter().any(|v| v == value);
        if checked && !present {
            self.contact_methods.push(value.to_string());
        } else if !checked {
            self.contact_methods.retain(|v| v != value);
        }
    }

    pub fn has_contact_method(&self, value: &str) -> bool {
        self.contact_methods.iter().any(|v| v == value)
    }
}

/// Trimmed values pulled from [`RawFormInput`] for one validation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FormFieldSet {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub agreement: bool,
    pub contact_methods: Vec<ContactMethod>,
}

impl FormFieldSet {
    pub fn extract(raw: &RawFormInput) -> Self {
        Self {
            name: raw.name.trim().to_string(),
            email: raw.email.trim().to_string(),
            phone: raw.phone.trim().to_string(),
            message: raw.message.trim().to_string(),
            agreement: raw.agreement,
            contact_methods: raw
                .contact_methods
                .iter()
                .map(|v| ContactMethod::parse(v))
                .collect(),
        }
    }

    /// Empty when nothing was selected.
    pub fn contact_method_summary(&self) -> String {
        contact_method::summarize(&self.contact_methods)
    }
}
