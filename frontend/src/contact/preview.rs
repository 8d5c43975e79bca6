use common::contact_method;
use common::rules;
use common::Field;

use crate::contact::fields::FormFieldSet;

/// Read-only snapshot shown on the confirmation step.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub contact_method: String,
}

impl ConfirmationView {
    pub fn render(fields: &FormFieldSet) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: rules::or_not_entered(&fields.phone).to_string(),
            message: fields.message.clone(),
            contact_method: contact_method::summary_or_default(&fields.contact_methods),
        }
    }

    /// Text for the display slot keyed by `field`. The agreement has no slot.
    pub fn slot(&self, field: Field) -> &str {
        let value = match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
            Field::ContactMethod => &self.contact_method,
            Field::Agreement => return "",
        };
        rules::or_not_entered(value)
    }
}
