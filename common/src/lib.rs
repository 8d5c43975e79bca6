//! Definitions shared by the browser form and the mail relay endpoint.
//!
//! Both sides validate independently; this crate only holds the rule
//! definitions and the wire types.

pub mod contact_method;
pub mod field;
pub mod outcome;
pub mod rules;

pub use contact_method::ContactMethod;
pub use field::{Field, FieldErrors, Violation, Violations};
pub use outcome::{DeliveryOutcome, OutcomeCode};
