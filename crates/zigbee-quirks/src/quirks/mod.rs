//! Built-in device quirks

pub mod gammatroniques;

use crate::quirk::QuirkDescriptor;

/// All built-in quirks, in registration order
#[must_use]
pub fn builtin() -> Vec<QuirkDescriptor> {
    vec![gammatroniques::smoke_detector()]
}
