//! Form session module: values, validation, short-link uniqueness and the
//! submission handshake behind the category editor

mod controller;
mod uniqueness;
mod validate;
mod values;

pub use controller::{FormSession, SessionEffect};
pub use uniqueness::UniquenessState;
pub use values::FieldId;

#[cfg(test)]
pub use uniqueness::{MIN_CHECKING_DELAY, SETTLE_DELAY};
