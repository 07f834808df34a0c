//! Domain models with validation at construction
//!
//! Raw form input is validated when converted into a [`NewSchool`].
//! Invalid input returns ValidationError, not panic.

pub mod school;
pub mod validation;

pub use school::{NewSchool, School, SchoolForm, SchoolId};
pub use validation::ValidationError;
