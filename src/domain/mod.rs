//! Domain layer: strong types with validation and invariants (no I/O).

mod options;
mod validation;
mod value;

pub use options::{ConfigError, Options};
pub use validation::ValidationError;
pub use value::{ApiKey, PhoneNumber, TemplateId, TemplateValue};
