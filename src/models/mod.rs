// Data models and payload validation

pub mod date;
pub mod health_metric;
pub mod nutrition;
pub mod user;
pub mod validation;
pub mod workout;

pub use health_metric::*;
pub use nutrition::*;
pub use user::*;
pub use validation::{Validate, ValidationError};
pub use workout::*;
