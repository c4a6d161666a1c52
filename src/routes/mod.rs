pub mod billing;
pub mod document;
mod health_checks;
pub mod plan;
pub mod usage;

pub use health_checks::*;
