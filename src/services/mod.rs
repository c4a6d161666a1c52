pub mod billing;
pub mod entitlement;
pub mod summarizer;

pub use billing::{BillingError, StripeClient};
pub use summarizer::{SummarizerClient, SummarizerError, SummaryEngine};
