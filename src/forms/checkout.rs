use crate::models::{BillingInterval, PricingTier};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CheckoutForm {
    pub tier: PricingTier,
    pub interval: BillingInterval,
}
