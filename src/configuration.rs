use crate::models::{BillingInterval, PricingTier};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub app_port: u16,
    pub app_host: String,
    pub auth_url: String,
    pub billing: BillingSettings,
    pub summarizer: SummarizerSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct BillingSettings {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub webhook_secret: String,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub portal_return_url: String,
    pub prices: PriceTable,
}

/// Stripe price ids for each paid tier and interval.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PriceTable {
    pub starter_monthly: String,
    pub starter_yearly: String,
    pub pro_monthly: String,
    pub pro_yearly: String,
    pub team_monthly: String,
    pub team_yearly: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SummarizerSettings {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
}

impl BillingSettings {
    pub fn load_secrets_from_env(&mut self) -> Result<(), config::ConfigError> {
        self.secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| config::ConfigError::NotFound("STRIPE_SECRET_KEY".to_string()))?;
        self.webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| config::ConfigError::NotFound("STRIPE_WEBHOOK_SECRET".to_string()))?;
        Ok(())
    }

    /// Price id for a paid tier. The free tier has nothing to check out.
    pub fn price_id(&self, tier: PricingTier, interval: BillingInterval) -> Option<&str> {
        let id = match (tier, interval) {
            (PricingTier::Free, _) => return None,
            (PricingTier::Starter, BillingInterval::Monthly) => &self.prices.starter_monthly,
            (PricingTier::Starter, BillingInterval::Yearly) => &self.prices.starter_yearly,
            (PricingTier::Pro, BillingInterval::Monthly) => &self.prices.pro_monthly,
            (PricingTier::Pro, BillingInterval::Yearly) => &self.prices.pro_yearly,
            (PricingTier::Team, BillingInterval::Monthly) => &self.prices.team_monthly,
            (PricingTier::Team, BillingInterval::Yearly) => &self.prices.team_yearly,
        };
        Some(id.as_str())
    }

    /// Reverse mapping used by the webhook handler.
    pub fn tier_for_price(&self, price_id: &str) -> Option<PricingTier> {
        let p = &self.prices;
        if price_id == p.starter_monthly || price_id == p.starter_yearly {
            Some(PricingTier::Starter)
        } else if price_id == p.pro_monthly || price_id == p.pro_yearly {
            Some(PricingTier::Pro)
        } else if price_id == p.team_monthly || price_id == p.team_yearly {
            Some(PricingTier::Team)
        } else {
            None
        }
    }
}

impl DatabaseSettings {
    // Connection string: postgresql://<username>:<password>@<host>:<port>/<database_name>
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name,
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = config::Config::default();

    // Configuration file named `configuration` (.yaml, .toml, ...)
    settings.merge(config::File::with_name("configuration"))?;

    let mut config: Settings = settings.try_deserialize()?;

    // Secrets never live in the configuration file
    config.billing.load_secrets_from_env()?;
    if let Ok(key) = std::env::var("SUMMARIZER_API_KEY") {
        config.summarizer.api_key = key;
    }

    Ok(config)
}
