use crate::models::PricingTier;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single feature limit.
///
/// Wire shape is preserved from the client API: a non-negative integer cap,
/// the string `"unlimited"`, or a boolean capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitValue {
    Capped(u32),
    Unlimited,
    Flag(bool),
}

impl LimitValue {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, LimitValue::Unlimited)
    }
}

impl Serialize for LimitValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LimitValue::Capped(cap) => serializer.serialize_u32(*cap),
            LimitValue::Unlimited => serializer.serialize_str("unlimited"),
            LimitValue::Flag(enabled) => serializer.serialize_bool(*enabled),
        }
    }
}

struct LimitValueVisitor;

impl<'de> Visitor<'de> for LimitValueVisitor {
    type Value = LimitValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer, the string \"unlimited\", or a boolean")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        u32::try_from(value)
            .map(LimitValue::Capped)
            .map_err(|_| E::custom(format!("cap out of range: {value}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u32::try_from(value)
            .map(LimitValue::Capped)
            .map_err(|_| E::custom(format!("cap out of range: {value}")))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(LimitValue::Flag(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        if value == "unlimited" {
            Ok(LimitValue::Unlimited)
        } else {
            Err(E::custom(format!("unrecognized limit sentinel: {value}")))
        }
    }
}

impl<'de> Deserialize<'de> for LimitValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LimitValueVisitor)
    }
}

/// Names a limit present in every tier's feature set.
///
/// The secondary batch-size cap is deliberately not addressable here; it is
/// only reachable through [`PlanLimits::batch_size`], which checks its
/// companion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    DocumentsPerDay,
    MaxPagesPerPdf,
    ChatQuestionsPerDoc,
    ApiCallsPerDay,
    BatchUpload,
    Seats,
    Sso,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown feature key: {0}")]
pub struct UnknownFeature(pub String);

impl FeatureKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::DocumentsPerDay => "documentsPerDay",
            FeatureKey::MaxPagesPerPdf => "maxPagesPerPdf",
            FeatureKey::ChatQuestionsPerDoc => "chatQuestionsPerDoc",
            FeatureKey::ApiCallsPerDay => "apiCallsPerDay",
            FeatureKey::BatchUpload => "batchUpload",
            FeatureKey::Seats => "seats",
            FeatureKey::Sso => "sso",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documentsPerDay" => Ok(FeatureKey::DocumentsPerDay),
            "maxPagesPerPdf" => Ok(FeatureKey::MaxPagesPerPdf),
            "chatQuestionsPerDoc" => Ok(FeatureKey::ChatQuestionsPerDoc),
            "apiCallsPerDay" => Ok(FeatureKey::ApiCallsPerDay),
            "batchUpload" => Ok(FeatureKey::BatchUpload),
            "seats" => Ok(FeatureKey::Seats),
            "sso" => Ok(FeatureKey::Sso),
            other => Err(UnknownFeature(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanPrice {
    pub monthly: u32,
    pub yearly: u32,
}

/// Limits of one tier. Every tier carries the same keys, only values vary,
/// so consumers can index any tier without a presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub documents_per_day: LimitValue,
    pub max_pages_per_pdf: LimitValue,
    pub chat_questions_per_doc: LimitValue,
    pub api_calls_per_day: LimitValue,
    pub batch_upload: LimitValue,
    /// Max files per batch. Only meaningful while `batch_upload` is on.
    pub batch_upload_size: Option<u32>,
    pub seats: LimitValue,
    pub sso: LimitValue,
}

impl PlanLimits {
    pub fn get(&self, key: FeatureKey) -> LimitValue {
        match key {
            FeatureKey::DocumentsPerDay => self.documents_per_day,
            FeatureKey::MaxPagesPerPdf => self.max_pages_per_pdf,
            FeatureKey::ChatQuestionsPerDoc => self.chat_questions_per_doc,
            FeatureKey::ApiCallsPerDay => self.api_calls_per_day,
            FeatureKey::BatchUpload => self.batch_upload,
            FeatureKey::Seats => self.seats,
            FeatureKey::Sso => self.sso,
        }
    }

    /// The batch-size cap, gated on its companion flag.
    pub fn batch_size(&self) -> Option<u32> {
        match self.batch_upload {
            LimitValue::Flag(true) => self.batch_upload_size,
            _ => None,
        }
    }
}

/// One catalog entry. Static, immutable, one instance per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanFeatures {
    pub name: &'static str,
    pub price: PlanPrice,
    pub limits: PlanLimits,
    pub cta: &'static str,
    pub popular: bool,
}

static FREE_PLAN: PlanFeatures = PlanFeatures {
    name: "Free",
    price: PlanPrice {
        monthly: 0,
        yearly: 0,
    },
    limits: PlanLimits {
        documents_per_day: LimitValue::Capped(5),
        max_pages_per_pdf: LimitValue::Capped(50),
        chat_questions_per_doc: LimitValue::Capped(3),
        api_calls_per_day: LimitValue::Capped(25),
        batch_upload: LimitValue::Flag(false),
        batch_upload_size: None,
        seats: LimitValue::Capped(1),
        sso: LimitValue::Flag(false),
    },
    cta: "Get started",
    popular: false,
};

static STARTER_PLAN: PlanFeatures = PlanFeatures {
    name: "Starter",
    price: PlanPrice {
        monthly: 9,
        yearly: 90,
    },
    limits: PlanLimits {
        documents_per_day: LimitValue::Capped(25),
        max_pages_per_pdf: LimitValue::Capped(200),
        chat_questions_per_doc: LimitValue::Capped(10),
        api_calls_per_day: LimitValue::Capped(250),
        batch_upload: LimitValue::Flag(false),
        batch_upload_size: None,
        seats: LimitValue::Capped(1),
        sso: LimitValue::Flag(false),
    },
    cta: "Start with Starter",
    popular: false,
};

static PRO_PLAN: PlanFeatures = PlanFeatures {
    name: "Pro",
    price: PlanPrice {
        monthly: 19,
        yearly: 190,
    },
    limits: PlanLimits {
        documents_per_day: LimitValue::Unlimited,
        max_pages_per_pdf: LimitValue::Capped(500),
        chat_questions_per_doc: LimitValue::Unlimited,
        api_calls_per_day: LimitValue::Capped(2500),
        batch_upload: LimitValue::Flag(true),
        batch_upload_size: Some(10),
        seats: LimitValue::Capped(3),
        sso: LimitValue::Flag(false),
    },
    cta: "Go Pro",
    popular: true,
};

static TEAM_PLAN: PlanFeatures = PlanFeatures {
    name: "Team",
    price: PlanPrice {
        monthly: 49,
        yearly: 490,
    },
    limits: PlanLimits {
        documents_per_day: LimitValue::Unlimited,
        max_pages_per_pdf: LimitValue::Capped(2000),
        chat_questions_per_doc: LimitValue::Unlimited,
        api_calls_per_day: LimitValue::Unlimited,
        batch_upload: LimitValue::Flag(true),
        batch_upload_size: Some(25),
        seats: LimitValue::Capped(10),
        sso: LimitValue::Flag(true),
    },
    cta: "Contact sales",
    popular: false,
};

impl PricingTier {
    /// The catalog entry for this tier. Total over all four tiers.
    pub fn plan(&self) -> &'static PlanFeatures {
        match self {
            PricingTier::Free => &FREE_PLAN,
            PricingTier::Starter => &STARTER_PLAN,
            PricingTier::Pro => &PRO_PLAN,
            PricingTier::Team => &TEAM_PLAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_a_plan() {
        for tier in PricingTier::ALL {
            let plan = tier.plan();
            assert!(!plan.name.is_empty());
            assert!(!plan.cta.is_empty());
        }
    }

    #[test]
    fn pro_page_cap_is_500() {
        assert_eq!(
            PricingTier::Pro.plan().limits.max_pages_per_pdf,
            LimitValue::Capped(500)
        );
    }

    #[test]
    fn only_pro_is_marked_popular() {
        let popular: Vec<_> = PricingTier::ALL
            .iter()
            .filter(|t| t.plan().popular)
            .collect();
        assert_eq!(popular, vec![&PricingTier::Pro]);
    }

    #[test]
    fn batch_size_requires_companion_flag() {
        assert_eq!(PricingTier::Free.plan().limits.batch_size(), None);
        assert_eq!(PricingTier::Starter.plan().limits.batch_size(), None);
        assert_eq!(PricingTier::Pro.plan().limits.batch_size(), Some(10));
        assert_eq!(PricingTier::Team.plan().limits.batch_size(), Some(25));
    }

    #[test]
    fn limit_value_wire_shapes() {
        assert_eq!(
            serde_json::to_value(LimitValue::Capped(5)).unwrap(),
            serde_json::json!(5)
        );
        assert_eq!(
            serde_json::to_value(LimitValue::Unlimited).unwrap(),
            serde_json::json!("unlimited")
        );
        assert_eq!(
            serde_json::to_value(LimitValue::Flag(true)).unwrap(),
            serde_json::json!(true)
        );
    }

    #[test]
    fn limit_value_round_trips() {
        for raw in ["5", "\"unlimited\"", "false"] {
            let value: LimitValue = serde_json::from_str(raw).unwrap();
            assert_eq!(serde_json::to_string(&value).unwrap(), raw);
        }
        assert!(serde_json::from_str::<LimitValue>("\"infinite\"").is_err());
        assert!(serde_json::from_str::<LimitValue>("-3").is_err());
    }

    #[test]
    fn feature_keys_parse_from_wire_names() {
        for key in [
            FeatureKey::DocumentsPerDay,
            FeatureKey::MaxPagesPerPdf,
            FeatureKey::ChatQuestionsPerDoc,
            FeatureKey::ApiCallsPerDay,
            FeatureKey::BatchUpload,
            FeatureKey::Seats,
            FeatureKey::Sso,
        ] {
            assert_eq!(key.as_str().parse::<FeatureKey>(), Ok(key));
        }
        assert!("maxPages".parse::<FeatureKey>().is_err());
    }
}
