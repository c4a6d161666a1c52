use pdfbrief::models::{FeatureKey, LimitValue, PricingTier};

#[test]
fn catalog_has_one_entry_per_tier() {
    let names: Vec<&str> = PricingTier::ALL.iter().map(|t| t.plan().name).collect();
    assert_eq!(names, vec!["Free", "Starter", "Pro", "Team"]);
}

#[test]
fn prices_are_consistent() {
    let free = PricingTier::Free.plan();
    assert_eq!(free.price.monthly, 0);
    assert_eq!(free.price.yearly, 0);

    for tier in [PricingTier::Starter, PricingTier::Pro, PricingTier::Team] {
        let plan = tier.plan();
        assert!(plan.price.monthly > 0, "{tier} must be a paid plan");
        // a yearly subscription costs less than twelve monthly ones
        assert!(plan.price.yearly < plan.price.monthly * 12);
    }
}

#[test]
fn plan_serializes_with_wire_field_names() {
    let value = serde_json::to_value(PricingTier::Pro.plan()).unwrap();
    assert_eq!(value["name"], "Pro");
    assert_eq!(value["price"]["monthly"], 19);
    assert_eq!(value["limits"]["maxPagesPerPdf"], 500);
    assert_eq!(value["limits"]["documentsPerDay"], "unlimited");
    assert_eq!(value["limits"]["batchUpload"], true);
    assert_eq!(value["limits"]["batchUploadSize"], 10);
    assert_eq!(value["popular"], true);
}

#[test]
fn free_plan_serializes_caps_as_numbers() {
    let value = serde_json::to_value(PricingTier::Free.plan()).unwrap();
    assert_eq!(value["limits"]["documentsPerDay"], 5);
    assert_eq!(value["limits"]["chatQuestionsPerDoc"], 3);
    assert_eq!(value["limits"]["batchUpload"], false);
    assert_eq!(value["limits"]["sso"], false);
}

#[test]
fn tier_round_trips_through_serde() {
    for tier in PricingTier::ALL {
        let raw = serde_json::to_string(&tier).unwrap();
        assert_eq!(raw, format!("\"{}\"", tier.as_str()));
        let back: PricingTier = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, tier);
    }
}

#[test]
fn unknown_tier_is_a_parse_error() {
    assert!("enterprise".parse::<PricingTier>().is_err());
    assert!(serde_json::from_str::<PricingTier>("\"enterprise\"").is_err());
}

#[test]
fn every_feature_key_resolves_on_every_tier() {
    let keys = [
        FeatureKey::DocumentsPerDay,
        FeatureKey::MaxPagesPerPdf,
        FeatureKey::ChatQuestionsPerDoc,
        FeatureKey::ApiCallsPerDay,
        FeatureKey::BatchUpload,
        FeatureKey::Seats,
        FeatureKey::Sso,
    ];
    for tier in PricingTier::ALL {
        for key in keys {
            // get() is total; this would panic or fail to compile otherwise
            let _ = tier.plan().limits.get(key);
        }
    }
}

#[test]
fn seat_counts_scale_independently_of_page_caps() {
    assert_eq!(PricingTier::Free.plan().limits.seats, LimitValue::Capped(1));
    assert_eq!(
        PricingTier::Starter.plan().limits.seats,
        LimitValue::Capped(1)
    );
    assert_eq!(PricingTier::Pro.plan().limits.seats, LimitValue::Capped(3));
    assert_eq!(PricingTier::Team.plan().limits.seats, LimitValue::Capped(10));
}

#[test]
fn only_team_has_sso() {
    for tier in [PricingTier::Free, PricingTier::Starter, PricingTier::Pro] {
        assert_eq!(tier.plan().limits.sso, LimitValue::Flag(false));
    }
    assert_eq!(PricingTier::Team.plan().limits.sso, LimitValue::Flag(true));
}
