use pdfbrief::models::{FeatureKey, LimitValue, PricingTier};
use pdfbrief::services::entitlement::{
    can_batch_upload, can_perform_action, check_chat_question_limit, check_daily_pdf_limit,
    remaining, within_page_limit,
};

//  Unit Test

#[test]
fn unlimited_features_never_deny() {
    for usage in [0u32, 1, 500, 10_000_000] {
        assert!(can_perform_action(
            PricingTier::Pro,
            usage,
            FeatureKey::DocumentsPerDay
        ));
        assert!(can_perform_action(
            PricingTier::Team,
            usage,
            FeatureKey::ChatQuestionsPerDoc
        ));
    }
}

#[test]
fn boundary_law_for_every_finite_cap() {
    let keys = [
        FeatureKey::DocumentsPerDay,
        FeatureKey::MaxPagesPerPdf,
        FeatureKey::ChatQuestionsPerDoc,
        FeatureKey::ApiCallsPerDay,
        FeatureKey::Seats,
    ];
    for tier in PricingTier::ALL {
        for key in keys {
            if let LimitValue::Capped(cap) = tier.plan().limits.get(key) {
                assert!(
                    can_perform_action(tier, cap - 1, key),
                    "{tier}/{key}: cap-1 must be permitted"
                );
                assert!(
                    !can_perform_action(tier, cap, key),
                    "{tier}/{key}: usage at cap must be denied"
                );
            }
        }
    }
}

#[test]
fn boolean_capability_ignores_usage() {
    for usage in [0u32, 1_000_000] {
        assert!(!can_perform_action(
            PricingTier::Free,
            usage,
            FeatureKey::BatchUpload
        ));
        assert!(can_perform_action(
            PricingTier::Team,
            usage,
            FeatureKey::BatchUpload
        ));
    }
}

#[test]
fn daily_document_caps_are_ordered_across_tiers() {
    assert_eq!(
        PricingTier::Free.plan().limits.documents_per_day,
        LimitValue::Capped(5)
    );
    assert_eq!(
        PricingTier::Starter.plan().limits.documents_per_day,
        LimitValue::Capped(25)
    );
    assert_eq!(
        PricingTier::Pro.plan().limits.documents_per_day,
        LimitValue::Unlimited
    );
    assert_eq!(
        PricingTier::Team.plan().limits.documents_per_day,
        LimitValue::Unlimited
    );
}

#[test]
fn free_tier_daily_pdf_boundary() {
    assert!(check_daily_pdf_limit(PricingTier::Free, 4));
    assert!(!check_daily_pdf_limit(PricingTier::Free, 5));
}

#[test]
fn starter_chat_question_boundary() {
    assert!(check_chat_question_limit(PricingTier::Starter, 9));
    assert!(!check_chat_question_limit(PricingTier::Starter, 10));
}

#[test]
fn pro_daily_pdfs_are_unlimited() {
    assert!(check_daily_pdf_limit(PricingTier::Pro, 1_000_000));
}

#[test]
fn batch_upload_capability_per_tier() {
    assert!(!can_perform_action(
        PricingTier::Free,
        0,
        FeatureKey::BatchUpload
    ));
    assert!(can_perform_action(
        PricingTier::Team,
        0,
        FeatureKey::BatchUpload
    ));
}

#[test]
fn pro_plan_allows_500_page_documents() {
    let plan = "pro".parse::<PricingTier>().unwrap().plan();
    assert_eq!(plan.limits.max_pages_per_pdf, LimitValue::Capped(500));
    assert!(within_page_limit(PricingTier::Pro, 500));
    assert!(!within_page_limit(PricingTier::Pro, 501));
}

#[test]
fn remaining_quota_for_display() {
    assert_eq!(
        remaining(PricingTier::Free, 2, FeatureKey::DocumentsPerDay),
        Some(3)
    );
    assert_eq!(
        remaining(PricingTier::Free, 5, FeatureKey::DocumentsPerDay),
        Some(0)
    );
    assert_eq!(
        remaining(PricingTier::Team, 123, FeatureKey::DocumentsPerDay),
        None
    );
}

#[test]
fn batch_admission_consumes_daily_headroom() {
    // pro and team have unlimited daily documents, so a full batch always fits
    assert!(can_batch_upload(PricingTier::Pro, 1_000_000, 10));
    // the size cap still binds
    assert!(!can_batch_upload(PricingTier::Pro, 0, 11));
    // tiers without the capability are denied outright
    assert!(!can_batch_upload(PricingTier::Free, 0, 1));
    assert!(!can_batch_upload(PricingTier::Starter, 0, 1));
}
