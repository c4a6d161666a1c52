//! Entitlement checks: tier + usage observation -> allow/deny.
//!
//! Every function here is a pure function of its arguments and the static
//! plan catalog. Callers own the usage counters (see `db::usage`) and are
//! responsible for turning a deny into an upgrade prompt or an HTTP
//! rejection.

use crate::models::{FeatureKey, LimitValue, PricingTier};

/// Whether the given action may proceed for `tier` with `usage` actions
/// already taken this period.
///
/// Counters use a strict comparison: a usage count equal to the cap is
/// already at limit. Permitting the Nth action requires the counter to read
/// at most N-1, so after the action completes it reaches but never exceeds
/// the cap.
pub fn can_perform_action(tier: PricingTier, usage: u32, key: FeatureKey) -> bool {
    match tier.plan().limits.get(key) {
        LimitValue::Unlimited => true,
        LimitValue::Flag(enabled) => enabled,
        LimitValue::Capped(cap) => usage < cap,
    }
}

/// May this account process another document today?
pub fn check_daily_pdf_limit(tier: PricingTier, today_count: u32) -> bool {
    can_perform_action(tier, today_count, FeatureKey::DocumentsPerDay)
}

/// May this account ask another question about a document?
pub fn check_chat_question_limit(tier: PricingTier, questions_asked: u32) -> bool {
    can_perform_action(tier, questions_asked, FeatureKey::ChatQuestionsPerDoc)
}

/// How many actions are left before the cap, for quota displays.
///
/// `None` means no cap is enforced. A disabled capability reads as zero.
pub fn remaining(tier: PricingTier, usage: u32, key: FeatureKey) -> Option<u32> {
    match tier.plan().limits.get(key) {
        LimitValue::Unlimited => None,
        LimitValue::Flag(true) => None,
        LimitValue::Flag(false) => Some(0),
        LimitValue::Capped(cap) => Some(cap.saturating_sub(usage)),
    }
}

/// Whether a document of `page_count` pages fits the tier's page cap.
///
/// Page count is a property of one document, not a counter of actions taken,
/// so the comparison is inclusive: a 500-page document is accepted at a
/// 500-page cap.
pub fn within_page_limit(tier: PricingTier, page_count: u32) -> bool {
    match tier.plan().limits.max_pages_per_pdf {
        LimitValue::Unlimited => true,
        LimitValue::Flag(enabled) => enabled,
        LimitValue::Capped(cap) => page_count <= cap,
    }
}

/// Whether a batch of `batch_len` uploads may be admitted with `today_count`
/// documents already processed today.
///
/// Requires the batch capability, the batch-size cap, and room for every
/// document in the batch as the daily counter advances.
pub fn can_batch_upload(tier: PricingTier, today_count: u32, batch_len: u32) -> bool {
    let limits = &tier.plan().limits;
    let within_batch_cap = match limits.batch_size() {
        Some(max_files) => batch_len >= 1 && batch_len <= max_files,
        None => false,
    };
    if !within_batch_cap {
        return false;
    }
    match limits.documents_per_day {
        LimitValue::Unlimited => true,
        LimitValue::Flag(enabled) => enabled,
        // usage + n <= cap, computed without overflow
        LimitValue::Capped(cap) => u64::from(today_count) + u64::from(batch_len) <= u64::from(cap),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_permits_any_usage() {
        for usage in [0, 1, 10_000_000] {
            assert!(can_perform_action(
                PricingTier::Pro,
                usage,
                FeatureKey::DocumentsPerDay
            ));
            assert!(can_perform_action(
                PricingTier::Team,
                usage,
                FeatureKey::ApiCallsPerDay
            ));
        }
    }

    #[test]
    fn cap_boundary_is_strict() {
        // cap - 1 permitted, cap denied, for every tier with a finite cap
        for tier in PricingTier::ALL {
            for key in [
                FeatureKey::DocumentsPerDay,
                FeatureKey::ChatQuestionsPerDoc,
                FeatureKey::ApiCallsPerDay,
                FeatureKey::Seats,
            ] {
                if let LimitValue::Capped(cap) = tier.plan().limits.get(key) {
                    assert!(can_perform_action(tier, cap - 1, key), "{tier} {key}");
                    assert!(!can_perform_action(tier, cap, key), "{tier} {key}");
                }
            }
        }
    }

    #[test]
    fn disabled_flag_denies_regardless_of_usage() {
        for usage in [0, 1_000_000] {
            assert!(!can_perform_action(
                PricingTier::Free,
                usage,
                FeatureKey::BatchUpload
            ));
            assert!(!can_perform_action(
                PricingTier::Starter,
                usage,
                FeatureKey::Sso
            ));
        }
    }

    #[test]
    fn enabled_flag_permits_regardless_of_usage() {
        assert!(can_perform_action(
            PricingTier::Team,
            0,
            FeatureKey::BatchUpload
        ));
        assert!(can_perform_action(
            PricingTier::Team,
            1_000_000,
            FeatureKey::Sso
        ));
    }

    #[test]
    fn daily_pdf_scenarios() {
        assert!(check_daily_pdf_limit(PricingTier::Free, 4));
        assert!(!check_daily_pdf_limit(PricingTier::Free, 5));
        assert!(check_daily_pdf_limit(PricingTier::Pro, 1_000_000));
    }

    #[test]
    fn chat_question_scenarios() {
        assert!(check_chat_question_limit(PricingTier::Starter, 9));
        assert!(!check_chat_question_limit(PricingTier::Starter, 10));
    }

    #[test]
    fn daily_pdf_caps_grow_with_tier() {
        // catalog data, not resolver logic: free < starter < pro = team (unlimited)
        let free = PricingTier::Free.plan().limits.documents_per_day;
        let starter = PricingTier::Starter.plan().limits.documents_per_day;
        assert_eq!(free, LimitValue::Capped(5));
        assert_eq!(starter, LimitValue::Capped(25));
        assert!(PricingTier::Pro
            .plan()
            .limits
            .documents_per_day
            .is_unlimited());
        assert!(PricingTier::Team
            .plan()
            .limits
            .documents_per_day
            .is_unlimited());
    }

    #[test]
    fn remaining_saturates_at_zero() {
        assert_eq!(
            remaining(PricingTier::Free, 3, FeatureKey::DocumentsPerDay),
            Some(2)
        );
        assert_eq!(
            remaining(PricingTier::Free, 99, FeatureKey::DocumentsPerDay),
            Some(0)
        );
        assert_eq!(
            remaining(PricingTier::Pro, 7, FeatureKey::DocumentsPerDay),
            None
        );
        assert_eq!(
            remaining(PricingTier::Free, 0, FeatureKey::BatchUpload),
            Some(0)
        );
    }

    #[test]
    fn page_limit_is_inclusive() {
        assert!(within_page_limit(PricingTier::Pro, 500));
        assert!(!within_page_limit(PricingTier::Pro, 501));
        assert!(within_page_limit(PricingTier::Free, 50));
        assert!(!within_page_limit(PricingTier::Free, 51));
    }

    #[test]
    fn batch_upload_requires_capability() {
        assert!(!can_batch_upload(PricingTier::Free, 0, 2));
        assert!(!can_batch_upload(PricingTier::Starter, 0, 2));
        assert!(can_batch_upload(PricingTier::Pro, 0, 2));
    }

    #[test]
    fn batch_upload_respects_size_cap() {
        assert!(can_batch_upload(PricingTier::Pro, 0, 10));
        assert!(!can_batch_upload(PricingTier::Pro, 0, 11));
        assert!(can_batch_upload(PricingTier::Team, 0, 25));
        assert!(!can_batch_upload(PricingTier::Team, 0, 26));
        assert!(!can_batch_upload(PricingTier::Pro, 0, 0));
    }
}
