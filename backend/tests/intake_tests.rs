//! Supplier intake resolver tests
//!
//! Verifies the search → found/not-found/duplicate branching, the create
//! flow's merged error surface, and transport failure reporting

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use shared::{
    DayBoundary, ExistingDelivery, IntakeEffect, IntakeEvent, IntakeNotice, IntakePhase,
    IntakeResolver, QuickSupplierInput, QuickSupplierResponse, SearchSupplierResponse, Supplier,
    TransportError,
};

fn supplier(code: &str) -> Supplier {
    let now = Utc::now();
    Supplier {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: "Rosa Elena Núñez".to_string(),
        email: Some("rosa@flores.ec".to_string()),
        phone: Some("0991234567".to_string()),
        ruc: Some("1790012345001".to_string()),
        varieties: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn found(supplier: Supplier, existing: Option<ExistingDelivery>) -> SearchSupplierResponse {
    SearchSupplierResponse {
        found: true,
        supplier: Some(supplier),
        existing_delivery: existing,
        message: None,
    }
}

fn not_found() -> SearchSupplierResponse {
    SearchSupplierResponse {
        found: false,
        supplier: None,
        existing_delivery: None,
        message: Some("No supplier registered with code FLR99".to_string()),
    }
}

fn valid_input() -> QuickSupplierInput {
    QuickSupplierInput {
        code: "FLR99".to_string(),
        name: "Rosa Elena Núñez".to_string(),
        email: "rosa@flores.ec".to_string(),
        phone: "0991234567".to_string(),
        ruc: "1790012345001".to_string(),
    }
}

/// Morning at the farm: 2024-06-10 08:30 local, 13:30 UTC
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 13, 30, 0).unwrap()
}

fn resolver_with_code(code: &str) -> IntakeResolver {
    let mut resolver = IntakeResolver::new(DayBoundary::ecuador());
    resolver.handle(IntakeEvent::CodeChanged(code.to_string()), now());
    resolver
}

// ============================================================================
// Search Branching
// ============================================================================

mod search {
    use super::*;

    #[test]
    fn blank_code_never_issues_a_lookup() {
        for code in ["", "   ", "\t"] {
            let mut resolver = resolver_with_code(code);
            let effect = resolver.handle(IntakeEvent::SearchSubmitted, now());
            assert_eq!(effect, None, "code {:?} must not reach the network", code);
            assert_eq!(resolver.notice(), Some(&IntakeNotice::EmptyCode));
            assert!(!resolver.busy());
        }
    }

    #[test]
    fn non_blank_code_emits_a_lookup_and_sets_busy() {
        let mut resolver = resolver_with_code(" FLR01 ");
        let effect = resolver.handle(IntakeEvent::SearchSubmitted, now());
        assert_eq!(
            effect,
            Some(IntakeEffect::LookupSupplier {
                code: "FLR01".to_string()
            })
        );
        assert!(resolver.busy());
    }

    #[test]
    fn resubmission_while_busy_is_ignored() {
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        let second = resolver.handle(IntakeEvent::SearchSubmitted, now());
        assert_eq!(second, None);
    }

    #[test]
    fn found_with_no_delivery_today_goes_straight_to_entry() {
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupCompleted(found(supplier("FLR01"), None)),
            now(),
        );

        assert!(matches!(resolver.phase(), IntakePhase::Entry { .. }));
        assert!(!resolver.busy());
    }

    #[test]
    fn yesterdays_delivery_does_not_trigger_the_duplicate_dialog() {
        let existing = ExistingDelivery {
            id: Uuid::new_v4(),
            // 2024-06-09 21:00 local, the previous Ecuador day
            entry_datetime: Utc.with_ymd_and_hms(2024, 6, 10, 2, 0, 0).unwrap(),
            total_entries: 3,
            total_stems: 1200,
        };

        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupCompleted(found(supplier("FLR01"), Some(existing))),
            now(),
        );

        assert!(matches!(resolver.phase(), IntakePhase::Entry { .. }));
    }

    #[test]
    fn not_found_offers_creation_prefilled_with_the_code() {
        let mut resolver = resolver_with_code("FLR99");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(IntakeEvent::LookupCompleted(not_found()), now());

        assert!(matches!(resolver.phase(), IntakePhase::Searching));
        assert_eq!(resolver.notice(), Some(&IntakeNotice::NotFound));
        assert_eq!(resolver.create_offer(), Some("FLR99"));
    }
}

// ============================================================================
// Duplicate Detour
// ============================================================================

mod duplicate {
    use super::*;

    fn same_day_existing() -> ExistingDelivery {
        ExistingDelivery {
            id: Uuid::new_v4(),
            // 06:15 local the same morning
            entry_datetime: Utc.with_ymd_and_hms(2024, 6, 10, 11, 15, 0).unwrap(),
            total_entries: 4,
            total_stems: 2150,
        }
    }

    fn resolver_in_duplicate() -> (IntakeResolver, ExistingDelivery) {
        let existing = same_day_existing();
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupCompleted(found(supplier("FLR01"), Some(existing.clone()))),
            now(),
        );
        (resolver, existing)
    }

    #[test]
    fn same_day_delivery_detours_to_the_duplicate_dialog() {
        let (resolver, existing) = resolver_in_duplicate();
        match resolver.phase() {
            IntakePhase::DuplicateDetected {
                existing: shown, ..
            } => {
                assert_eq!(shown.id, existing.id);
                assert_eq!(shown.total_entries, 4);
                assert_eq!(shown.total_stems, 2150);
            }
            other => panic!("expected duplicate dialog, got {:?}", other),
        }
    }

    #[test]
    fn continue_new_discards_the_detour() {
        let (mut resolver, _) = resolver_in_duplicate();
        let effect = resolver.handle(IntakeEvent::ContinueNew, now());
        assert_eq!(effect, None);
        assert!(matches!(resolver.phase(), IntakePhase::Entry { .. }));
    }

    #[test]
    fn edit_existing_navigates_to_the_logged_delivery() {
        let (mut resolver, existing) = resolver_in_duplicate();
        let effect = resolver.handle(IntakeEvent::EditExisting, now());
        assert_eq!(
            effect,
            Some(IntakeEffect::OpenDelivery {
                delivery_id: existing.id
            })
        );
    }
}

// ============================================================================
// Quick Supplier Creation
// ============================================================================

mod create {
    use super::*;

    #[test]
    fn client_side_validation_blocks_the_request() {
        let mut resolver = resolver_with_code("FLR99");
        let mut input = valid_input();
        input.phone = "12345".to_string();

        let effect = resolver.handle(IntakeEvent::CreateSupplierSubmitted(input), now());
        assert_eq!(effect, None);
        assert!(resolver.field_errors().contains_key("phone"));
        assert!(!resolver.busy());
    }

    #[test]
    fn valid_input_emits_the_create_effect() {
        let mut resolver = resolver_with_code("FLR99");
        let effect = resolver.handle(IntakeEvent::CreateSupplierSubmitted(valid_input()), now());
        assert!(matches!(effect, Some(IntakeEffect::CreateSupplier(_))));
        assert!(resolver.busy());
    }

    #[test]
    fn successful_creation_enters_the_entry_phase() {
        let mut resolver = resolver_with_code("FLR99");
        resolver.handle(IntakeEvent::CreateSupplierSubmitted(valid_input()), now());
        resolver.handle(
            IntakeEvent::CreateCompleted(QuickSupplierResponse {
                success: true,
                supplier: Some(supplier("FLR99")),
                errors: None,
                message: None,
            }),
            now(),
        );

        assert!(matches!(resolver.phase(), IntakePhase::Entry { .. }));
        assert!(resolver.field_errors().is_empty());
    }

    #[test]
    fn server_errors_merge_into_the_same_surface() {
        let mut resolver = resolver_with_code("FLR99");
        resolver.handle(IntakeEvent::CreateSupplierSubmitted(valid_input()), now());

        let mut errors = BTreeMap::new();
        errors.insert("code".to_string(), "Code FLR99 is already registered".to_string());
        resolver.handle(
            IntakeEvent::CreateCompleted(QuickSupplierResponse {
                success: false,
                supplier: None,
                errors: Some(errors),
                message: Some("Supplier could not be created".to_string()),
            }),
            now(),
        );

        assert!(matches!(resolver.phase(), IntakePhase::Searching));
        assert_eq!(
            resolver.field_errors().get("code").map(String::as_str),
            Some("Code FLR99 is already registered")
        );
    }
}

// ============================================================================
// Transport Failures
// ============================================================================
// Session expiry prompts a reload, generic failures prompt a retry; neither
// touches draft state.

mod transport {
    use super::*;

    #[test]
    fn session_expiry_is_reported_distinctly() {
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupFailed(TransportError::SessionExpired),
            now(),
        );

        assert_eq!(resolver.notice(), Some(&IntakeNotice::SessionExpired));
        assert!(!resolver.busy());
        assert!(matches!(resolver.phase(), IntakePhase::Searching));
    }

    #[test]
    fn network_failure_keeps_the_detail_for_retry_messaging() {
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupFailed(TransportError::Network("timeout".to_string())),
            now(),
        );

        assert_eq!(
            resolver.notice(),
            Some(&IntakeNotice::NetworkFailure("timeout".to_string()))
        );
    }

    #[test]
    fn a_failed_search_can_be_retried() {
        let mut resolver = resolver_with_code("FLR01");
        resolver.handle(IntakeEvent::SearchSubmitted, now());
        resolver.handle(
            IntakeEvent::LookupFailed(TransportError::Network("timeout".to_string())),
            now(),
        );

        let retry = resolver.handle(IntakeEvent::SearchSubmitted, now());
        assert!(matches!(retry, Some(IntakeEffect::LookupSupplier { .. })));
    }
}
