//! Supplier intake resolver
//!
//! Drives the two-step gate workflow: search a supplier by code, branch on
//! found / not-found / duplicate-same-day-delivery, then hand off to entry.
//! The resolver is a pure state machine: it consumes [`IntakeEvent`]s and
//! emits [`IntakeEffect`]s for the host to perform; network responses come
//! back as further events. A busy flag covers each in-flight request and the
//! last response to arrive wins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ExistingDelivery, QuickSupplierInput, QuickSupplierResponse, SearchSupplierResponse, Supplier,
};
use crate::types::DayBoundary;
use crate::validation::validate_quick_supplier;

/// Transport failures, split so the operator gets the right recovery hint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The session died server-side; retrying is pointless, reload instead
    #[error("session expired, reload the page")]
    SessionExpired,

    #[error("network failure: {0}")]
    Network(String),
}

/// Operator-facing notices raised by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeNotice {
    /// Search submitted with a blank code
    EmptyCode,
    /// No supplier matches the code; a create affordance is offered
    NotFound,
    SessionExpired,
    NetworkFailure(String),
}

/// Where the intake session currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum IntakePhase {
    /// Typing/searching for a supplier code
    Searching,
    /// The supplier already delivered today; the operator must choose
    DuplicateDetected {
        supplier: Supplier,
        existing: ExistingDelivery,
    },
    /// Ready to record line-items for this supplier
    Entry { supplier: Supplier },
}

/// Everything that can happen to the resolver
#[derive(Debug, Clone)]
pub enum IntakeEvent {
    CodeChanged(String),
    SearchSubmitted,
    LookupCompleted(SearchSupplierResponse),
    LookupFailed(TransportError),
    CreateSupplierSubmitted(QuickSupplierInput),
    CreateCompleted(QuickSupplierResponse),
    CreateFailed(TransportError),
    /// From the duplicate dialog: start a fresh delivery anyway
    ContinueNew,
    /// From the duplicate dialog: abandon the draft, edit the existing one
    EditExisting,
}

/// Commands the host must perform on the resolver's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeEffect {
    LookupSupplier { code: String },
    CreateSupplier(QuickSupplierInput),
    OpenDelivery { delivery_id: Uuid },
}

/// The intake state machine
#[derive(Debug, Clone)]
pub struct IntakeResolver {
    phase: IntakePhase,
    code: String,
    busy: bool,
    notice: Option<IntakeNotice>,
    /// Code to pre-fill the create-supplier form with
    create_offer: Option<String>,
    /// Client- and server-side field errors, merged into one surface
    field_errors: BTreeMap<String, String>,
    day_boundary: DayBoundary,
}

impl IntakeResolver {
    pub fn new(day_boundary: DayBoundary) -> Self {
        Self {
            phase: IntakePhase::Searching,
            code: String::new(),
            busy: false,
            notice: None,
            create_offer: None,
            field_errors: BTreeMap::new(),
            day_boundary,
        }
    }

    pub fn phase(&self) -> &IntakePhase {
        &self.phase
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether a request is in flight; the triggering control is disabled
    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&IntakeNotice> {
        self.notice.as_ref()
    }

    pub fn create_offer(&self) -> Option<&str> {
        self.create_offer.as_deref()
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    /// Advance the machine by one event. `now` is supplied by the host so
    /// duplicate detection stays deterministic under test.
    pub fn handle(&mut self, event: IntakeEvent, now: DateTime<Utc>) -> Option<IntakeEffect> {
        match event {
            IntakeEvent::CodeChanged(code) => {
                self.code = code;
                self.notice = None;
                None
            }
            IntakeEvent::SearchSubmitted => {
                if self.busy {
                    return None;
                }
                let code = self.code.trim().to_string();
                if code.is_empty() {
                    self.notice = Some(IntakeNotice::EmptyCode);
                    return None;
                }
                self.busy = true;
                self.notice = None;
                self.create_offer = None;
                Some(IntakeEffect::LookupSupplier { code })
            }
            IntakeEvent::LookupCompleted(response) => {
                self.busy = false;
                self.resolve_lookup(response, now);
                None
            }
            IntakeEvent::LookupFailed(error) => {
                self.busy = false;
                self.notice = Some(match error {
                    TransportError::SessionExpired => IntakeNotice::SessionExpired,
                    TransportError::Network(detail) => IntakeNotice::NetworkFailure(detail),
                });
                None
            }
            IntakeEvent::CreateSupplierSubmitted(input) => {
                if self.busy {
                    return None;
                }
                let errors = validate_quick_supplier(&input);
                if !errors.is_empty() {
                    self.field_errors = errors;
                    return None;
                }
                self.field_errors.clear();
                self.busy = true;
                Some(IntakeEffect::CreateSupplier(input))
            }
            IntakeEvent::CreateCompleted(response) => {
                self.busy = false;
                match response.supplier {
                    Some(supplier) if response.success => {
                        self.field_errors.clear();
                        self.phase = IntakePhase::Entry { supplier };
                    }
                    _ => {
                        // merge server-side errors into the shared surface
                        if let Some(errors) = response.errors {
                            self.field_errors.extend(errors);
                        }
                    }
                }
                None
            }
            IntakeEvent::CreateFailed(error) => {
                self.busy = false;
                self.notice = Some(match error {
                    TransportError::SessionExpired => IntakeNotice::SessionExpired,
                    TransportError::Network(detail) => IntakeNotice::NetworkFailure(detail),
                });
                None
            }
            IntakeEvent::ContinueNew => {
                if let IntakePhase::DuplicateDetected { supplier, .. } = &self.phase {
                    self.phase = IntakePhase::Entry {
                        supplier: supplier.clone(),
                    };
                }
                None
            }
            IntakeEvent::EditExisting => {
                if let IntakePhase::DuplicateDetected { existing, .. } = &self.phase {
                    return Some(IntakeEffect::OpenDelivery {
                        delivery_id: existing.id,
                    });
                }
                None
            }
        }
    }

    fn resolve_lookup(&mut self, response: SearchSupplierResponse, now: DateTime<Utc>) {
        let Some(supplier) = response.supplier.filter(|_| response.found) else {
            self.notice = Some(IntakeNotice::NotFound);
            self.create_offer = Some(self.code.trim().to_string());
            return;
        };
        match response.existing_delivery {
            Some(existing) if self.day_boundary.same_day(existing.entry_datetime, now) => {
                self.phase = IntakePhase::DuplicateDetected { supplier, existing };
            }
            _ => {
                self.phase = IntakePhase::Entry { supplier };
            }
        }
    }
}
