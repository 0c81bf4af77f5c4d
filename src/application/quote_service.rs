use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::QuoteRequestRepository;
use crate::domain::quote::{
    CreateQuoteRequest, ListFilter, ListResult, QuoteRequest, QuoteStatusUpdate, Recorded,
};
use crate::domain::status::QuoteStatus;
use crate::domain::validation::{self, FieldErrors};

/// Estimates are stored as NUMERIC(12, 2).
const ESTIMATE_SCALE: i64 = 2;
const ESTIMATE_LIMIT: i64 = 10_000_000_000;

/// Quote request recorder: validation gate in front of the repository.
#[derive(Clone)]
pub struct QuoteService {
    repo: Arc<dyn QuoteRequestRepository>,
}

impl QuoteService {
    pub fn new(repo: Arc<dyn QuoteRequestRepository>) -> Self {
        Self { repo }
    }

    /// Validates and records a new request. Invalid payloads never reach the
    /// repository.
    pub fn submit(&self, request: &CreateQuoteRequest) -> Result<Recorded, DomainError> {
        validation::check(request).map_err(|fields| {
            log::debug!("Rejected quote request: {:?}", fields);
            DomainError::Validation(fields)
        })?;
        let recorded = self.repo.create(request)?;
        if recorded.replayed {
            log::warn!(
                "Quote request {} replayed with an existing idempotency key",
                recorded.request.id
            );
        } else {
            log::info!(
                "Recorded quote request {} with {} item(s)",
                recorded.request.id,
                recorded.request.items.len()
            );
        }
        Ok(recorded)
    }

    pub fn get(&self, id: Uuid) -> Result<QuoteRequest, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list(
        &self,
        filter: &ListFilter<QuoteStatus>,
    ) -> Result<ListResult<QuoteRequest>, DomainError> {
        self.repo.list(filter)
    }

    /// Staff update of status, notes and estimate.
    pub fn update_status(
        &self,
        id: Uuid,
        update: &QuoteStatusUpdate,
    ) -> Result<QuoteRequest, DomainError> {
        check_update(update).map_err(DomainError::Validation)?;

        let current = self.get(id)?;
        if let Some(next) = update.status {
            if !current.status.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: current.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        let updated = self.repo.update(id, update)?.ok_or(DomainError::NotFound)?;
        log::info!(
            "Quote request {} moved from {} to {}",
            id,
            current.status,
            updated.status
        );
        Ok(updated)
    }
}

fn check_update(update: &QuoteStatusUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if update.status.is_none() && update.admin_notes.is_none() && update.total_estimate.is_none()
    {
        validation::push(
            &mut errors,
            "status",
            "Provide a status, admin notes or a total estimate",
        );
    }
    validation::check_admin_notes(update.admin_notes.as_deref(), &mut errors);
    if let Some(estimate) = &update.total_estimate {
        if *estimate < BigDecimal::from(0) {
            validation::push(&mut errors, "total_estimate", "Must not be negative");
        }
        if estimate.abs() >= BigDecimal::from(ESTIMATE_LIMIT) {
            validation::push(&mut errors, "total_estimate", "Must be less than 10,000,000,000");
        }
        if estimate.with_scale(ESTIMATE_SCALE) != *estimate {
            validation::push(&mut errors, "total_estimate", "Must have at most 2 decimal places");
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
