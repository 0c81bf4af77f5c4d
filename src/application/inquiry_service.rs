use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::inquiry::{CreateInquiry, Inquiry, InquiryUpdate};
use crate::domain::ports::InquiryRepository;
use crate::domain::quote::{ListFilter, ListResult};
use crate::domain::status::InquiryStatus;
use crate::domain::validation::{self, FieldErrors};

#[derive(Clone)]
pub struct InquiryService {
    repo: Arc<dyn InquiryRepository>,
}

impl InquiryService {
    pub fn new(repo: Arc<dyn InquiryRepository>) -> Self {
        Self { repo }
    }

    pub fn submit(&self, inquiry: &CreateInquiry) -> Result<Inquiry, DomainError> {
        validation::check(inquiry).map_err(DomainError::Validation)?;
        let created = self.repo.create(inquiry)?;
        log::info!("Recorded inquiry {}", created.id);
        Ok(created)
    }

    pub fn get(&self, id: Uuid) -> Result<Inquiry, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn list(
        &self,
        filter: &ListFilter<InquiryStatus>,
    ) -> Result<ListResult<Inquiry>, DomainError> {
        self.repo.list(filter)
    }

    pub fn update(&self, id: Uuid, update: &InquiryUpdate) -> Result<Inquiry, DomainError> {
        let mut errors = FieldErrors::new();
        if update.status.is_none() && update.admin_notes.is_none() {
            validation::push(&mut errors, "status", "Provide a status or admin notes");
        }
        validation::check_admin_notes(update.admin_notes.as_deref(), &mut errors);
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let current = self.get(id)?;
        if let Some(next) = update.status {
            if !current.status.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: current.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        self.repo.update(id, update)?.ok_or(DomainError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryInquiryRepository;

    fn inquiry() -> CreateInquiry {
        CreateInquiry {
            name: "Sam Lee".to_string(),
            email: "sam@example.com".to_string(),
            phone: Some("555-0100".to_string()),
            company: None,
            subject: None,
            message: "Is the ballroom free on June 20?".to_string(),
        }
    }

    #[test]
    fn submit_then_mark_spam() {
        let service = InquiryService::new(Arc::new(InMemoryInquiryRepository::new()));
        let created = service.submit(&inquiry()).unwrap();
        assert_eq!(created.status, InquiryStatus::New);

        let updated = service
            .update(
                created.id,
                &InquiryUpdate {
                    status: Some(InquiryStatus::Spam),
                    admin_notes: None,
                },
            )
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::Spam);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn overlong_notes_are_rejected() {
        let service = InquiryService::new(Arc::new(InMemoryInquiryRepository::new()));
        let created = service.submit(&inquiry()).unwrap();

        let err = service
            .update(
                created.id,
                &InquiryUpdate {
                    status: None,
                    admin_notes: Some("x".repeat(validation::MAX_ADMIN_NOTES + 1)),
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref f) if f.contains_key("admin_notes")));

        let kept = service
            .update(
                created.id,
                &InquiryUpdate {
                    status: None,
                    admin_notes: Some("x".repeat(validation::MAX_ADMIN_NOTES)),
                },
            )
            .unwrap();
        assert_eq!(kept.admin_notes.map(|n| n.len()), Some(validation::MAX_ADMIN_NOTES));
    }

    #[test]
    fn invalid_inquiry_is_rejected() {
        let service = InquiryService::new(Arc::new(InMemoryInquiryRepository::new()));
        let mut bad = inquiry();
        bad.email = "nope".to_string();
        assert!(matches!(
            service.submit(&bad),
            Err(DomainError::Validation(_))
        ));
    }
}
