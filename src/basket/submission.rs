use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::application::QuoteService;
use crate::domain::errors::DomainError;
use crate::domain::quote::{CreateQuoteRequest, QuoteItemInput, QuoteRequest};
use crate::domain::validation::{check, FieldErrors};

use super::{Basket, BasketItem, BasketStorage};

/// Contact and event details collected alongside the basket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_location: Option<String>,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    /// Per-item quantities keyed by catalog id. Items without an entry are
    /// requested once.
    #[serde(default)]
    pub quantities: BTreeMap<String, i32>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Caught before anything was sent; the basket is untouched.
    #[error("Quote request is incomplete")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Recorder(#[from] DomainError),
}

impl SubmitError {
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(fields) => Some(fields),
            SubmitError::Recorder(DomainError::Validation(fields)) => Some(fields),
            SubmitError::Recorder(_) => None,
        }
    }

    /// Whether the same submission may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Recorder(e) if e.is_retryable())
    }
}

/// Builds the creation payload for `items` and `form`, validated before any
/// network or database call. The payload carries no idempotency key.
pub fn build_quote_request(
    items: &[BasketItem],
    form: &ContactForm,
) -> Result<CreateQuoteRequest, FieldErrors> {
    let payload = CreateQuoteRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        company: form.company.clone(),
        event_type: form.event_type.clone(),
        event_date: form.event_date,
        event_location: form.event_location.clone(),
        guest_count: form.guest_count,
        items: items
            .iter()
            .map(|item| QuoteItemInput {
                catalog_item_id: item.id.clone(),
                quantity: form.quantities.get(&item.id).copied().unwrap_or(1),
                name: item.name.clone(),
                thumbnail: item.thumbnail.clone(),
            })
            .collect(),
        message: form.message.clone(),
        idempotency_key: None,
    };

    check(&payload)?;
    Ok(payload)
}

/// Submits the basket and empties it once the request is recorded.
///
/// Retrying after a failure reuses the basket's submission key, so a request
/// that was stored before the failure is returned rather than recorded twice.
pub fn submit_basket<S: BasketStorage>(
    basket: &mut Basket<S>,
    form: &ContactForm,
    service: &QuoteService,
) -> Result<QuoteRequest, SubmitError> {
    let mut payload = build_quote_request(basket.items(), form).map_err(|fields| {
        log::debug!("Basket submission rejected locally: {:?}", fields);
        SubmitError::Invalid(fields)
    })?;
    payload.idempotency_key = Some(basket.submission_key().to_string());

    let recorded = service.submit(&payload)?;

    // The request is already recorded; a failed clear must not be reported
    // as a failed submission.
    if let Err(e) = basket.clear() {
        log::warn!(
            "Quote request {} recorded but the basket could not be cleared: {}",
            recorded.request.id,
            e
        );
    }

    Ok(recorded.request)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::basket::MemoryBasketStorage;
    use crate::domain::ports::QuoteRequestRepository;
    use crate::domain::quote::{ListFilter, ListResult, QuoteStatusUpdate, Recorded};
    use crate::domain::status::QuoteStatus;
    use crate::infrastructure::InMemoryQuoteRequestRepository;

    /// Stores the next request, then reports a failure as if the response
    /// had been lost on the way back.
    struct LostResponse {
        inner: InMemoryQuoteRequestRepository,
        drop_next: AtomicBool,
    }

    impl QuoteRequestRepository for LostResponse {
        fn create(&self, request: &CreateQuoteRequest) -> Result<Recorded, DomainError> {
            let recorded = self.inner.create(request)?;
            if self.drop_next.swap(false, Ordering::SeqCst) {
                return Err(DomainError::Persistence("connection reset".to_string()));
            }
            Ok(recorded)
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRequest>, DomainError> {
            self.inner.find_by_id(id)
        }

        fn list(
            &self,
            filter: &ListFilter<QuoteStatus>,
        ) -> Result<ListResult<QuoteRequest>, DomainError> {
            self.inner.list(filter)
        }

        fn update(
            &self,
            id: Uuid,
            update: &QuoteStatusUpdate,
        ) -> Result<Option<QuoteRequest>, DomainError> {
            self.inner.update(id, update)
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            ..ContactForm::default()
        }
    }

    fn items() -> Vec<BasketItem> {
        vec![
            BasketItem::new("chair-1", "Gold Chiavari Chair").with_thumbnail("/chair.jpg"),
            BasketItem::new("table-1", "Round Table"),
        ]
    }

    #[test]
    fn maps_items_one_to_one_with_default_quantity() {
        let mut form = form();
        form.quantities.insert("chair-1".to_string(), 120);

        let payload = build_quote_request(&items(), &form).unwrap();

        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].catalog_item_id, "chair-1");
        assert_eq!(payload.items[0].quantity, 120);
        assert_eq!(payload.items[0].thumbnail.as_deref(), Some("/chair.jpg"));
        assert_eq!(payload.items[1].quantity, 1);
        assert_eq!(payload.items[1].thumbnail, None);
    }

    #[test]
    fn built_payload_has_no_key() {
        let payload = build_quote_request(&items(), &form()).unwrap();
        assert_eq!(payload.idempotency_key, None);
    }

    #[test]
    fn empty_basket_fails_before_submission() {
        let errors = build_quote_request(&[], &form()).unwrap_err();
        assert!(errors.contains_key("items"));
    }

    #[test]
    fn invalid_basket_leaves_store_and_basket_untouched() {
        let repo = Arc::new(InMemoryQuoteRequestRepository::new());
        let service = QuoteService::new(repo.clone());
        let mut basket = Basket::open(MemoryBasketStorage::new());
        basket.add(items().remove(0)).unwrap();

        let mut bad = form();
        bad.email = "jane".to_string();
        let err = submit_basket(&mut basket, &bad, &service).unwrap_err();

        assert!(err.fields().unwrap().contains_key("email"));
        assert!(repo.is_empty());
        assert_eq!(basket.item_count(), 1);
    }

    #[test]
    fn successful_submission_clears_basket() {
        let repo = Arc::new(InMemoryQuoteRequestRepository::new());
        let service = QuoteService::new(repo.clone());
        let mut basket = Basket::open(MemoryBasketStorage::new());
        for item in items() {
            basket.add(item).unwrap();
        }

        let request = submit_basket(&mut basket, &form(), &service).unwrap();

        assert_eq!(request.items.len(), 2);
        assert!(basket.is_empty());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn failed_recording_keeps_basket() {
        let repo = Arc::new(InMemoryQuoteRequestRepository::new());
        repo.set_unavailable(true);
        let service = QuoteService::new(repo.clone());
        let mut basket = Basket::open(MemoryBasketStorage::new());
        basket.add(items().remove(0)).unwrap();

        let err = submit_basket(&mut basket, &form(), &service).unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(basket.item_count(), 1);
    }

    #[test]
    fn retry_after_lost_response_records_once() {
        let repo = Arc::new(LostResponse {
            inner: InMemoryQuoteRequestRepository::new(),
            drop_next: AtomicBool::new(true),
        });
        let service = QuoteService::new(repo.clone());
        let mut basket = Basket::open(MemoryBasketStorage::new());
        for item in items() {
            basket.add(item).unwrap();
        }

        let err = submit_basket(&mut basket, &form(), &service).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(basket.item_count(), 2);
        assert_eq!(repo.inner.len(), 1);

        let request = submit_basket(&mut basket, &form(), &service).unwrap();
        assert_eq!(repo.inner.len(), 1);
        assert_eq!(request.items.len(), 2);
        assert!(basket.is_empty());
    }

    #[test]
    fn changed_basket_is_a_new_submission() {
        let repo = Arc::new(LostResponse {
            inner: InMemoryQuoteRequestRepository::new(),
            drop_next: AtomicBool::new(true),
        });
        let service = QuoteService::new(repo.clone());
        let mut basket = Basket::open(MemoryBasketStorage::new());
        basket.add(items().remove(0)).unwrap();

        submit_basket(&mut basket, &form(), &service).unwrap_err();
        basket.add(items().remove(1)).unwrap();
        let request = submit_basket(&mut basket, &form(), &service).unwrap();

        assert_eq!(repo.inner.len(), 2);
        assert_eq!(request.items.len(), 2);
    }
}
