//! Process-local repositories for tests and database-less development runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::inquiry::{CreateInquiry, Inquiry, InquiryUpdate};
use crate::domain::next_modified_at;
use crate::domain::ports::{InquiryRepository, QuoteRequestRepository};
use crate::domain::quote::{
    CreateQuoteRequest, ListFilter, ListResult, QuoteItem, QuoteRequest, QuoteStatusUpdate,
    Recorded,
};
use crate::domain::status::{InquiryStatus, QuoteStatus};

struct StoredQuote {
    request: QuoteRequest,
    idempotency_key: Option<String>,
}

/// Case-insensitive substring match over contact fields.
fn matches_contact(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
}

fn page<T: Clone>(matched: Vec<&T>, offset: i64, limit: i64) -> Vec<T> {
    let start = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    matched
        .into_iter()
        .skip(start)
        .take(limit)
        .cloned()
        .collect()
}

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    unavailable: &AtomicBool,
) -> Result<MutexGuard<'a, T>, DomainError> {
    if unavailable.load(Ordering::SeqCst) {
        return Err(DomainError::Persistence("store unavailable".to_string()));
    }
    mutex
        .lock()
        .map_err(|_| DomainError::Persistence("store lock poisoned".to_string()))
}

#[derive(Default)]
pub struct InMemoryQuoteRequestRepository {
    records: Mutex<Vec<StoredQuote>>,
    unavailable: AtomicBool,
}

impl InMemoryQuoteRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with a persistence error, as an unreachable database would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuoteRequestRepository for InMemoryQuoteRequestRepository {
    fn create(&self, request: &CreateQuoteRequest) -> Result<Recorded, DomainError> {
        let mut records = lock(&self.records, &self.unavailable)?;

        if let Some(key) = request.idempotency_key.as_deref() {
            if let Some(existing) = records
                .iter()
                .find(|r| r.idempotency_key.as_deref() == Some(key))
            {
                return Ok(Recorded {
                    request: existing.request.clone(),
                    replayed: true,
                });
            }
        }

        let now = Utc::now();
        let stored = QuoteRequest {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.clone(),
            company: request.company.clone(),
            event_type: request.event_type.clone(),
            event_date: request.event_date,
            event_location: request.event_location.clone(),
            guest_count: request.guest_count,
            items: request.items.iter().map(QuoteItem::from).collect(),
            message: request.message.clone(),
            status: QuoteStatus::New,
            total_estimate: None,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };
        records.push(StoredQuote {
            request: stored.clone(),
            idempotency_key: request.idempotency_key.clone(),
        });

        Ok(Recorded {
            request: stored,
            replayed: false,
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRequest>, DomainError> {
        let records = lock(&self.records, &self.unavailable)?;
        Ok(records
            .iter()
            .find(|r| r.request.id == id)
            .map(|r| r.request.clone()))
    }

    fn list(
        &self,
        filter: &ListFilter<QuoteStatus>,
    ) -> Result<ListResult<QuoteRequest>, DomainError> {
        let records = lock(&self.records, &self.unavailable)?;

        // Insertion order is creation order; newest first.
        let matched: Vec<&QuoteRequest> = records
            .iter()
            .rev()
            .map(|r| &r.request)
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| {
                filter.search_term().map_or(true, |term| {
                    matches_contact(
                        term,
                        &[
                            Some(r.name.as_str()),
                            Some(r.email.as_str()),
                            r.phone.as_deref(),
                            r.company.as_deref(),
                        ],
                    )
                })
            })
            .collect();

        let total = matched.len() as i64;
        Ok(ListResult {
            items: page(matched, filter.offset(), filter.limit),
            total,
        })
    }

    fn update(
        &self,
        id: Uuid,
        update: &QuoteStatusUpdate,
    ) -> Result<Option<QuoteRequest>, DomainError> {
        let mut records = lock(&self.records, &self.unavailable)?;
        let Some(stored) = records.iter_mut().find(|r| r.request.id == id) else {
            return Ok(None);
        };

        let request = &mut stored.request;
        if let Some(status) = update.status {
            request.status = status;
        }
        if let Some(notes) = &update.admin_notes {
            request.admin_notes = Some(notes.clone());
        }
        if let Some(estimate) = &update.total_estimate {
            request.total_estimate = Some(estimate.clone());
        }
        request.updated_at = next_modified_at(request.updated_at);

        Ok(Some(request.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryInquiryRepository {
    records: Mutex<Vec<Inquiry>>,
    unavailable: AtomicBool,
}

impl InMemoryInquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl InquiryRepository for InMemoryInquiryRepository {
    fn create(&self, inquiry: &CreateInquiry) -> Result<Inquiry, DomainError> {
        let mut records = lock(&self.records, &self.unavailable)?;
        let now = Utc::now();
        let stored = Inquiry {
            id: Uuid::new_v4(),
            name: inquiry.name.trim().to_string(),
            email: inquiry.email.trim().to_string(),
            phone: inquiry.phone.clone(),
            company: inquiry.company.clone(),
            subject: inquiry.subject.clone(),
            message: inquiry.message.clone(),
            status: InquiryStatus::New,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError> {
        let records = lock(&self.records, &self.unavailable)?;
        Ok(records.iter().find(|i| i.id == id).cloned())
    }

    fn list(
        &self,
        filter: &ListFilter<InquiryStatus>,
    ) -> Result<ListResult<Inquiry>, DomainError> {
        let records = lock(&self.records, &self.unavailable)?;

        let matched: Vec<&Inquiry> = records
            .iter()
            .rev()
            .filter(|i| filter.status.map_or(true, |s| i.status == s))
            .filter(|i| {
                filter.search_term().map_or(true, |term| {
                    matches_contact(
                        term,
                        &[
                            Some(i.name.as_str()),
                            Some(i.email.as_str()),
                            i.phone.as_deref(),
                            i.company.as_deref(),
                        ],
                    )
                })
            })
            .collect();

        let total = matched.len() as i64;
        Ok(ListResult {
            items: page(matched, filter.offset(), filter.limit),
            total,
        })
    }

    fn update(&self, id: Uuid, update: &InquiryUpdate) -> Result<Option<Inquiry>, DomainError> {
        let mut records = lock(&self.records, &self.unavailable)?;
        let Some(inquiry) = records.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        if let Some(status) = update.status {
            inquiry.status = status;
        }
        if let Some(notes) = &update.admin_notes {
            inquiry.admin_notes = Some(notes.clone());
        }
        inquiry.updated_at = next_modified_at(inquiry.updated_at);

        Ok(Some(inquiry.clone()))
    }
}
