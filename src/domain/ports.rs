use uuid::Uuid;

use super::errors::DomainError;
use super::inquiry::{CreateInquiry, Inquiry, InquiryUpdate};
use super::quote::{
    CreateQuoteRequest, ListFilter, ListResult, QuoteRequest, QuoteStatusUpdate, Recorded,
};
use super::status::{InquiryStatus, QuoteStatus};

/// Durable store for quote requests. Callers validate payloads before `create`.
pub trait QuoteRequestRepository: Send + Sync + 'static {
    /// Stores a new request with status `new`. When the payload carries an
    /// idempotency key that was already recorded, returns that record instead.
    fn create(&self, request: &CreateQuoteRequest) -> Result<Recorded, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRequest>, DomainError>;
    /// Most recent first.
    fn list(
        &self,
        filter: &ListFilter<QuoteStatus>,
    ) -> Result<ListResult<QuoteRequest>, DomainError>;
    /// Applies the update and bumps `updated_at`. `None` when the id is unknown.
    fn update(
        &self,
        id: Uuid,
        update: &QuoteStatusUpdate,
    ) -> Result<Option<QuoteRequest>, DomainError>;
}

pub trait InquiryRepository: Send + Sync + 'static {
    fn create(&self, inquiry: &CreateInquiry) -> Result<Inquiry, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError>;
    fn list(&self, filter: &ListFilter<InquiryStatus>)
        -> Result<ListResult<Inquiry>, DomainError>;
    fn update(&self, id: Uuid, update: &InquiryUpdate) -> Result<Option<Inquiry>, DomainError>;
}
