use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::status::QuoteStatus;
use super::validation::{catalog_reference, not_blank};

/// One requested catalog item, snapshotted at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct QuoteItemInput {
    #[validate(
        length(max = 100, message = "Must be at most 100 characters"),
        custom(function = "catalog_reference")
    )]
    pub catalog_item_id: String,
    #[validate(range(min = 1, message = "Must be a positive whole number"))]
    pub quantity: i32,
    #[validate(
        length(max = 200, message = "Must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Must be at most 500 characters"))]
    pub thumbnail: Option<String>,
}

/// Creation payload for a quote request, shared by the basket adapter and the
/// public submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    #[validate(
        length(max = 200, message = "Must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Must be at most 50 characters"))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Must be at most 200 characters"))]
    pub company: Option<String>,
    /// Event type reference, e.g. `wedding`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Must be at most 100 characters"))]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300, message = "Must be at most 300 characters"))]
    pub event_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100000, message = "Must be between 1 and 100000"))]
    pub guest_count: Option<i32>,
    #[validate(
        length(min = 1, message = "Add at least one item to your quote"),
        nested
    )]
    pub items: Vec<QuoteItemInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "Must be at most 5000 characters"))]
    pub message: Option<String>,
    /// Client-generated token, one per submission attempt. Replays with the
    /// same token return the already recorded request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Must be between 1 and 100 characters"))]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteItem {
    pub catalog_item_id: String,
    pub quantity: i32,
    pub name: String,
    pub thumbnail: Option<String>,
}

impl From<&QuoteItemInput> for QuoteItem {
    fn from(input: &QuoteItemInput) -> Self {
        Self {
            catalog_item_id: input.catalog_item_id.clone(),
            quantity: input.quantity,
            name: input.name.clone(),
            thumbnail: input.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub items: Vec<QuoteItem>,
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub total_estimate: Option<BigDecimal>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a create call: either a fresh record or the one an earlier
/// attempt with the same idempotency key already stored.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub request: QuoteRequest,
    pub replayed: bool,
}

/// Staff-editable fields. Omitted notes or estimate keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct QuoteStatusUpdate {
    pub status: Option<QuoteStatus>,
    pub admin_notes: Option<String>,
    pub total_estimate: Option<BigDecimal>,
}

#[derive(Debug, Clone)]
pub struct ListFilter<S> {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub status: Option<S>,
}

impl<S> ListFilter<S> {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;
    /// Pages past this are empty for any realistic backlog.
    pub const MAX_PAGE: i64 = 1_000_000;

    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, Self::MAX_PAGE),
            limit: limit.clamp(1, Self::MAX_LIMIT),
            search: None,
            status: None,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Trimmed search term, or `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}
