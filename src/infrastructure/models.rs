use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::inquiry::Inquiry;
use crate::domain::quote::{QuoteItem, QuoteRequest};
use crate::domain::status::{InquiryStatus, QuoteStatus};
use crate::schema::{inquiries, quote_request_items, quote_requests};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = quote_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuoteRequestRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub message: Option<String>,
    pub status: String,
    pub total_estimate: Option<BigDecimal>,
    pub admin_notes: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = quote_requests)]
pub struct NewQuoteRequestRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub message: Option<String>,
    pub status: String,
    pub idempotency_key: Option<String>,
}

/// `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = quote_requests)]
pub struct QuoteRequestChanges {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
    pub total_estimate: Option<BigDecimal>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = quote_request_items)]
#[diesel(belongs_to(QuoteRequestRow, foreign_key = quote_request_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuoteRequestItemRow {
    pub id: Uuid,
    pub quote_request_id: Uuid,
    pub position: i32,
    pub catalog_item_id: String,
    pub quantity: i32,
    pub name: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = quote_request_items)]
pub struct NewQuoteRequestItemRow {
    pub id: Uuid,
    pub quote_request_id: Uuid,
    pub position: i32,
    pub catalog_item_id: String,
    pub quantity: i32,
    pub name: String,
    pub thumbnail: Option<String>,
}

impl QuoteRequestRow {
    pub fn into_domain(
        self,
        items: Vec<QuoteRequestItemRow>,
    ) -> Result<QuoteRequest, DomainError> {
        let status = self
            .status
            .parse::<QuoteStatus>()
            .map_err(|e| DomainError::Persistence(format!("quote request {}: {}", self.id, e)))?;
        Ok(QuoteRequest {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            event_type: self.event_type,
            event_date: self.event_date,
            event_location: self.event_location,
            guest_count: self.guest_count,
            items: items
                .into_iter()
                .map(|i| QuoteItem {
                    catalog_item_id: i.catalog_item_id,
                    quantity: i.quantity,
                    name: i.name,
                    thumbnail: i.thumbnail,
                })
                .collect(),
            message: self.message,
            status,
            total_estimate: self.total_estimate,
            admin_notes: self.admin_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = inquiries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InquiryRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = inquiries)]
pub struct NewInquiryRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = inquiries)]
pub struct InquiryChanges {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InquiryRow> for Inquiry {
    type Error = DomainError;

    fn try_from(row: InquiryRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<InquiryStatus>()
            .map_err(|e| DomainError::Persistence(format!("inquiry {}: {}", row.id, e)))?;
        Ok(Inquiry {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            subject: row.subject,
            message: row.message,
            status,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
