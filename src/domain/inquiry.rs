use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::status::InquiryStatus;
use super::validation::not_blank;

/// Contact-form submission without any rental items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInquiry {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Must be at most 200 characters"))]
    pub subject: Option<String>,
    #[validate(
        length(max = 5000, message = "Must be at most 5000 characters"),
        custom(function = "not_blank")
    )]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct InquiryUpdate {
    pub status: Option<InquiryStatus>,
    pub admin_notes: Option<String>,
}
