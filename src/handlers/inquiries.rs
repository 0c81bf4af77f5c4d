use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::InquiryService;
use crate::auth::AdminSession;
use crate::domain::inquiry::{CreateInquiry, Inquiry, InquiryUpdate};
use crate::domain::status::InquiryStatus;
use crate::errors::{AppError, ErrorResponse};

use super::{total_pages, ListParams};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryResponse {
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

impl From<Inquiry> for InquiryResponse {
    fn from(i: Inquiry) -> Self {
        Self {
            id: i.id,
            name: i.name,
            email: i.email,
            phone: i.phone,
            company: i.company,
            subject: i.subject,
            message: i.message,
            status: i.status,
            admin_notes: i.admin_notes,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryPage {
    pub items: Vec<InquiryResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInquiryBody {
    pub status: Option<InquiryStatus>,
    pub admin_notes: Option<String>,
}

/// POST /inquiries
#[utoipa::path(
    post,
    path = "/inquiries",
    request_body = CreateInquiry,
    responses(
        (status = 201, description = "Inquiry recorded", body = InquiryResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Could not be saved, retry later", body = ErrorResponse),
    ),
    tag = "inquiries"
)]
pub async fn create_inquiry(
    service: web::Data<InquiryService>,
    body: web::Json<CreateInquiry>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let created = web::block(move || service.submit(&body))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(InquiryResponse::from(created)))
}

/// GET /admin/inquiries
#[utoipa::path(
    get,
    path = "/admin/inquiries",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("search" = Option<String>, Query, description = "Matches name, email, phone or company"),
        ("status" = Option<InquiryStatus>, Query, description = "Only inquiries in this status"),
    ),
    responses(
        (status = 200, description = "Paginated list of inquiries", body = InquiryPage),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
    ),
    tag = "inquiries"
)]
pub async fn list_inquiries(
    _admin: AdminSession,
    service: web::Data<InquiryService>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter::<InquiryStatus>()?;
    let (page, limit) = (filter.page, filter.limit);

    let result = web::block(move || service.list(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(InquiryPage {
        items: result.items.into_iter().map(InquiryResponse::from).collect(),
        total: result.total,
        page,
        limit,
        total_pages: total_pages(result.total, limit),
    }))
}

/// GET /admin/inquiries/{id}
#[utoipa::path(
    get,
    path = "/admin/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry UUID"),
    ),
    responses(
        (status = 200, description = "Inquiry found", body = InquiryResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
    ),
    tag = "inquiries"
)]
pub async fn get_inquiry(
    _admin: AdminSession,
    service: web::Data<InquiryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let inquiry = web::block(move || service.get(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(InquiryResponse::from(inquiry)))
}

/// PATCH /admin/inquiries/{id}
#[utoipa::path(
    patch,
    path = "/admin/inquiries/{id}",
    params(
        ("id" = Uuid, Path, description = "Inquiry UUID"),
    ),
    request_body = UpdateInquiryBody,
    responses(
        (status = 200, description = "Inquiry updated", body = InquiryResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
    ),
    tag = "inquiries"
)]
pub async fn update_inquiry(
    _admin: AdminSession,
    service: web::Data<InquiryService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInquiryBody>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let update = InquiryUpdate {
        status: body.status,
        admin_notes: body.admin_notes,
    };

    let updated = web::block(move || service.update(id, &update))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(InquiryResponse::from(updated)))
}
