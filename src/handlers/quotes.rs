use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::QuoteService;
use crate::auth::AdminSession;
use crate::domain::quote::{CreateQuoteRequest, QuoteItem, QuoteRequest, QuoteStatusUpdate};
use crate::domain::status::QuoteStatus;
use crate::errors::{AppError, ErrorResponse};

use super::{total_pages, ListParams};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteItemResponse {
    pub catalog_item_id: String,
    pub quantity: i32,
    pub name: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequestResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_location: Option<String>,
    pub guest_count: Option<i32>,
    pub items: Vec<QuoteItemResponse>,
    pub message: Option<String>,
    pub status: QuoteStatus,
    /// Decimal as a string to avoid floating-point issues, e.g. "2400.00"
    pub total_estimate: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuoteItem> for QuoteItemResponse {
    fn from(item: QuoteItem) -> Self {
        Self {
            catalog_item_id: item.catalog_item_id,
            quantity: item.quantity,
            name: item.name,
            thumbnail: item.thumbnail,
        }
    }
}

impl From<QuoteRequest> for QuoteRequestResponse {
    fn from(r: QuoteRequest) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            company: r.company,
            event_type: r.event_type,
            event_date: r.event_date,
            event_location: r.event_location,
            guest_count: r.guest_count,
            items: r.items.into_iter().map(QuoteItemResponse::from).collect(),
            message: r.message,
            status: r.status,
            total_estimate: r.total_estimate.map(|e| e.to_string()),
            admin_notes: r.admin_notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequestPage {
    pub items: Vec<QuoteRequestResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuoteRequestBody {
    pub status: Option<QuoteStatus>,
    pub admin_notes: Option<String>,
    /// Accepts a JSON number or a decimal string.
    #[schema(value_type = Option<String>)]
    pub total_estimate: Option<BigDecimal>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /quote-requests
///
/// Public submission of a quote basket. The payload is validated before it
/// reaches the store; a replayed `idempotency_key` returns the stored record
/// with 200 instead of creating a duplicate.
#[utoipa::path(
    post,
    path = "/quote-requests",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote request recorded", body = QuoteRequestResponse),
        (status = 200, description = "Idempotent replay of an earlier submission", body = QuoteRequestResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Could not be saved, retry later", body = ErrorResponse),
    ),
    tag = "quote-requests"
)]
pub async fn create_quote_request(
    service: web::Data<QuoteService>,
    body: web::Json<CreateQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let recorded = web::block(move || service.submit(&body))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let response = QuoteRequestResponse::from(recorded.request);
    if recorded.replayed {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::Created().json(response))
    }
}

/// GET /admin/quote-requests
///
/// Paginated quote requests, most recent first.
#[utoipa::path(
    get,
    path = "/admin/quote-requests",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("search" = Option<String>, Query, description = "Matches name, email, phone or company"),
        ("status" = Option<QuoteStatus>, Query, description = "Only requests in this status"),
    ),
    responses(
        (status = 200, description = "Paginated list of quote requests", body = QuoteRequestPage),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "quote-requests"
)]
pub async fn list_quote_requests(
    _admin: AdminSession,
    service: web::Data<QuoteService>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter::<QuoteStatus>()?;
    let (page, limit) = (filter.page, filter.limit);

    let result = web::block(move || service.list(&filter))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(QuoteRequestPage {
        items: result
            .items
            .into_iter()
            .map(QuoteRequestResponse::from)
            .collect(),
        total: result.total,
        page,
        limit,
        total_pages: total_pages(result.total, limit),
    }))
}

/// GET /admin/quote-requests/{id}
#[utoipa::path(
    get,
    path = "/admin/quote-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote request UUID"),
    ),
    responses(
        (status = 200, description = "Quote request found", body = QuoteRequestResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
        (status = 404, description = "Quote request not found", body = ErrorResponse),
    ),
    tag = "quote-requests"
)]
pub async fn get_quote_request(
    _admin: AdminSession,
    service: web::Data<QuoteService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let request = web::block(move || service.get(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(QuoteRequestResponse::from(request)))
}

/// PATCH /admin/quote-requests/{id}
///
/// Staff update of `status`, `admin_notes` and `total_estimate`. Omitted
/// fields keep their stored value.
#[utoipa::path(
    patch,
    path = "/admin/quote-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote request UUID"),
    ),
    request_body = UpdateQuoteRequestBody,
    responses(
        (status = 200, description = "Quote request updated", body = QuoteRequestResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Session lacks the admin role", body = ErrorResponse),
        (status = 404, description = "Quote request not found", body = ErrorResponse),
        (status = 409, description = "Status change not allowed", body = ErrorResponse),
    ),
    tag = "quote-requests"
)]
pub async fn update_quote_request(
    admin: AdminSession,
    service: web::Data<QuoteService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateQuoteRequestBody>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let update = QuoteStatusUpdate {
        status: body.status,
        admin_notes: body.admin_notes,
        total_estimate: body.total_estimate,
    };

    let updated = web::block(move || service.update_status(id, &update))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    log::info!(
        "Staff {} updated quote request {} (status {})",
        admin.claims.sub,
        id,
        updated.status
    );
    Ok(HttpResponse::Ok().json(QuoteRequestResponse::from(updated)))
}
