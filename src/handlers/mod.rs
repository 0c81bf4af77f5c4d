pub mod inquiries;
pub mod quotes;

use std::str::FromStr;

use actix_web::{error, web, HttpRequest};
use serde::Deserialize;
use utoipa::OpenApi;

use crate::domain::quote::ListFilter;
use crate::domain::validation::{self, FieldErrors};
use crate::errors::{AppError, ErrorResponse};

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Free-text match on name, email, phone and company.
    pub search: Option<String>,
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl ListParams {
    pub fn into_filter<S>(self) -> Result<ListFilter<S>, AppError>
    where
        S: FromStr,
        S::Err: std::fmt::Display,
    {
        let mut filter = ListFilter::new(self.page, self.limit);
        filter.search = self.search;
        filter.status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<S>().map_err(|e| {
                let mut fields = FieldErrors::new();
                validation::push(&mut fields, "status", e.to_string());
                AppError::Validation(fields)
            })?),
        };
        Ok(filter)
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

// ── Extractor configuration ──────────────────────────────────────────────────

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn path_error(_err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound.into()
}

/// Registers every route plus the extractor error handlers. Callers provide
/// `web::Data<QuoteService>`, `web::Data<InquiryService>` and
/// `web::Data<SessionKeys>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(64 * 1024)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error))
    .service(
        web::scope("/quote-requests").route("", web::post().to(quotes::create_quote_request)),
    )
    .service(web::scope("/inquiries").route("", web::post().to(inquiries::create_inquiry)))
    .service(
        web::scope("/admin")
            .route("/quote-requests", web::get().to(quotes::list_quote_requests))
            .route("/quote-requests/{id}", web::get().to(quotes::get_quote_request))
            .route(
                "/quote-requests/{id}",
                web::patch().to(quotes::update_quote_request),
            )
            .route("/inquiries", web::get().to(inquiries::list_inquiries))
            .route("/inquiries/{id}", web::get().to(inquiries::get_inquiry))
            .route("/inquiries/{id}", web::patch().to(inquiries::update_inquiry)),
    );
}

#[derive(OpenApi)]
#[openapi(
    paths(
        quotes::create_quote_request,
        quotes::list_quote_requests,
        quotes::get_quote_request,
        quotes::update_quote_request,
        inquiries::create_inquiry,
        inquiries::list_inquiries,
        inquiries::get_inquiry,
        inquiries::update_inquiry,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "quote-requests", description = "Rental quote submissions and staff review"),
        (name = "inquiries", description = "Contact-form inquiries and staff review"),
    )
)]
pub struct ApiDoc;
