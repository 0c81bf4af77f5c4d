pub mod inquiry_repo;
pub mod memory;
pub mod models;
pub mod quote_repo;

pub use inquiry_repo::DieselInquiryRepository;
pub use memory::{InMemoryInquiryRepository, InMemoryQuoteRequestRepository};
pub use quote_repo::DieselQuoteRequestRepository;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

/// `%term%` for ILIKE, with the pattern metacharacters of `term` escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
