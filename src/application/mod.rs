pub mod inquiry_service;
pub mod quote_service;

pub use inquiry_service::InquiryService;
pub use quote_service::QuoteService;
