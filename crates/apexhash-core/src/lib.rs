//! Core types and trait definitions for the ApexHash lead-capture backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Record schemas, payload validation and the document-creation service live
//! here; storage backends implement [`store::DocumentStore`].

pub mod error;
pub mod record;
pub mod service;
pub mod store;

pub use error::{Error, Result};
pub use record::{ContactLead, Email, PlanInquiry, Record, RecordKind};
pub use service::{create_document, create_record};
pub use store::{Document, DocumentId, DocumentStore};
