//! # docstore-service
//!
//! Business logic for the facility document store. One generic
//! [`DocumentService`] engine implements every folder and file operation for
//! an arbitrary category partition; [`DomainDocumentService`] fixes the
//! engine to one domain profile (main, lifeline, maintenance, contracts).
//!
//! Services follow constructor injection: repositories and the blob store
//! are passed in as `Arc` trait objects.

pub mod context;
pub mod domains;
pub mod engine;
pub mod validation;

pub use context::Actor;
pub use domains::{DocumentServices, DomainDocumentService};
pub use engine::{DocumentFilter, DocumentService, FileContent, UploadBlob};
