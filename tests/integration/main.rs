//! Integration tests for the document engine and domain services.

mod helpers;

mod atomicity_test;
mod file_test;
mod folder_test;
mod isolation_test;
mod listing_test;
