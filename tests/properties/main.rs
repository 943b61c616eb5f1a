//! Property test suite entry point.

mod archive_tests;
mod document_tests;
