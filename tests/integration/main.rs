//! Integration test suite entry point.

mod fs_store_tests;
mod legacy_tests;
mod library_tests;
mod package_tests;
