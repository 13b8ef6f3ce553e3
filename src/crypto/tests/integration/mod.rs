//! Integration tests for complete send/receive workflows

pub mod property_tests;
