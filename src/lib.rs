//! PADDOCK: Racehorse lease valuation and syndicator onboarding.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod valuation;
pub mod records;
pub mod onboarding;
pub mod storage;
pub mod studio;
pub mod server;
