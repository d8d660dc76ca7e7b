//! Shared test helpers for `pinsync-core` integration tests.
//!
//! In-memory mocks for the core ports plus appointment fixtures, so the
//! reconciliation tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fixtures;
pub mod lock;
pub mod logs;
pub mod scheduling;
