//! Common test utilities and helpers.
//!
//! - In-memory document provider and a recording commit backend
//! - Real PDF builders and inspection helpers for MuPDF-backed tests

#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_helpers;

pub use fixtures::*;
pub use pdf_helpers::*;
