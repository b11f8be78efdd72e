//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, INSERT, UPDATE and DELETE rendering
//! - `dialects`: quoting, placeholders, limits and functions per dialect
//! - `features`: DDL, procedures and multi-statement scripts

mod dialects;
mod features;
