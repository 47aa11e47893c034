//! Domain layer containing pure types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, validation errors)
//! - `profile` - The booking page document and its typed nested content
//! - `query` - Relational query vocabulary and the `{data, error}` shape
//! - `storage` - Buckets, object paths and filename sanitization

pub mod foundation;
pub mod profile;
pub mod query;
pub mod storage;
