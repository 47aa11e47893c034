//! Bookpage - Profile store and relational-style query adapter.
//!
//! The booking page builder talks to its backend through a small
//! relational query vocabulary (`from(table).select(..).eq(..).single()`).
//! This crate serves that vocabulary from a document store, plus object
//! storage for uploads, realtime change notifications, and the profile
//! handlers built on top.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
