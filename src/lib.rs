//! Chronicle - A tamper-evident append-only ledger for short text messages
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - Hash-linked block chain: genesis, append, snapshot, validation
//! - [`digest`] - Canonical SHA-256 content digests
//!
//! ## Integration
//! - [`api`] - HTTP surface (axum), behind the `api` feature
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod digest;
pub mod ledger;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
