//! Core upload logic for Stowage.
//!
//! This crate contains the pieces with actual behavior: obtaining a Drive
//! session, materializing folder paths and orchestrating uploads. It has no
//! web framework dependencies.
//!
//! # Modules
//!
//! - `credential` - Service-account sessions for the Drive API
//! - `storage` - Drive API contract, HTTP client and in-memory emulation
//! - `folder` - Folder paths and idempotent folder materialization
//! - `upload` - Upload orchestration and filename policies

pub mod credential;
pub mod folder;
pub mod storage;
pub mod upload;
