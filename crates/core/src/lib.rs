//! Pure domain logic for the facility map platform.
//!
//! This crate has no database or HTTP dependencies. It provides:
//!
//! - Upload intake validation and conversion status constants (`intake`)
//! - The external blueprint converter invocation (`convert`)
//! - The layer/viewport visibility composition engine (`composition`)
//! - The role/permission capability gate (`permissions`)

pub mod composition;
pub mod convert;
pub mod error;
pub mod intake;
pub mod permissions;
pub mod types;
