//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac`] -- One extractor per permission flag in the role access matrix.

pub mod auth;
pub mod rbac;
