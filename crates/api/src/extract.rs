//! Request extractors whose rejections use the JSON error envelope.
//!
//! Axum's stock `Json`, `Query`, and `Path` reject malformed input with a
//! plain-text body. These wrappers route the rejection through [`AppError`]
//! so clients always receive `{ "error": ..., "code": ... }`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
