//! Extractors with `AppError` rejections

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body whose decode failures surface as 400 `AppError::Validation`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
