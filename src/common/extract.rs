// src/common/extract.rs
//
// Wrappers over the stock axum extractors whose rejections are rendered as
// the usual `{"error": ...}` JSON body instead of plain text.

use axum::extract::{FromRequest, FromRequestParts};

use crate::common::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
