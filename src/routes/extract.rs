// ABOUTME: Request extractors whose rejections render as AppError envelopes
// ABOUTME: ApiJson and ApiQuery wrap axum's Json and Query extractors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON body; malformed bodies become 400 envelopes
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string; malformed queries become 400 envelopes
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
