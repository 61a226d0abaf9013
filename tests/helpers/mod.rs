// ABOUTME: Test helper modules shared by integration tests
// ABOUTME: Exposes the in-process axum request builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(dead_code)]

pub mod axum_test;
