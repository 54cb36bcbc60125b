// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Authentication & Access Control Service
//!
//! Issues HMAC-signed refresh and access tokens for username/password
//! logins, and decides whether a token's role may call a given endpoint.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, claims, roles, extractors and middleware
//! - `config` - Environment configuration
//! - `repository` - User and access rule lookups (in-memory, cached)
//! - `service` - Login, refresh and access decision flows

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod state;
