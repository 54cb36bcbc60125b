// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::repository::{AccessRuleLookup, UserLookup};
use crate::service::{AccessService, AuthService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub access: Arc<AccessService>,
}

impl AppState {
    pub fn new(
        codec: Arc<TokenCodec>,
        users: Arc<dyn UserLookup>,
        rules: Arc<dyn AccessRuleLookup>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, codec.clone())),
            access: Arc::new(AccessService::new(rules, codec)),
        }
    }
}
