//! Shared request state

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::JwtKeys;
use crate::store::BankStore;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BankStore>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn BankStore>, jwt: JwtKeys) -> Self {
        Self { store, jwt }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
