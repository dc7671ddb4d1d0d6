use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    proxy::ProxyClient,
    services::{FeedAssembler, LikeLedger},
    store::{PostStore, UserStore},
    utils::{auth_client::AuthClient, jwt::TokenCodec},
};

#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenCodec,
}

impl FromRef<AuthState> for Arc<dyn UserStore> {
    fn from_ref(state: &AuthState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AuthState> for TokenCodec {
    fn from_ref(state: &AuthState) -> Self {
        state.tokens.clone()
    }
}

#[derive(Clone)]
pub struct PostState {
    pub store: Arc<dyn PostStore>,
    pub auth: AuthClient,
    pub ledger: LikeLedger,
    pub feed: FeedAssembler,
}

impl PostState {
    pub fn new(store: Arc<dyn PostStore>, auth: AuthClient) -> Self {
        Self {
            ledger: LikeLedger::new(store.clone()),
            feed: FeedAssembler::new(store.clone()),
            store,
            auth,
        }
    }
}

impl FromRef<PostState> for Arc<dyn PostStore> {
    fn from_ref(state: &PostState) -> Self {
        state.store.clone()
    }
}

impl FromRef<PostState> for AuthClient {
    fn from_ref(state: &PostState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<PostState> for LikeLedger {
    fn from_ref(state: &PostState) -> Self {
        state.ledger.clone()
    }
}

impl FromRef<PostState> for FeedAssembler {
    fn from_ref(state: &PostState) -> Self {
        state.feed.clone()
    }
}

#[derive(Clone)]
pub struct GatewayState {
    pub proxy: Arc<ProxyClient>,
}
