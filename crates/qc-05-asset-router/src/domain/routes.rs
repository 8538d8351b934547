//! # Route Table
//!
//! `(fromToken, toChain) -> toToken`, with the source chain recorded.
//! Each direction is its own entry; absence means the operation is refused.

use shared_types::{ChainId, TokenId};
use std::collections::HashMap;

/// A registered mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub from_token: TokenId,
    pub from_chain: ChainId,
    pub to_token: TokenId,
    pub to_chain: ChainId,
}

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: HashMap<(TokenId, ChainId), Route>,
    named: HashMap<String, TokenId>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous route, if any.
    pub fn set_route(&mut self, route: Route) -> Option<Route> {
        self.routes.insert((route.from_token, route.to_chain), route)
    }

    pub fn remove_route(&mut self, from_token: &TokenId, to_chain: &ChainId) -> Option<Route> {
        self.routes.remove(&(*from_token, *to_chain))
    }

    /// Destination token for `from_token` on `to_chain`.
    pub fn get_route(&self, from_token: &TokenId, to_chain: &ChainId) -> Option<TokenId> {
        self.route(from_token, to_chain).map(|r| r.to_token)
    }

    pub fn route(&self, from_token: &TokenId, to_chain: &ChainId) -> Option<&Route> {
        self.routes.get(&(*from_token, *to_chain))
    }

    pub fn set_named_token(&mut self, name: impl Into<String>, token: TokenId) -> Option<TokenId> {
        self.named.insert(name.into(), token)
    }

    pub fn named_token(&self, name: &str) -> Option<TokenId> {
        self.named.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
