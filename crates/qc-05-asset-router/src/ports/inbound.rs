//! Inbound port: route and dust queries offered to consuming modules.

use crate::domain::bitcoin::UnstakeAmount;
use crate::domain::errors::RouterResult;
use shared_types::{ChainId, TokenId};

pub trait RouteResolver: Send + Sync {
    /// Destination token for `from_token` on `to_chain`, if routed.
    fn get_route(&self, from_token: &TokenId, to_chain: &ChainId) -> Option<TokenId>;

    /// Net amount after the router's commission, checked against the dust limit.
    fn calc_unstake_request_amount(&self, script: &[u8], amount: u64) -> RouterResult<UnstakeAmount>;
}
