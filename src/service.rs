//! Request/response boundary between transports and the store.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::{MatchResult, Store};

/// A request carrying the word to match and store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub text: String,
}

/// The closest stored words, `None` when nothing was stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub value: Option<String>,
    pub lexical: Option<String>,
}

impl From<MatchResult> for MatchResponse {
    fn from(result: MatchResult) -> Self {
        MatchResponse {
            value: result.closest_by_value,
            lexical: result.closest_lexically,
        }
    }
}

/// Run one request against the store.
pub fn handle_request(store: &Store, request: &MatchRequest) -> Result<MatchResponse> {
    store.handle(&request.text).map(MatchResponse::from)
}
