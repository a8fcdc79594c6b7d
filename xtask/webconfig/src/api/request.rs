//! Requests the client issues, their replies, and the envelope that ties a
//! reply back to the view it was issued for.

use super::types::{
    ChangeMode, ChangeSet, MenuItem, MutationReply, PersistReply, ResetKind, SearchHit, Stats,
    SymbolDetail,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    MenuTree { show_all: bool },
    Symbol { name: String },
    Changes { mode: ChangeMode },
    Search { query: String },
    Stats,
    SetValue { symbol: String, value: String },
    ResetSymbol { symbol: String, kind: Option<ResetKind> },
    SaveConfig { filename: Option<String> },
    LoadConfig { filename: String },
    SaveAndExit,
    Heartbeat,
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        match self {
            ApiRequest::MenuTree { .. }
            | ApiRequest::Symbol { .. }
            | ApiRequest::Changes { .. }
            | ApiRequest::Search { .. }
            | ApiRequest::Stats => Method::Get,
            _ => Method::Post,
        }
    }

    /// Endpoint path without the query string.
    pub fn path(&self) -> String {
        match self {
            ApiRequest::MenuTree { .. } => "/api/menu_tree".to_string(),
            ApiRequest::Symbol { name } => format!("/api/symbol/{}", name),
            ApiRequest::Changes { .. } => "/api/changes".to_string(),
            ApiRequest::Search { .. } => "/api/search".to_string(),
            ApiRequest::Stats => "/api/stats".to_string(),
            ApiRequest::SetValue { .. } => "/api/set_value".to_string(),
            ApiRequest::ResetSymbol { .. } => "/api/reset_symbol".to_string(),
            ApiRequest::SaveConfig { .. } => "/api/save_config".to_string(),
            ApiRequest::LoadConfig { .. } => "/api/load_config".to_string(),
            ApiRequest::SaveAndExit => "/api/save_and_exit".to_string(),
            ApiRequest::Heartbeat => "/api/heartbeat".to_string(),
        }
    }

    /// Query parameters, already as key/value pairs for the HTTP client to encode.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiRequest::MenuTree { show_all } => vec![("show_all", show_all.to_string())],
            ApiRequest::Changes { mode } => vec![("mode", mode.as_str().to_string())],
            ApiRequest::Search { query } => vec![("q", query.clone())],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    MenuTree(Vec<MenuItem>),
    Symbol(SymbolDetail),
    Changes(ChangeSet),
    Search(Vec<SearchHit>),
    Stats(Stats),
    Mutation(MutationReply),
    Persist(PersistReply),
    Heartbeat,
}

/// A page region whose content is replaced by a fetch.
///
/// Only the most recent fetch per view may paint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Tree panel; search results paint the same region.
    Tree,
    Detail,
    ChangeList(ChangeMode),
    ChangeCount(ChangeMode),
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    /// `None` for mutations and heartbeats, which are never superseded.
    pub view: Option<View>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub ticket: Ticket,
    pub request: ApiRequest,
}

#[derive(Debug)]
pub struct Reply {
    pub ticket: Ticket,
    pub request: ApiRequest,
    pub outcome: Result<ApiResponse>,
}

impl Reply {
    pub fn new(outgoing: Outgoing, outcome: Result<ApiResponse>) -> Self {
        Self {
            ticket: outgoing.ticket,
            request: outgoing.request,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_methods() {
        let req = ApiRequest::Symbol { name: "SMP".to_string() };
        assert_eq!(req.path(), "/api/symbol/SMP");
        assert_eq!(req.method(), Method::Get);

        let req = ApiRequest::Heartbeat;
        assert_eq!(req.path(), "/api/heartbeat");
        assert_eq!(req.method(), Method::Post);
    }

    #[test]
    fn test_query_pairs() {
        assert_eq!(
            ApiRequest::MenuTree { show_all: true }.query(),
            vec![("show_all", "true".to_string())]
        );
        assert_eq!(
            ApiRequest::Changes { mode: ChangeMode::All }.query(),
            vec![("mode", "all".to_string())]
        );
        assert!(ApiRequest::SaveAndExit.query().is_empty());
    }
}
