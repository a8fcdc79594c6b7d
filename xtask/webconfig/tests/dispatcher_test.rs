use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use webconfig::api::{
    ApiRequest, ApiResponse, ConfigApi, Dispatcher, MenuItem, Outgoing, Stats, Ticket, View,
};
use webconfig::config::ClientConfig;
use webconfig::error::{Result, WebConfigError};
use webconfig::ui::state::{Liveness, WebConfigState};

/// Answers from a fixed script, optionally after a per-path delay.
#[derive(Default)]
struct ScriptedApi {
    delays: HashMap<String, Duration>,
    seen: Mutex<Vec<ApiRequest>>,
    fail_heartbeat: bool,
}

impl ConfigApi for ScriptedApi {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        if let Some(delay) = self.delays.get(&request.path()) {
            tokio::time::sleep(*delay).await;
        }
        self.seen.lock().unwrap().push(request.clone());

        match request {
            ApiRequest::MenuTree { .. } => Ok(ApiResponse::MenuTree(vec![MenuItem::symbol_stub(
                "SMP", "y",
            )])),
            ApiRequest::Stats => Ok(ApiResponse::Stats(Stats {
                total_symbols: 42,
                ..Stats::default()
            })),
            ApiRequest::Heartbeat if self.fail_heartbeat => {
                Err(WebConfigError::Connection("server gone".to_string()))
            }
            ApiRequest::Heartbeat => Ok(ApiResponse::Heartbeat),
            other => Err(WebConfigError::UnexpectedResponse(other.path())),
        }
    }
}

fn outgoing(id: u64, view: Option<View>, request: ApiRequest) -> Outgoing {
    Outgoing { ticket: Ticket { id, view }, request }
}

#[tokio::test]
async fn test_replies_come_back_with_their_ticket() {
    let api = Arc::new(ScriptedApi::default());
    let (dispatcher, mut replies) = Dispatcher::new(Arc::clone(&api));

    dispatcher.dispatch(outgoing(7, Some(View::Stats), ApiRequest::Stats));
    let reply = replies.recv().await.unwrap();

    assert_eq!(reply.ticket.id, 7);
    assert_eq!(reply.request, ApiRequest::Stats);
    assert!(matches!(reply.outcome, Ok(ApiResponse::Stats(ref s)) if s.total_symbols == 42));
}

#[tokio::test]
async fn test_requests_run_concurrently() {
    let mut delays = HashMap::new();
    delays.insert("/api/menu_tree".to_string(), Duration::from_millis(200));
    let api = Arc::new(ScriptedApi { delays, ..ScriptedApi::default() });
    let (dispatcher, mut replies) = Dispatcher::new(Arc::clone(&api));

    dispatcher.dispatch_all([
        outgoing(1, Some(View::Tree), ApiRequest::MenuTree { show_all: false }),
        outgoing(2, Some(View::Stats), ApiRequest::Stats),
    ]);

    // the slow tree fetch does not hold back the stats reply
    let first = replies.recv().await.unwrap();
    assert_eq!(first.ticket.id, 2);
    let second = replies.recv().await.unwrap();
    assert_eq!(second.ticket.id, 1);
}

#[tokio::test]
async fn test_state_round_trip_through_dispatcher() {
    let api = Arc::new(ScriptedApi::default());
    let (dispatcher, mut replies) = Dispatcher::new(Arc::clone(&api));
    let mut state = WebConfigState::new(&ClientConfig::default());

    state.load_menu_tree();
    state.refresh_stats();
    dispatcher.dispatch_all(state.take_outgoing());

    for _ in 0..2 {
        let reply = replies.recv().await.unwrap();
        state.apply_reply(reply);
    }

    assert_eq!(state.menu_tree().len(), 1);
    assert_eq!(state.stats().map(|s| s.total_symbols), Some(42));
}

#[tokio::test]
async fn test_failed_heartbeat_marks_connection_lost() {
    let api = Arc::new(ScriptedApi { fail_heartbeat: true, ..ScriptedApi::default() });
    let (dispatcher, mut replies) = Dispatcher::new(Arc::clone(&api));
    let mut state = WebConfigState::new(&ClientConfig::default());

    let start = std::time::Instant::now();
    state.start(start);
    state.take_outgoing();
    state.heartbeat_tick(start + Duration::from_secs(5));
    dispatcher.dispatch_all(state.take_outgoing());

    state.apply_reply(replies.recv().await.unwrap());
    assert_eq!(state.liveness(), Liveness::Lost);

    state.heartbeat_tick(start + Duration::from_secs(10));
    assert!(state.take_outgoing().is_empty());
    assert_eq!(api.seen.lock().unwrap().len(), 1);
}
