use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use super::client::ConfigApi;
use super::request::{Outgoing, Reply};

/// Runs requests on the tokio runtime and hands completed replies back to
/// the UI thread through a channel.
///
/// Requests are independent: nothing orders them, nothing cancels them.
pub struct Dispatcher<A: ConfigApi> {
    api: Arc<A>,
    tx: UnboundedSender<Reply>,
}

impl<A: ConfigApi> Dispatcher<A> {
    pub fn new(api: Arc<A>) -> (Self, UnboundedReceiver<Reply>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, tx }, rx)
    }

    pub fn dispatch(&self, outgoing: Outgoing) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        trace!(
            id = outgoing.ticket.id,
            method = ?outgoing.request.method(),
            path = %outgoing.request.path(),
            "dispatch"
        );

        tokio::spawn(async move {
            let outcome = api.execute(outgoing.request.clone()).await;
            if tx.send(Reply::new(outgoing, outcome)).is_err() {
                debug!("reply dropped, UI loop is gone");
            }
        });
    }

    pub fn dispatch_all(&self, outgoing: impl IntoIterator<Item = Outgoing>) {
        for item in outgoing {
            self.dispatch(item);
        }
    }
}
