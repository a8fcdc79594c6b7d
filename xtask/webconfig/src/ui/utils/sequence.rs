use crate::api::{Ticket, View};
use std::collections::HashMap;

/// Issues request tickets and remembers the newest one per view, so a slow
/// reply to a superseded fetch cannot overwrite a newer one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    next_id: u64,
    latest: HashMap<View, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, view: Option<View>) -> Ticket {
        self.next_id += 1;
        let id = self.next_id;
        if let Some(view) = view {
            self.latest.insert(view, id);
        }
        Ticket { id, view }
    }

    /// Make every in-flight fetch for `view` stale without issuing a new one.
    pub fn supersede(&mut self, view: View) {
        self.next_id += 1;
        self.latest.insert(view, self.next_id);
    }

    /// Tickets without a view are always current.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        match ticket.view {
            Some(view) => self.latest.get(&view) == Some(&ticket.id),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChangeMode;

    #[test]
    fn test_only_latest_ticket_per_view_is_current() {
        let mut seq = RequestSequencer::new();
        let first = seq.issue(Some(View::Tree));
        let detail = seq.issue(Some(View::Detail));
        let second = seq.issue(Some(View::Tree));

        assert!(!seq.is_current(&first));
        assert!(seq.is_current(&second));
        assert!(seq.is_current(&detail));
    }

    #[test]
    fn test_supersede_invalidates_pending_fetch() {
        let mut seq = RequestSequencer::new();
        let detail = seq.issue(Some(View::Detail));
        seq.supersede(View::Detail);
        assert!(!seq.is_current(&detail));

        let next = seq.issue(Some(View::Detail));
        assert!(seq.is_current(&next));
    }

    #[test]
    fn test_ids_are_monotonic_and_views_independent() {
        let mut seq = RequestSequencer::new();
        let a = seq.issue(Some(View::ChangeList(ChangeMode::Session)));
        let b = seq.issue(Some(View::ChangeList(ChangeMode::All)));
        let m = seq.issue(None);

        assert!(a.id < b.id && b.id < m.id);
        assert!(seq.is_current(&a));
        assert!(seq.is_current(&b));
        assert!(seq.is_current(&m));
    }
}
