use std::cmp::Reverse;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::models::{Ticket, TicketView};

/// Билеты для отображения: самые поздние сеансы сверху, билеты без времени в конце.
pub fn prepare_tickets(tickets: Vec<Ticket>) -> Vec<TicketView> {
    let mut views: Vec<TicketView> = tickets.into_iter().map(TicketView::from).collect();
    views.sort_by_key(|t| (t.start_time.is_none(), Reverse(t.start_time)));
    views
}

#[derive(Debug, Default)]
pub struct MyTicketsView {
    pub tickets: Vec<TicketView>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl MyTicketsView {
    pub async fn load(&mut self, api: &ApiClient) {
        self.is_loading = true;
        match api.my_tickets().await {
            Ok(tickets) => {
                info!("Loaded {} tickets", tickets.len());
                self.tickets = prepare_tickets(tickets);
                self.error = None;
            }
            Err(e) => {
                error!("Failed to fetch tickets: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_undated_last() {
        let tickets: Vec<Ticket> = serde_json::from_value(serde_json::json!([
            {"id": 1, "screeningTime": "2026-10-01T10:00:00"},
            {"id": 2},
            {"id": 3, "startTime": "2026-11-01T10:00:00"},
        ]))
        .unwrap();
        let ids: Vec<String> = prepare_tickets(tickets).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}
