//! Dashboard summary and notification feed endpoints.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::{NaiveDate, Utc};
use futures_util::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use super::{success, ApiQuery, ApiResult};
use crate::db::queries;
use crate::notifications::Notification;
use crate::scheduling::{dashboard_summary, DashboardSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub date: Option<NaiveDate>,
}

/// GET /api/dashboard - Headline figures for a day, today by default.
pub async fn get_dashboard(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DashboardParams>,
) -> ApiResult<DashboardSummary> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let shifts = queries::shifts_by_date(state.stores.shifts.as_ref(), date).await?;
    let employees = state.stores.employees.get_all().await?;
    success(dashboard_summary(date, &shifts, &employees))
}

/// GET /api/notifications - Recent outcome notifications, newest last.
pub async fn list_notifications(State(state): State<AppState>) -> ApiResult<Vec<Notification>> {
    success(state.notifier.recent())
}

/// GET /api/notifications/stream - Live notifications as server-sent events.
///
/// A subscriber that falls behind skips the notifications it missed.
pub async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.notifier.subscribe();
    let events = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(notification) => {
                    let event = notification_event(&notification);
                    return Some((Ok::<_, Infallible>(event), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Notification stream lagged, skipped {}", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn notification_event(notification: &Notification) -> Event {
    let event = Event::default().event(notification.kind());
    match serde_json::to_string(notification) {
        Ok(data) => event.data(data),
        Err(err) => {
            tracing::error!("Could not encode notification: {}", err);
            event.data(notification.message())
        }
    }
}
