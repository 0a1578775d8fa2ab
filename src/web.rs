//! Read-only web view: one route rendering today's schedule with
//! past/future status.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use tracing::{info, warn};

use crate::schedule::{self, time, AliasMap, Event, Store};

/// Default bind address, matching the original deployment.
pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

pub struct WebState {
    pub store: Store,
    pub aliases: AliasMap,
}

pub fn router(state: Arc<WebState>) -> Router {
    Router::new().route("/", get(today_page)).with_state(state)
}

/// Serve the view until shutdown.
pub async fn serve(addr: &str, state: Arc<WebState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "serving today view");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn today_page(State(state): State<Arc<WebState>>) -> Html<String> {
    let today = Local::now().format("%A").to_string();
    let now = Local::now().naive_local();

    let events = match schedule::load_view(&state.store, &state.aliases) {
        Ok(view) => view.events_of(&today).cloned().unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "failed to load schedule for web view");
            Vec::new()
        }
    };

    Html(render_today(&today, &events, now))
}

/// Whether an event's start has already passed, counting starts before
/// 5 AM as tonight rather than this morning.
fn is_past(event: &Event, now: NaiveDateTime) -> bool {
    let Some(start_t) = time::parse_clock(&event.start) else {
        return false;
    };
    let mut start = now.date().and_time(start_t);
    if start_t.hour() < time::DAY_ROLLOVER_HOUR {
        start += Duration::days(1);
    }
    start < now
}

fn render_today(today: &str, events: &[Event], now: NaiveDateTime) -> String {
    let mut rows = String::new();
    for event in events {
        // Unparseable starts are skipped rather than rendered wrong.
        if time::parse_clock(&event.start).is_none() {
            continue;
        }
        let class = if is_past(event, now) { "past" } else { "future" };
        rows.push_str(&format!(
            "    <li class=\"{}\"><span class=\"time\">{}</span> {}</li>\n",
            class,
            escape(&event.time_range()),
            escape(&event.label),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"60\">\n\
         <title>Schedule for {today}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 480px; margin: 2em auto; }}\n\
         ul {{ list-style: none; padding: 0; }}\n\
         li {{ padding: 0.4em 0.6em; border-bottom: 1px solid #eee; }}\n\
         li.past {{ color: #999; }}\n\
         .time {{ display: inline-block; min-width: 11em; }}\n\
         </style>\n</head>\n<body>\n\
         <h1>{today}</h1>\n<ul>\n{rows}</ul>\n</body>\n</html>\n",
        today = escape(today),
        rows = rows,
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
