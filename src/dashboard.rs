use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::app::{App, Snapshot};
use crate::error::ActionError;
use crate::position::display_coordinate;

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/state", get(state_handler))
        .route("/location", post(location_handler))
        .route("/save", post(save_handler))
        .route("/alert/dismiss", post(dismiss_handler))
        .route("/ws", get(ws_handler))
        .with_state(app)
}

pub async fn start_dashboard(app: Arc<App>, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("[dashboard] listening on http://{}", addr);
    axum::serve(listener, router(app)).await
}

async fn index_handler(State(app): State<Arc<App>>) -> Html<String> {
    Html(render_page(&app.snapshot().await))
}

async fn state_handler(State(app): State<Arc<App>>) -> Json<Snapshot> {
    Json(app.snapshot().await)
}

// Actions run on their own task so a closed browser tab cannot cancel them halfway
async fn location_handler(State(app): State<Arc<App>>) -> Response {
    let joined = tokio::spawn(async move { app.get_location().await.map(|_| ()) }).await;
    finish_action(joined)
}

async fn save_handler(State(app): State<Arc<App>>) -> Response {
    let joined = tokio::spawn(async move { app.save_to_file().await.map(|_| ()) }).await;
    finish_action(joined)
}

async fn dismiss_handler(State(app): State<Arc<App>>) -> Redirect {
    app.dismiss_alert().await;
    Redirect::to("/")
}

fn finish_action(joined: Result<Result<(), ActionError>, JoinError>) -> Response {
    match joined {
        Ok(Ok(())) => Redirect::to("/").into_response(),
        Ok(Err(busy)) => {
            log::warn!("[dashboard] rejected: {}", busy);
            (StatusCode::CONFLICT, busy.to_string()).into_response()
        }
        Err(e) => {
            log::error!("[dashboard] action task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "action failed").into_response()
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, app))
}

/// Push the state revision to the page whenever it changes
async fn handle_socket(mut socket: WebSocket, app: Arc<App>) {
    let mut revisions = app.subscribe();

    loop {
        let revision = *revisions.borrow_and_update();
        if socket.send(Message::Text(revision.to_string())).await.is_err() {
            // Client disconnected
            break;
        }

        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

pub fn render_page(snapshot: &Snapshot) -> String {
    let state = &snapshot.state;
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Location Logger</title>\n{}</head>\n<body data-revision=\"{}\">\n<div class=\"section\">\n",
        include_str!("dashboard_static.html"),
        snapshot.revision
    );

    let _ = write!(
        html,
        "<div class=\"buttons\">\n\
         <form method=\"post\" action=\"/location\"><button type=\"submit\"{}>GET LOCATION</button></form>\n\
         <form method=\"post\" action=\"/save\"><button type=\"submit\"{}>SAVE LOCATIONS TO FILE</button></form>\n\
         </div>\n",
        disabled(snapshot.acquiring),
        disabled(!state.can_export() || snapshot.exporting)
    );

    if let Some(alert) = &state.alert {
        let _ = write!(
            html,
            "<div class=\"alert\" role=\"alert\"><p class=\"label\">{}</p><p>{}</p>\
             <form method=\"post\" action=\"/alert/dismiss\"><button type=\"submit\">OK</button></form></div>\n",
            escape_html(&alert.title),
            escape_html(&alert.message)
        );
    }

    if let Some(error) = &state.error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }

    if let Some(position) = &state.current_position {
        let _ = write!(
            html,
            "<div class=\"location-info\">\n<p class=\"label\">Current Location:</p>\n\
             <p>Longitude: {}</p>\n<p>Latitude: {}</p>\n<p>Accuracy: {} meters</p>\n</div>\n",
            position.longitude, position.latitude, position.accuracy
        );
    }

    if !state.history.is_empty() {
        let _ = write!(
            html,
            "<div class=\"history\">\n<p class=\"label\">Location History ({}):</p>\n",
            state.history.len()
        );
        for (index, entry) in state.history.iter().enumerate() {
            let _ = write!(
                html,
                "<div class=\"history-item\"><p>Location #{} ({})</p>\
                 <p>Lat: {}, Long: {}</p></div>\n",
                index + 1,
                entry.display_time(),
                display_coordinate(entry.reading.latitude),
                display_coordinate(entry.reading.longitude)
            );
        }
        html.push_str("</div>\n");
    }

    html.push_str("</div>\n</body>\n</html>\n");
    html
}
