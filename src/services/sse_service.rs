//! Realtime board feed over Server-Sent Events.
//!
//! Each session owns a watch channel carrying its latest board snapshot; a
//! forwarder task turns it into an SSE stream. The receiver always holds the
//! current snapshot, so a reconnecting client immediately receives full state
//! and the stream is restartable at any point.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::{
    dto::{board::BoardSnapshot, session::SaveStatusResponse},
    state::session::SessionState,
};

const EVENT_BOARD: &str = "board";
const EVENT_SAVE_STATUS: &str = "save_status";

/// Open an SSE stream mirroring one session's board and save indicator.
///
/// The stream opens with the current board and status, then forwards every
/// change until the client disconnects.
pub fn board_stream(
    session: Arc<SessionState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut board_rx = session.subscribe_board();
    let mut status_rx = session.save_status_watcher();

    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        let initial_board = BoardSnapshot::from(&*board_rx.borrow_and_update());
        if forward(&tx, EVENT_BOARD, &initial_board).await.is_err() {
            return;
        }
        let initial_status = SaveStatusResponse {
            status: *status_rx.borrow_and_update(),
        };
        if forward(&tx, EVENT_SAVE_STATUS, &initial_status).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                changed = board_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = BoardSnapshot::from(&*board_rx.borrow_and_update());
                    if forward(&tx, EVENT_BOARD, &snapshot).await.is_err() {
                        break;
                    }
                }
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = SaveStatusResponse {
                        status: *status_rx.borrow_and_update(),
                    };
                    if forward(&tx, EVENT_SAVE_STATUS, &status).await.is_err() {
                        break;
                    }
                }
            }
        }

        info!(session = %session.id, "board stream disconnected");
    });

    // response stream reads from mpsc; axum drops it when the client goes away
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Serialize and send one named event; an error means the client is gone.
async fn forward<T: Serialize>(
    tx: &mpsc::Sender<Result<Event, Infallible>>,
    name: &str,
    payload: &T,
) -> Result<(), ()> {
    let data = match serde_json::to_string(payload) {
        Ok(data) => data,
        Err(err) => {
            warn!(event = name, error = %err, "failed to serialize SSE payload");
            return Ok(());
        }
    };
    tx.send(Ok(Event::default().event(name).data(data)))
        .await
        .map_err(|_| ())
}
