use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::{
    dto::sse::ServerEvent,
    error::ServiceError,
    state::{SharedState, broadcast::SnapshotChannel},
};

/// Open a dedicated channel handle for one remote display.
///
/// Refused once the control surface is closed: nothing would ever be published again.
pub fn subscribe_display(
    state: &SharedState,
) -> Result<(SnapshotChannel, broadcast::Receiver<String>), ServiceError> {
    if state.is_degraded() {
        return Err(ServiceError::Unavailable("control surface closed".into()));
    }
    let channel = state.open_channel();
    let receiver = channel
        .receiver()
        .ok_or_else(|| ServiceError::Unavailable("snapshot channel closed".into()))?;
    Ok((channel, receiver))
}

/// Convert a snapshot receiver into an SSE response, forwarding every published envelope
/// as a `state` event and releasing the channel handle once the client disconnects.
pub fn to_sse_stream(
    channel: SnapshotChannel,
    mut receiver: broadcast::Receiver<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let payload = ServerEvent::state(payload);
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // The next snapshot supersedes whatever was skipped.
                            warn!(skipped, "display stream lagged behind");
                            continue;
                        }
                    }
                }
            }
        }

        channel.close();
        info!(channel = channel.name(), "display SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
