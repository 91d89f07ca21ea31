//! Event loop feeding control-channel events to the controller.
//!
//! Events are handled strictly one at a time: each is run to completion
//! before the next is taken off the queue, so no session ever sees
//! concurrent mutation.

use std::sync::Arc;

use sdn_channel::{
    dispatch, ChannelConnection, ConnectionId, ConnectionListener, ControllerEvent,
    OutboundCommand, SwitchConnection,
};
use sdn_types::DatapathId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{L2SwitchError, Result};

/// Capacity of the inbound event queue.
pub const EVENT_QUEUE_DEPTH: usize = 1024;

/// Drains `events` into `listener` until the sender side closes.
///
/// Every new connection gets a [`ChannelConnection`] writing to `outbound`.
/// Returns the number of events handled.
pub async fn run_event_loop<L>(
    listener: &mut L,
    mut events: mpsc::Receiver<ControllerEvent>,
    outbound: mpsc::UnboundedSender<OutboundCommand>,
) -> usize
where
    L: ConnectionListener + ?Sized,
{
    info!(listener = listener.name(), "Event loop started");
    let mut handled = 0usize;

    while let Some(event) = events.recv().await {
        debug!(kind = event.kind(), "Dispatching event");
        let tx = outbound.clone();
        dispatch(listener, event, move |id: ConnectionId, dpid: DatapathId| {
            Arc::new(ChannelConnection::new(id, dpid, tx)) as Arc<dyn SwitchConnection>
        });
        handled += 1;
    }

    info!(handled, "Event feed closed, event loop exiting");
    handled
}

/// Decodes one line of the JSON-lines event feed.
///
/// Blank lines and lines starting with `#` yield `None`.
pub fn parse_event_line(line: &str, line_no: usize) -> Result<Option<ControllerEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| L2SwitchError::InvalidEvent {
            line: line_no,
            message: e.to_string(),
        })
}

/// Reads a JSON-lines event feed and queues each event.
///
/// Undecodable lines are logged and skipped. Returns the number of events
/// queued; stops early if the event loop has gone away.
pub async fn feed_events<R>(reader: R, events: mpsc::Sender<ControllerEvent>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut queued = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let event = match parse_event_line(&line, line_no) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "Skipping event");
                continue;
            }
        };

        if events.send(event).await.is_err() {
            warn!(line = line_no, "Event loop closed, stopping feed");
            break;
        }
        queued += 1;
    }

    Ok(queued)
}
