//! Host bootstrap: the long-lived bridge between the compiled UI application
//! and the scroll surface it runs on.
//!
//! The UI application's outbound ports are modeled as one typed message enum
//! delivered over a broadcast channel; the handler is a pure function from
//! message to scroll command, so everything here runs without a real document.

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::broadcast;

/// Outbound signals from the UI application, tagged with the port names it
/// publishes under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiMessage {
    /// Scroll an element so that `left`/`top` fractions of its scrollable
    /// extent are reached. An absent axis is left unchanged.
    #[serde(rename_all = "camelCase")]
    SmoothScrollToPercentage {
        dom_id: String,
        left: Option<f64>,
        top: Option<f64>,
    },
    /// Scroll the document to its full height
    ScrollToBottom,
}

/// Scrollable extent of an element, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollExtent {
    pub width: f64,
    pub height: f64,
}

/// A concrete smooth-scroll request, in pixels
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollCommand {
    Element {
        dom_id: String,
        left: Option<f64>,
        top: Option<f64>,
    },
    /// Document scroll to its height as measured at apply time
    DocumentBottom,
}

/// The scroll-capable abstraction the bootstrap drives. Implemented over the
/// real document by the embedding runtime; tests inject a recorder.
pub trait ScrollSurface {
    /// Scrollable extent of the element with this id, if it exists
    fn scroll_extent(
        &self,
        dom_id: &str,
    ) -> Option<ScrollExtent>;

    /// Perform a smooth scroll now
    fn smooth_scroll(
        &mut self,
        command: ScrollCommand,
    );

    /// Queue a smooth scroll to run after the current render pass settles
    /// (one animation frame later). There is no cancellation; queueing twice
    /// runs both, and the later one wins visually.
    fn defer_one_frame(
        &mut self,
        command: ScrollCommand,
    );
}

/// Translate one message into the scroll command it asks for. Returns `None`
/// when the target element does not exist.
pub fn resolve_message(
    msg: &UiMessage,
    surface: &impl ScrollSurface,
) -> Option<ScrollCommand> {
    match msg {
        UiMessage::SmoothScrollToPercentage { dom_id, left, top } => {
            let extent = surface.scroll_extent(dom_id)?;
            Some(ScrollCommand::Element {
                dom_id: dom_id.clone(),
                left: left.map(|f| f * extent.width),
                top: top.map(|f| f * extent.height),
            })
        }
        UiMessage::ScrollToBottom => Some(ScrollCommand::DocumentBottom),
    }
}

/// Apply one message to the surface. Element scrolls run immediately; the
/// bottom scroll waits one frame so the UI application's own DOM mutations
/// settle first.
pub fn handle_message(
    msg: &UiMessage,
    surface: &mut impl ScrollSurface,
) {
    let Some(command) = resolve_message(msg, surface) else {
        tracing::debug!(?msg, "scroll target not found");
        return;
    };

    match command {
        cmd @ ScrollCommand::Element { .. } => surface.smooth_scroll(cmd),
        cmd @ ScrollCommand::DocumentBottom => surface.defer_one_frame(cmd),
    }
}

/// Handle for the UI side of the channel. Publishing is fire-and-forget: no
/// acknowledgment ever flows back.
#[derive(Debug, Clone)]
pub struct UiChannel {
    sender: broadcast::Sender<UiMessage>,
}

impl UiChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn publish(
        &self,
        msg: UiMessage,
    ) {
        // no receivers is fine; the page may not have finished booting
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiMessage> { self.sender.subscribe() }
}

impl Default for UiChannel {
    fn default() -> Self { Self::new() }
}

/// The bootstrap loop; one per page load. Runs until every `UiChannel` handle
/// has been dropped.
pub async fn run_host_bootstrap(
    mut receiver: broadcast::Receiver<UiMessage>,
    surface: &mut impl ScrollSurface,
) {
    loop {
        match receiver.recv().await {
            Ok(msg) => handle_message(&msg, surface),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // last write wins at the scroll-animation level anyway
                tracing::warn!(skipped, "scroll signals dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
