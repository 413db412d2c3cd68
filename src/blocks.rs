//! Code block bridge: keeps a marker element's rendered content in sync with
//! its `language` attribute and text payload.
//!
//! Variant selection is a pure function of the attribute value; mounting goes
//! through the `BlockMounter` seam so the whole lifecycle can be exercised
//! without a DOM.

use serde::Serialize;

/// The component variant mounted into a marker element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Syntax highlighted, non-interactive
    #[default]
    Highlighted,
    /// Editable/runnable JavaScript block
    InteractiveJs,
    /// Editable/runnable Elm block
    InteractiveElm,
}

impl BlockKind {
    /// Select the variant for a `language` attribute value. Anything
    /// unrecognized (or no attribute at all) falls back to plain
    /// highlighting.
    pub fn from_language(language: Option<&str>) -> Self {
        match language {
            Some("js-interactive") => Self::InteractiveJs,
            Some("elm-interactive") => Self::InteractiveElm,
            _ => Self::Highlighted,
        }
    }
}

/// Immutable initialization input handed to the mounted component, i.e. the
/// `flags` object crossing the UI application boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockPayload {
    pub language: Option<String>,
    pub code: String,
}

/// Marker element state as read at mount time. Recomputed on every attach or
/// attribute change, never cached.
#[derive(Debug, Clone, Default)]
pub struct MarkerElement {
    /// The observed `language` attribute
    pub language: Option<String>,
    /// The element's own text content, used as the code payload
    pub text: Option<String>,
}

impl MarkerElement {
    pub fn payload(&self) -> BlockPayload {
        BlockPayload {
            language: self.language.clone(),
            // an empty marker still mounts, with an empty code block
            code: self.text.clone().unwrap_or_default(),
        }
    }
}

/// Seam to whatever actually instantiates components. The embedding runtime
/// implements this over the real document; tests record calls instead.
pub trait BlockMounter {
    /// Discard whatever is currently mounted, create one fresh child
    /// container, and mount a `kind` component initialized with `payload`.
    fn mount(
        &mut self,
        kind: BlockKind,
        payload: &BlockPayload,
    );
}

/// Adapter driving one marker element. Both first attachment and every
/// `language` attribute change funnel into `remount`.
pub struct BlockBridge<M: BlockMounter> {
    mounter: M,
}

impl<M: BlockMounter> BlockBridge<M> {
    pub fn new(mounter: M) -> Self { Self { mounter } }

    /// Destructive remount: the previous mount's internal state is discarded.
    /// Acceptable because mounts are cheap and attribute changes only happen
    /// at authoring time.
    pub fn remount(
        &mut self,
        marker: &MarkerElement,
    ) -> BlockKind {
        let payload = marker.payload();
        let kind = BlockKind::from_language(payload.language.as_deref());
        self.mounter.mount(kind, &payload);
        kind
    }
}
