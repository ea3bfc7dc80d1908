use hugelist::{EstimateChanged, IndexRange, VirtualSizeChanged};

use crate::{LoadError, LoadId};

/// Notifications produced by the window manager, drained with
/// [`crate::WindowManager::take_events`].
///
/// `VirtualSizeChanged` is the one the scrollbar owner cares about: it is emitted only
/// when the capped scroll extent actually changed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    VirtualSizeChanged(VirtualSizeChanged),
    EstimateChanged(EstimateChanged),
    LoadFailed {
        id: LoadId,
        range: IndexRange,
        error: LoadError,
    },
}

/// Statistics of a full render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebuildStats {
    pub created: usize,
    pub recycled: usize,
    /// Items whose template failed; retried on the next pass.
    pub failed: usize,
    /// Load requests issued to the data source.
    pub requested: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    Destroyed,
    /// The source reports items but holds none yet.
    AwaitingData,
    /// Nothing changed since the last pass.
    Idle,
}

/// Which path a render pass (or tick) took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderOutcome {
    Skipped(SkipReason),
    /// Range unchanged and fully rendered: only positions were refreshed.
    Repositioned { placed: usize },
    Rebuilt(RebuildStats),
}
