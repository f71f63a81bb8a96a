//! Error types for hookcell-core

use thiserror::Error;

use crate::cell::CellKind;
use crate::target::TargetId;

/// Errors raised by hook calls, setters and the render driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HookError {
    /// A hook was called while no render pass was active for its target
    #[error("invalid hook call: hooks can only be called during a render pass")]
    InvalidHookCall,

    /// The cell at `slot` was created by a different hook (or holds a different value type)
    #[error("hook order mismatch at slot {slot}: expected {expected}, found {found}")]
    HookOrderMismatch {
        slot: usize,
        expected: CellKind,
        found: CellKind,
    },

    /// A pass made a different number of hook calls than the first pass
    #[error("hook count mismatch for {target}: expected {expected} hook calls, found {found}")]
    HookCountMismatch {
        target: TargetId,
        expected: usize,
        found: usize,
    },

    /// A render (or a setter) was triggered while another pass was still running
    #[error("re-entrant render: a pass for {active} is still running")]
    ReentrantRender { active: TargetId },

    /// The target has no state record (never rendered, or unmounted)
    #[error("unknown render target {0}")]
    UnknownTarget(TargetId),

    /// A setter outlived the runtime that created it
    #[error("the runtime owning this setter has been dropped")]
    RuntimeDropped,

    /// The render function itself failed
    #[error("render function failed: {0}")]
    Render(String),
}

impl HookError {
    /// Wraps a failure raised by a render function.
    pub fn render(err: impl std::fmt::Display) -> Self {
        HookError::Render(err.to_string())
    }
}

/// Result type for hookcell-core operations
pub type Result<T> = std::result::Result<T, HookError>;
