pub use crate::cell::{Dep, Deps};
pub use crate::config::{HookOrderCheck, RuntimeConfig};
pub use crate::deps;
pub use crate::effects::{Cleanup, IntoCleanup, on_cleanup};
pub use crate::error::{HookError, Result};
pub use crate::hooks::{Cx, SetState, Update};
pub use crate::runtime::{RenderFn, Runtime};
pub use crate::target::{OutputSink, RenderTarget, TargetId, TextBuffer};
