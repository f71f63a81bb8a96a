//! # Components, Hooks, and Render Passes
//!
//! hookcell is a small hook engine. A component is a plain render function
//! bound to a `RenderTarget`; it keeps private state across passes through
//! hook calls, and a state write re-renders exactly the target it belongs to.
//!
//! - `Runtime`: the render driver and owner of all hook state.
//! - `Cx`: the render context passed to each pass; hooks are its methods.
//! - `use_state` / `use_effect`: the two hook primitives.
//!
//! ## Mounting a component
//!
//! ```rust
//! use hookcell_core::*;
//!
//! let rt = Runtime::new();
//! let screen = TextBuffer::new();
//! let target = RenderTarget::new(screen.clone());
//!
//! rt.render(|cx: &Cx| {
//!     let (count, _set) = cx.use_state(0)?;
//!     Ok(count.to_string())
//! }, &target)?;
//!
//! assert_eq!(screen.contents(), "0");
//! # Ok::<(), HookError>(())
//! ```
//!
//! The sink attached to the target receives every pass's output and replaces
//! whatever it showed before. There is no diffing.
//!
//! ## State
//!
//! Hooks are order-based: the Nth hook call of a pass always refers to the Nth
//! cell of the target's record. `initial` is only used the first time a cell is
//! filled.
//!
//! ```rust
//! use hookcell_core::*;
//!
//! let rt = Runtime::new();
//! let screen = TextBuffer::new();
//! let target = RenderTarget::new(screen.clone());
//! let setter = std::rc::Rc::new(std::cell::RefCell::new(None));
//!
//! rt.render({
//!     let setter = setter.clone();
//!     move |cx: &Cx| {
//!         let (count, set_count) = cx.use_state(0)?;
//!         *setter.borrow_mut() = Some(set_count);
//!         Ok(format!("Count = {count}"))
//!     }
//! }, &target)?;
//!
//! let set_count = setter.borrow().clone().unwrap();
//! set_count.update(|c| c + 1)?;
//! assert_eq!(screen.contents(), "Count = 1");
//! set_count.set(5)?;
//! assert_eq!(screen.contents(), "Count = 5");
//! # Ok::<(), HookError>(())
//! ```
//!
//! Every `set` / `update` re-renders the target, even if the value did not
//! change. Setters must be called from outside a pass (event handlers);
//! calling one while a pass runs fails with `HookError::ReentrantRender`.
//!
//! ## Effects and cleanup
//!
//! `use_effect` runs its callback during the pass when its dependency list
//! differs from the previous run. A returned `Cleanup` runs before the next
//! run of the same effect, and on `Runtime::unmount`.
//!
//! ```rust
//! use hookcell_core::*;
//!
//! fn title(cx: &Cx) -> Result<String> {
//!     let (name, _) = cx.use_state("home".to_string())?;
//!     cx.use_effect(deps![name.as_str()], {
//!         let name = name.clone();
//!         move || {
//!             log::info!("showing {name}");
//!             on_cleanup(move || log::info!("leaving {name}"))
//!         }
//!     })?;
//!     Ok(name)
//! }
//! ```
//!
//! Hooks must be called unconditionally. By default a pass that breaks the
//! order is logged and the affected slot re-initialised; with
//! `RuntimeConfig::strict()` it fails with `HookOrderMismatch` or
//! `HookCountMismatch` instead.

pub mod cell;
pub mod config;
pub mod effects;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod runtime;
pub mod store;
pub mod target;

pub use cell::*;
pub use config::*;
pub use effects::*;
pub use error::*;
pub use hooks::*;
pub use runtime::*;
pub use store::*;
pub use target::*;
