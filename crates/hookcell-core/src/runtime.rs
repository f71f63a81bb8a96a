use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::cell::HookCell;
use crate::config::RuntimeConfig;
use crate::error::{HookError, Result};
use crate::hooks::Cx;
use crate::store::HookStore;
use crate::target::{RenderTarget, TargetId};

/// A component's render function: reads its hooks through `Cx` and returns
/// the serialized output for its target.
pub type RenderFn = Rc<dyn Fn(&Cx) -> Result<String>>;

/// Render driver. Cheap to clone; all clones share one store.
#[derive(Clone, Default)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

#[derive(Default)]
pub(crate) struct RuntimeInner {
    pub(crate) store: RefCell<HookStore>,
    /// Target of the pass currently running, if any.
    pub(crate) rendering: Cell<Option<TargetId>>,
    pub(crate) config: RuntimeConfig,
}

/// Marks a pass as running; the mark is cleared on drop, so early returns
/// and panics inside the render function leave the runtime idle.
struct RenderGuard<'a> {
    rendering: &'a Cell<Option<TargetId>>,
}

impl<'a> RenderGuard<'a> {
    fn begin(rendering: &'a Cell<Option<TargetId>>, target: TargetId) -> Result<Self> {
        if let Some(active) = rendering.get() {
            return Err(HookError::ReentrantRender { active });
        }
        rendering.set(Some(target));
        Ok(RenderGuard { rendering })
    }
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.rendering.set(None);
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                store: RefCell::new(HookStore::new()),
                rendering: Cell::new(None),
                config,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<RuntimeInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<RuntimeInner> {
        Rc::downgrade(&self.inner)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Runs one pass of `render_fn` for `target` and hands the output to the
    /// target's sink.
    ///
    /// The first call for a target binds `render_fn` to it; setters re-run
    /// that bound function. Later calls still run the function they are
    /// given but do not replace the binding.
    pub fn render<F>(&self, render_fn: F, target: &RenderTarget) -> Result<String>
    where
        F: Fn(&Cx) -> Result<String> + 'static,
    {
        let guard = RenderGuard::begin(&self.inner.rendering, target.id())?;
        let render_fn: RenderFn = Rc::new(render_fn);

        {
            let mut store = self.inner.store.borrow_mut();
            let (_, created) = store.get_or_create(target, || render_fn.clone());
            if created {
                log::debug!("render: mounted {target}");
            } else {
                log::trace!(
                    "render: {target} is already bound; keeping its original render function"
                );
            }
        }

        self.run_pass(target, &render_fn, guard)
    }

    /// Re-runs the render function bound to `target`.
    pub fn rerender(&self, target: &RenderTarget) -> Result<String> {
        self.rerender_id(target.id())
    }

    pub(crate) fn rerender_id(&self, id: TargetId) -> Result<String> {
        let guard = RenderGuard::begin(&self.inner.rendering, id)?;
        let (target, render_fn) = {
            let store = self.inner.store.borrow();
            let record = store.get(id).ok_or(HookError::UnknownTarget(id))?;
            (record.target.clone(), record.render_fn.clone())
        };
        self.run_pass(&target, &render_fn, guard)
    }

    fn run_pass(
        &self,
        target: &RenderTarget,
        render_fn: &RenderFn,
        guard: RenderGuard<'_>,
    ) -> Result<String> {
        let id = target.id();
        self.inner.store.borrow_mut().reset_cursor(id);
        log::trace!("render: pass start for {target}");

        let cx = Cx::new(self.downgrade(), id);
        let output = render_fn(&cx)?;
        self.finish_pass(id)?;

        target.commit(&output);
        drop(guard);
        log::trace!("render: pass done for {target}");
        Ok(output)
    }

    fn finish_pass(&self, id: TargetId) -> Result<()> {
        let mut store = self.inner.store.borrow_mut();
        let record = store.get_mut(id).ok_or(HookError::UnknownTarget(id))?;
        let found = record.hook_index;
        match record.expected_hooks {
            None => record.expected_hooks = Some(found),
            Some(expected) if expected != found => {
                if self.inner.config.is_strict() {
                    return Err(HookError::HookCountMismatch {
                        target: id,
                        expected,
                        found,
                    });
                }
                log::warn!(
                    "render: {id} made {found} hook calls, expected {expected}; \
                     hooks must be called unconditionally and in the same order."
                );
            }
            Some(_) => {}
        }
        record.renders += 1;
        Ok(())
    }

    /// Drops the state record of `target` and runs its pending effect
    /// cleanups in slot order. Returns `false` if the target was not mounted.
    pub fn unmount(&self, target: &RenderTarget) -> Result<bool> {
        if let Some(active) = self.inner.rendering.get() {
            return Err(HookError::ReentrantRender { active });
        }
        let record = self.inner.store.borrow_mut().remove(target.id());
        let Some(record) = record else {
            return Ok(false);
        };

        log::debug!("unmount: {target}");
        for cell in record.hooks {
            if let HookCell::Effect(effect) = cell
                && let Some(cleanup) = effect.cleanup
            {
                cleanup.run();
            }
        }
        Ok(true)
    }

    pub fn is_mounted(&self, target: &RenderTarget) -> bool {
        self.inner.store.borrow().contains(target.id())
    }

    /// Number of hook cells stored for `target`.
    pub fn hook_count(&self, target: &RenderTarget) -> Option<usize> {
        self.inner.store.borrow().get(target.id()).map(|r| r.hooks.len())
    }

    /// Number of completed passes for `target`.
    pub fn render_count(&self, target: &RenderTarget) -> Option<u64> {
        self.inner.store.borrow().get(target.id()).map(|r| r.renders)
    }

    pub fn mounted_targets(&self) -> Vec<RenderTarget> {
        self.inner.store.borrow().targets().cloned().collect()
    }

    /// Target whose pass is currently running.
    pub fn rendering(&self) -> Option<TargetId> {
        self.inner.rendering.get()
    }
}
