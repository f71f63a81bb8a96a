//! State and effect hooks.
//!
//! Hooks are methods on the render context `Cx` handed to every render
//! function. Each call claims the next cell of the target's record, so a
//! render function must make the same hook calls, in the same order, on every
//! pass.

use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::cell::{CellKind, Deps, EffectCell, HookCell};
use crate::effects::IntoCleanup;
use crate::error::{HookError, Result};
use crate::runtime::{Runtime, RuntimeInner};
use crate::target::TargetId;

/// Render context of one pass. Only valid while that pass is running.
#[derive(Clone)]
pub struct Cx {
    runtime: Weak<RuntimeInner>,
    target: TargetId,
}

impl fmt::Debug for Cx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cx").field("target", &self.target).finish()
    }
}

enum Claimed<T> {
    Stored(T),
    Empty,
    Mismatch(CellKind),
}

impl Cx {
    pub(crate) fn new(runtime: Weak<RuntimeInner>, target: TargetId) -> Self {
        Self { runtime, target }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    fn active(&self) -> Result<Rc<RuntimeInner>> {
        let inner = self.runtime.upgrade().ok_or(HookError::InvalidHookCall)?;
        if inner.rendering.get() != Some(self.target) {
            return Err(HookError::InvalidHookCall);
        }
        Ok(inner)
    }

    fn mismatch(
        &self,
        inner: &RuntimeInner,
        slot: usize,
        expected: CellKind,
        found: CellKind,
    ) -> Result<()> {
        if inner.config.is_strict() {
            return Err(HookError::HookOrderMismatch {
                slot,
                expected,
                found,
            });
        }
        log::warn!(
            "hooks: {} slot {} holds {}, expected {}; replacing. \
             Hooks must not be called conditionally.",
            self.target,
            slot,
            found,
            expected
        );
        Ok(())
    }

    /// Puts `cell` at `slot`, returning whatever was there before.
    fn install(
        &self,
        inner: &RuntimeInner,
        slot: usize,
        cell: HookCell,
    ) -> Result<Option<HookCell>> {
        let mut store = inner.store.borrow_mut();
        let record = store
            .get_mut(self.target)
            .ok_or(HookError::UnknownTarget(self.target))?;
        if slot < record.hooks.len() {
            Ok(Some(std::mem::replace(&mut record.hooks[slot], cell)))
        } else {
            record.hooks.push(cell);
            Ok(None)
        }
    }

    /// Stateful slot. `initial` is only used on the first pass; later passes
    /// return the stored value.
    pub fn use_state<T: Clone + 'static>(&self, initial: T) -> Result<(T, SetState<T>)> {
        self.use_state_with(move || initial)
    }

    /// Like `use_state`, but builds the initial value only when the slot is empty.
    pub fn use_state_with<T: Clone + 'static>(
        &self,
        init: impl FnOnce() -> T,
    ) -> Result<(T, SetState<T>)> {
        let inner = self.active()?;

        let (slot, claimed) = {
            let mut store = inner.store.borrow_mut();
            let record = store
                .get_mut(self.target)
                .ok_or(HookError::UnknownTarget(self.target))?;
            let slot = record.next_slot();
            let claimed = match record.hooks.get(slot) {
                None => Claimed::Empty,
                Some(cell) => match cell.state_ref::<T>() {
                    Some(v) => Claimed::Stored(v.clone()),
                    None => Claimed::Mismatch(cell.kind()),
                },
            };
            (slot, claimed)
        };

        let value = match claimed {
            Claimed::Stored(v) => v,
            Claimed::Empty => {
                let v = init();
                self.install(&inner, slot, HookCell::state(v.clone()))?;
                v
            }
            Claimed::Mismatch(found) => {
                self.mismatch(&inner, slot, CellKind::state_of::<T>(), found)?;
                let v = init();
                let old = self.install(&inner, slot, HookCell::state(v.clone()))?;
                run_orphaned_cleanup(old);
                v
            }
        };

        let setter = SetState {
            runtime: self.runtime.clone(),
            target: self.target,
            slot,
            _marker: PhantomData,
        };
        Ok((value, setter))
    }

    /// Runs `effect` during this pass when `deps` differ from the previous
    /// run (or on the first pass). The previous cleanup runs first.
    pub fn use_effect<C: IntoCleanup>(
        &self,
        deps: impl Into<Deps>,
        effect: impl FnOnce() -> C,
    ) -> Result<()> {
        let inner = self.active()?;
        let deps = deps.into();

        let (slot, claimed) = {
            let mut store = inner.store.borrow_mut();
            let record = store
                .get_mut(self.target)
                .ok_or(HookError::UnknownTarget(self.target))?;
            let slot = record.next_slot();
            let claimed = match record.hooks.get_mut(slot) {
                None => Claimed::Empty,
                Some(HookCell::Effect(cell)) => {
                    if !cell.should_run(&deps) {
                        return Ok(());
                    }
                    Claimed::Stored(cell.cleanup.take())
                }
                Some(other) => Claimed::Mismatch(other.kind()),
            };
            (slot, claimed)
        };

        match claimed {
            Claimed::Stored(Some(cleanup)) => cleanup.run(),
            Claimed::Stored(None) => {}
            Claimed::Empty => {
                self.install(&inner, slot, HookCell::Effect(EffectCell::default()))?;
            }
            Claimed::Mismatch(found) => {
                self.mismatch(&inner, slot, CellKind::Effect, found)?;
                self.install(&inner, slot, HookCell::Effect(EffectCell::default()))?;
            }
        }

        let cleanup = effect().into_cleanup();

        let mut store = inner.store.borrow_mut();
        let record = store
            .get_mut(self.target)
            .ok_or(HookError::UnknownTarget(self.target))?;
        if let Some(HookCell::Effect(cell)) = record.hooks.get_mut(slot) {
            cell.cleanup = cleanup;
            cell.last_deps = Some(deps);
        }
        Ok(())
    }
}

fn run_orphaned_cleanup(cell: Option<HookCell>) {
    if let Some(HookCell::Effect(EffectCell {
        cleanup: Some(cleanup),
        ..
    })) = cell
    {
        cleanup.run();
    }
}

/// New value for a state slot: a literal, or a function of the stored value.
pub enum Update<T> {
    Value(T),
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Update::With(Box::new(f))
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Value(value)
    }
}

/// Setter for one state slot, bound to its target and slot index when the
/// hook was called. Every write re-renders the target.
pub struct SetState<T> {
    runtime: Weak<RuntimeInner>,
    target: TargetId,
    slot: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            target: self.target,
            slot: self.slot,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("target", &self.target)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T: Clone + 'static> SetState<T> {
    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    fn enter(&self) -> Result<Rc<RuntimeInner>> {
        let inner = self.runtime.upgrade().ok_or(HookError::RuntimeDropped)?;
        if let Some(active) = inner.rendering.get() {
            return Err(HookError::ReentrantRender { active });
        }
        Ok(inner)
    }

    fn read(&self, inner: &RuntimeInner) -> Result<T> {
        let store = inner.store.borrow();
        let record = store
            .get(self.target)
            .ok_or(HookError::UnknownTarget(self.target))?;
        let cell = record
            .hooks
            .get(self.slot)
            .ok_or(HookError::UnknownTarget(self.target))?;
        cell.state_ref::<T>()
            .cloned()
            .ok_or_else(|| HookError::HookOrderMismatch {
                slot: self.slot,
                expected: CellKind::state_of::<T>(),
                found: cell.kind(),
            })
    }

    fn write(&self, inner: &RuntimeInner, value: T) -> Result<()> {
        let mut store = inner.store.borrow_mut();
        let record = store
            .get_mut(self.target)
            .ok_or(HookError::UnknownTarget(self.target))?;
        let cell = record
            .hooks
            .get_mut(self.slot)
            .ok_or(HookError::UnknownTarget(self.target))?;
        let found = cell.kind();
        match cell.state_mut::<T>() {
            Some(stored) => {
                *stored = value;
                Ok(())
            }
            None => Err(HookError::HookOrderMismatch {
                slot: self.slot,
                expected: CellKind::state_of::<T>(),
                found,
            }),
        }
    }

    /// Currently stored value.
    pub fn get(&self) -> Result<T> {
        let inner = self.runtime.upgrade().ok_or(HookError::RuntimeDropped)?;
        self.read(&inner)
    }

    /// Stores `value` and re-renders, even when the value is unchanged.
    pub fn set(&self, value: T) -> Result<()> {
        let inner = self.enter()?;
        self.write(&inner, value)?;
        Runtime::from_inner(inner).rerender_id(self.target).map(drop)
    }

    /// Stores `f(stored)`, reading the value held at call time, then re-renders.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let inner = self.enter()?;
        let current = self.read(&inner)?;
        self.write(&inner, f(&current))?;
        Runtime::from_inner(inner).rerender_id(self.target).map(drop)
    }

    pub fn dispatch(&self, update: impl Into<Update<T>>) -> Result<()> {
        match update.into() {
            Update::Value(v) => self.set(v),
            Update::With(f) => self.update(f),
        }
    }
}
