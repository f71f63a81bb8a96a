//! Per-target hook storage.

use std::collections::HashMap;

use crate::cell::HookCell;
use crate::runtime::RenderFn;
use crate::target::{RenderTarget, TargetId};

/// Private state of one mounted component.
pub struct ComponentStateRecord {
    pub target: RenderTarget,
    /// Append-only; never reordered or truncated while the target is mounted.
    pub hooks: Vec<HookCell>,
    pub hook_index: usize,
    /// Bound on creation and never replaced.
    pub render_fn: RenderFn,
    /// Hook calls made by the first completed pass.
    pub expected_hooks: Option<usize>,
    pub renders: u64,
}

impl ComponentStateRecord {
    fn new(target: RenderTarget, render_fn: RenderFn) -> Self {
        Self {
            target,
            hooks: Vec::new(),
            hook_index: 0,
            render_fn,
            expected_hooks: None,
            renders: 0,
        }
    }

    /// Returns the current cursor and advances it by one.
    pub fn next_slot(&mut self) -> usize {
        let slot = self.hook_index;
        self.hook_index += 1;
        slot
    }
}

#[derive(Default)]
pub struct HookStore {
    records: HashMap<TargetId, ComponentStateRecord>,
}

impl HookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing record for `target`, or a fresh one bound to `render_fn`.
    /// The flag is `true` when the record was created by this call.
    pub fn get_or_create(
        &mut self,
        target: &RenderTarget,
        render_fn: impl FnOnce() -> RenderFn,
    ) -> (&mut ComponentStateRecord, bool) {
        let mut created = false;
        let record = self.records.entry(target.id()).or_insert_with(|| {
            created = true;
            ComponentStateRecord::new(target.clone(), render_fn())
        });
        (record, created)
    }

    pub fn get(&self, id: TargetId) -> Option<&ComponentStateRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut ComponentStateRecord> {
        self.records.get_mut(&id)
    }

    /// Rewinds the hook cursor before a pass. Returns `false` for unknown targets.
    pub fn reset_cursor(&mut self, id: TargetId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) => {
                record.hook_index = 0;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TargetId) -> Option<ComponentStateRecord> {
        self.records.remove(&id)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &RenderTarget> {
        self.records.values().map(|r| &r.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::hooks::Cx;
    use crate::target::TextBuffer;
    use std::rc::Rc;

    fn noop() -> RenderFn {
        Rc::new(|_: &Cx| -> Result<String> { Ok(String::new()) })
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut store = HookStore::new();
        let target = RenderTarget::new(TextBuffer::new());

        let (record, created) = store.get_or_create(&target, noop);
        assert!(created);
        record.hooks.push(HookCell::state(7i32));
        record.hook_index = 1;

        let (record, created) = store.get_or_create(&target, || panic!("must not rebind"));
        assert!(!created);
        assert_eq!(record.hooks.len(), 1);
        assert_eq!(record.hooks[0].state_ref::<i32>(), Some(&7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reset_cursor() {
        let mut store = HookStore::new();
        let target = RenderTarget::new(TextBuffer::new());
        let other = RenderTarget::new(TextBuffer::new());

        let (record, _) = store.get_or_create(&target, noop);
        assert_eq!(record.next_slot(), 0);
        assert_eq!(record.next_slot(), 1);

        assert!(store.reset_cursor(target.id()));
        assert_eq!(store.get(target.id()).map(|r| r.hook_index), Some(0));
        assert!(!store.reset_cursor(other.id()));
    }

    #[test]
    fn test_distinct_targets_get_distinct_records() {
        let mut store = HookStore::new();
        let a = RenderTarget::new(TextBuffer::new());
        let b = RenderTarget::new(TextBuffer::new());

        store.get_or_create(&a, noop).0.hooks.push(HookCell::state(1u8));
        let (rb, created) = store.get_or_create(&b, noop);
        assert!(created);
        assert!(rb.hooks.is_empty());

        assert!(store.remove(a.id()).is_some());
        assert!(!store.contains(a.id()));
        assert!(store.contains(b.id()));
    }
}
