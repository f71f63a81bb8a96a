//! Render targets and output sinks.
//!
//! A `RenderTarget` is the mount point a render function is bound to. The core
//! never looks inside it: it only needs a stable identity to key state records
//! on, and a sink to hand each pass's output to.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity tag of a render target. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    fn next() -> Self {
        TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Receives the output of every render pass and replaces the target's visible
/// content with it in full.
pub trait OutputSink: 'static {
    fn replace(&self, output: &str);
}

impl<F> OutputSink for F
where
    F: Fn(&str) + 'static,
{
    fn replace(&self, output: &str) {
        self(output)
    }
}

/// Cloneable handle to a mount point. Equality and hashing use identity only.
#[derive(Clone)]
pub struct RenderTarget {
    inner: Rc<TargetInner>,
}

struct TargetInner {
    id: TargetId,
    label: Option<String>,
    sink: Box<dyn OutputSink>,
}

impl RenderTarget {
    pub fn new(sink: impl OutputSink) -> Self {
        Self {
            inner: Rc::new(TargetInner {
                id: TargetId::next(),
                label: None,
                sink: Box::new(sink),
            }),
        }
    }

    /// Like `new`, with a label that shows up in logs.
    pub fn labeled(label: impl Into<String>, sink: impl OutputSink) -> Self {
        Self {
            inner: Rc::new(TargetInner {
                id: TargetId::next(),
                label: Some(label.into()),
                sink: Box::new(sink),
            }),
        }
    }

    pub fn id(&self) -> TargetId {
        self.inner.id
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    pub(crate) fn commit(&self, output: &str) {
        self.inner.sink.replace(output);
    }
}

impl PartialEq for RenderTarget {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for RenderTarget {}

impl Hash for RenderTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTarget")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .finish()
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.label {
            Some(label) => write!(f, "{} ({})", self.inner.id, label),
            None => write!(f, "{}", self.inner.id),
        }
    }
}

/// In-memory sink holding whatever was last committed.
#[derive(Clone, Default)]
pub struct TextBuffer {
    contents: Rc<RefCell<String>>,
    commits: Rc<Cell<usize>>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }

    /// Number of times content has been replaced.
    pub fn commits(&self) -> usize {
        self.commits.get()
    }
}

impl OutputSink for TextBuffer {
    fn replace(&self, output: &str) {
        let mut contents = self.contents.borrow_mut();
        contents.clear();
        contents.push_str(output);
        self.commits.set(self.commits.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_targets_with_equal_sinks_never_collide() {
        let a = RenderTarget::labeled("counter", TextBuffer::new());
        let b = RenderTarget::labeled("counter", TextBuffer::new());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b.clone());
        set.insert(a.clone());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_text_buffer_replaces_wholesale() {
        let buf = TextBuffer::new();
        let target = RenderTarget::new(buf.clone());
        target.commit("<p>first</p>");
        target.commit("2");
        assert_eq!(buf.contents(), "2");
        assert_eq!(buf.commits(), 2);
    }

    #[test]
    fn test_closure_sink() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let target = RenderTarget::new({
            let seen = seen.clone();
            move |out: &str| seen.borrow_mut().push(out.to_string())
        });
        target.commit("a");
        target.commit("b");
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
    }
}
