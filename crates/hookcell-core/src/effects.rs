use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Cleanup callback returned by an effect.
#[derive(Clone)]
pub struct Cleanup(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn has_run(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("has_run", &self.has_run())
            .finish()
    }
}

/// Helper to build the cleanup an effect returns.
pub fn on_cleanup(f: impl FnOnce() + 'static) -> Cleanup {
    Cleanup::new(f)
}

/// Values an effect callback may return.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cleanup_runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = on_cleanup({
            let count = count.clone();
            move || count.set(count.get() + 1)
        });
        let c2 = c.clone();
        assert!(!c.has_run());
        c.run();
        c2.run();
        assert_eq!(count.get(), 1);
        assert!(c2.has_run());
    }
}
