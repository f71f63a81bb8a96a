//! Hook cells and effect dependency lists.
//!
//! A component's private state is an ordered list of `HookCell`s. Cells have
//! no names: the Nth hook call of a pass owns the Nth cell.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::effects::Cleanup;

/// One positional slot of a component's state.
pub enum HookCell {
    State {
        value: Box<dyn Any>,
        type_name: &'static str,
    },
    Effect(EffectCell),
}

impl HookCell {
    pub fn state<T: 'static>(value: T) -> Self {
        HookCell::State {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            HookCell::State { type_name, .. } => CellKind::State(type_name),
            HookCell::Effect(_) => CellKind::Effect,
        }
    }

    /// Typed view of a state cell. `None` for effect cells or a different `T`.
    pub fn state_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            HookCell::State { value, .. } => value.downcast_ref::<T>(),
            HookCell::Effect(_) => None,
        }
    }

    pub fn state_mut<T: 'static>(&mut self) -> Option<&mut T> {
        match self {
            HookCell::State { value, .. } => value.downcast_mut::<T>(),
            HookCell::Effect(_) => None,
        }
    }
}

impl fmt::Debug for HookCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookCell::State { type_name, .. } => f.debug_tuple("State").field(type_name).finish(),
            HookCell::Effect(cell) => f.debug_tuple("Effect").field(cell).finish(),
        }
    }
}

/// Shape of a cell, used in order-mismatch reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    State(&'static str),
    Effect,
}

impl CellKind {
    pub fn state_of<T: 'static>() -> Self {
        CellKind::State(std::any::type_name::<T>())
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::State(ty) => write!(f, "state<{ty}>"),
            CellKind::Effect => f.write_str("effect"),
        }
    }
}

/// Effect slot: dependencies seen on the last run and the pending cleanup.
#[derive(Debug, Default)]
pub struct EffectCell {
    /// `None` until the effect has run once.
    pub last_deps: Option<Deps>,
    pub cleanup: Option<Cleanup>,
}

impl EffectCell {
    pub fn should_run(&self, deps: &Deps) -> bool {
        match &self.last_deps {
            None => true,
            Some(prev) => prev != deps,
        }
    }
}

/// A single dependency value.
///
/// Primitives compare by value. Integers compare by numeric value whatever
/// their width or signedness, so `1i32` and `1usize` are the same dependency;
/// floats only ever equal floats. `Identity` compares by address only, so two
/// structurally equal `Rc`s are different dependencies.
#[derive(Clone)]
pub enum Dep {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(Rc<str>),
    Identity { addr: usize, keep: Rc<dyn Any> },
}

impl Dep {
    /// Dependency on the identity of a shared value.
    pub fn identity<T: 'static>(rc: &Rc<T>) -> Self {
        Dep::Identity {
            addr: Rc::as_ptr(rc) as *const () as usize,
            keep: rc.clone(),
        }
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dep::Unit, Dep::Unit) => true,
            (Dep::Bool(a), Dep::Bool(b)) => a == b,
            (Dep::Int(a), Dep::Int(b)) => a == b,
            (Dep::Uint(a), Dep::Uint(b)) => a == b,
            (Dep::Int(i), Dep::Uint(u)) | (Dep::Uint(u), Dep::Int(i)) => {
                u64::try_from(*i).is_ok_and(|n| n == *u)
            }
            // NaN never equals itself, matching strict equality on numbers
            (Dep::Float(a), Dep::Float(b)) => a == b,
            (Dep::Char(a), Dep::Char(b)) => a == b,
            (Dep::Str(a), Dep::Str(b)) => a == b,
            (Dep::Identity { addr: a, .. }, Dep::Identity { addr: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dep::Unit => f.write_str("Unit"),
            Dep::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Dep::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Dep::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Dep::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Dep::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Dep::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Dep::Identity { addr, .. } => write!(f, "Identity({addr:#x})"),
        }
    }
}

impl From<()> for Dep {
    fn from(_: ()) -> Self {
        Dep::Unit
    }
}

impl From<bool> for Dep {
    fn from(v: bool) -> Self {
        Dep::Bool(v)
    }
}

macro_rules! dep_from_int {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Dep {
                fn from(v: $t) -> Self {
                    Dep::$variant(v as $wide)
                }
            }
        )*
    };
}

dep_from_int!(Int as i64: i8, i16, i32, i64, isize);
dep_from_int!(Uint as u64: u8, u16, u32, u64, usize);

impl From<f32> for Dep {
    fn from(v: f32) -> Self {
        Dep::Float(v as f64)
    }
}

impl From<f64> for Dep {
    fn from(v: f64) -> Self {
        Dep::Float(v)
    }
}

impl From<char> for Dep {
    fn from(v: char) -> Self {
        Dep::Char(v)
    }
}

impl From<&str> for Dep {
    fn from(v: &str) -> Self {
        Dep::Str(Rc::from(v))
    }
}

impl From<String> for Dep {
    fn from(v: String) -> Self {
        Dep::Str(Rc::from(v))
    }
}

impl From<&String> for Dep {
    fn from(v: &String) -> Self {
        Dep::Str(Rc::from(v.as_str()))
    }
}

/// Ordered dependency list of an effect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Deps(SmallVec<[Dep; 4]>);

impl Deps {
    /// The empty list: the effect runs on the first pass only.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dep: impl Into<Dep>) {
        self.0.push(dep.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dep> {
        self.0.iter()
    }
}

impl FromIterator<Dep> for Deps {
    fn from_iter<I: IntoIterator<Item = Dep>>(iter: I) -> Self {
        Deps(iter.into_iter().collect())
    }
}

impl From<()> for Deps {
    fn from(_: ()) -> Self {
        Deps::new()
    }
}

impl From<Vec<Dep>> for Deps {
    fn from(v: Vec<Dep>) -> Self {
        Deps(SmallVec::from_vec(v))
    }
}

impl<const N: usize> From<[Dep; N]> for Deps {
    fn from(v: [Dep; N]) -> Self {
        v.into_iter().collect()
    }
}

/// Builds a `Deps` list: `deps![count, name.as_str()]`.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::cell::Deps::new()
    };
    ($($dep:expr),+ $(,)?) => {
        [$($crate::cell::Dep::from($dep)),+]
            .into_iter()
            .collect::<$crate::cell::Deps>()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_deps_compare_by_value() {
        assert_eq!(deps![1, "a", true], deps![1, "a", true]);
        assert_ne!(deps![1], deps![2]);
        assert_ne!(deps![1], deps![1.0]);
        assert_ne!(deps![f64::NAN], deps![f64::NAN]);
    }

    #[test]
    fn test_integers_compare_across_signedness() {
        assert_eq!(deps![1], deps![1u32]);
        assert_eq!(deps![7usize], deps![7i64]);
        assert_ne!(deps![-1], deps![u64::MAX]);
        assert_ne!(deps![2u8], deps![3i32]);
    }

    #[test]
    fn test_identity_deps_compare_by_address() {
        let a = Rc::new(vec![1, 2, 3]);
        let b = Rc::new(vec![1, 2, 3]);
        assert_eq!(deps![Dep::identity(&a)], deps![Dep::identity(&a.clone())]);
        assert_ne!(deps![Dep::identity(&a)], deps![Dep::identity(&b)]);
    }

    #[test]
    fn test_length_change_counts_as_changed() {
        let cell = EffectCell {
            last_deps: Some(deps![1]),
            cleanup: None,
        };
        assert!(cell.should_run(&deps![1, 2]));
        assert!(cell.should_run(&deps![]));
        assert!(!cell.should_run(&deps![1]));
    }

    #[test]
    fn test_first_run_always_runs() {
        let cell = EffectCell::default();
        assert!(cell.should_run(&Deps::new()));
    }
}
