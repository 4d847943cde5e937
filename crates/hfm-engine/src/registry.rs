//! Interpreter registry: the substitution point between programs and
//! their interpreters.
//!
//! Bindings are keyed by algebra type plus an optional selector:
//!
//! - **Default binding** (`selector = None`): what the engine uses when a
//!   program (or child program) does not ask for a specific interpreter.
//! - **Named bindings**: a dictionary of interchangeable interpreters for
//!   one algebra, picked by runtime data carried in a command (e.g. the
//!   name of a pizza maker).
//!
//! Programs never see the registry. Running the same program against a
//! production registry or a mock registry is only a matter of which one
//! is passed to [`Engine::execute`](crate::Engine::execute).
//!
//! # Concurrency
//!
//! Interpreters are stored as `Arc<A::Interpreter>` and are `Send + Sync`,
//! so one registry can serve parallel child programs by shared reference.
//!
//! # Example
//!
//! ```
//! use hfm_engine::testing::{Probe, ScriptedProbe};
//! use hfm_engine::InterpreterRegistry;
//! use std::sync::Arc;
//!
//! let mut registry = InterpreterRegistry::new();
//! registry.bind::<Probe>(Arc::new(ScriptedProbe::new()));
//! registry.bind_named::<Probe>("fast", Arc::new(ScriptedProbe::new()));
//!
//! assert!(registry.is_bound::<Probe>(None));
//! assert!(registry.is_bound::<Probe>(Some("fast")));
//! assert_eq!(registry.selectors::<Probe>(), vec!["fast".to_string()]);
//! ```

use crate::algebra::Algebra;
use crate::error::UnboundAlgebraError;
use hfm_types::AlgebraId;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BindingKey {
    algebra: TypeId,
    selector: Option<String>,
}

impl BindingKey {
    fn of<A: Algebra>(selector: Option<&str>) -> Self {
        Self {
            algebra: TypeId::of::<A>(),
            selector: selector.map(str::to_owned),
        }
    }
}

/// A registered interpreter, type-erased.
///
/// Always holds an `Arc<A::Interpreter>` for the algebra in the key.
struct Binding {
    algebra: AlgebraId,
    interpreter: Box<dyn Any + Send + Sync>,
}

/// Binding set passed to the engine.
#[derive(Default)]
pub struct InterpreterRegistry {
    bindings: HashMap<BindingKey, Binding>,
}

impl InterpreterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default interpreter for `A`. Returns `true` if one was replaced.
    pub fn bind<A: Algebra>(&mut self, interpreter: Arc<A::Interpreter>) -> bool {
        self.insert::<A>(None, interpreter)
    }

    /// Sets the interpreter for `A` under `selector`. Returns `true` if one
    /// was replaced.
    pub fn bind_named<A: Algebra>(
        &mut self,
        selector: impl Into<String>,
        interpreter: Arc<A::Interpreter>,
    ) -> bool {
        let selector = selector.into();
        self.insert::<A>(Some(&selector), interpreter)
    }

    /// Builder form of [`bind`](Self::bind).
    #[must_use]
    pub fn with<A: Algebra>(mut self, interpreter: Arc<A::Interpreter>) -> Self {
        self.bind::<A>(interpreter);
        self
    }

    /// Builder form of [`bind_named`](Self::bind_named).
    #[must_use]
    pub fn with_named<A: Algebra>(
        mut self,
        selector: impl Into<String>,
        interpreter: Arc<A::Interpreter>,
    ) -> Self {
        self.bind_named::<A>(selector, interpreter);
        self
    }

    fn insert<A: Algebra>(
        &mut self,
        selector: Option<&str>,
        interpreter: Arc<A::Interpreter>,
    ) -> bool {
        let key = BindingKey::of::<A>(selector);
        let binding = Binding {
            algebra: A::id(),
            interpreter: Box::new(interpreter),
        };
        let replaced = self.bindings.insert(key, binding).is_some();
        if replaced {
            tracing::debug!(algebra = A::NAME, selector = ?selector, "interpreter binding replaced");
        }
        replaced
    }

    /// Removes a binding. Returns `true` if it existed.
    pub fn unbind<A: Algebra>(&mut self, selector: Option<&str>) -> bool {
        self.bindings
            .remove(&BindingKey::of::<A>(selector))
            .is_some()
    }

    /// Looks up the interpreter for `A` under `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`UnboundAlgebraError`] if nothing is bound. A named lookup
    /// does not fall back to the default binding.
    pub fn resolve<A: Algebra>(
        &self,
        selector: Option<&str>,
    ) -> Result<Arc<A::Interpreter>, UnboundAlgebraError> {
        self.bindings
            .get(&BindingKey::of::<A>(selector))
            .and_then(|binding| binding.interpreter.downcast_ref::<Arc<A::Interpreter>>())
            .map(Arc::clone)
            .ok_or_else(|| UnboundAlgebraError {
                algebra: A::id(),
                selector: selector.map(str::to_owned),
            })
    }

    /// Returns `true` if `A` has a binding under `selector`.
    #[must_use]
    pub fn is_bound<A: Algebra>(&self, selector: Option<&str>) -> bool {
        self.bindings.contains_key(&BindingKey::of::<A>(selector))
    }

    /// Named selectors bound for `A`, sorted.
    #[must_use]
    pub fn selectors<A: Algebra>(&self) -> Vec<String> {
        let algebra = TypeId::of::<A>();
        let mut names: Vec<String> = self
            .bindings
            .keys()
            .filter(|key| key.algebra == algebra)
            .filter_map(|key| key.selector.clone())
            .collect();
        names.sort();
        names
    }

    /// Algebras with at least one binding, sorted by name.
    #[must_use]
    pub fn algebras(&self) -> Vec<AlgebraId> {
        let mut ids: Vec<AlgebraId> = self.bindings.values().map(|b| b.algebra).collect();
        ids.sort_by_key(|id| id.name());
        ids.dedup();
        ids
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for InterpreterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpreterRegistry")
            .field("algebras", &self.algebras())
            .field("bindings", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, ProbeInterpreter, ScriptedProbe};

    #[test]
    fn empty_registry() {
        let reg = InterpreterRegistry::new();
        assert!(reg.is_empty());
        assert!(!reg.is_bound::<Probe>(None));
    }

    #[test]
    fn resolve_unbound_fails() {
        let reg = InterpreterRegistry::new();
        let err = reg.resolve::<Probe>(None).err().expect("unbound");
        assert_eq!(err.algebra, Probe::id());
        assert_eq!(err.selector, None);
    }

    #[test]
    fn bind_and_resolve_default() {
        let mut reg = InterpreterRegistry::new();
        assert!(!reg.bind::<Probe>(Arc::new(ScriptedProbe::new().with_offset(10))));
        let probe = reg.resolve::<Probe>(None).expect("bound");
        assert_eq!(probe.emit(1), Ok(11));
    }

    #[test]
    fn rebinding_replaces() {
        let mut reg = InterpreterRegistry::new();
        reg.bind::<Probe>(Arc::new(ScriptedProbe::new()));
        assert!(reg.bind::<Probe>(Arc::new(ScriptedProbe::new().with_offset(1))));
        assert_eq!(reg.len(), 1);
        let probe = reg.resolve::<Probe>(None).expect("bound");
        assert_eq!(probe.emit(1), Ok(2));
    }

    #[test]
    fn named_lookup_does_not_fall_back() {
        let reg = InterpreterRegistry::new().with::<Probe>(Arc::new(ScriptedProbe::new()));
        let err = reg.resolve::<Probe>(Some("other")).err().expect("unbound");
        assert_eq!(err.selector.as_deref(), Some("other"));
    }

    #[test]
    fn named_bindings_are_independent() {
        let reg = InterpreterRegistry::new()
            .with_named::<Probe>("plus-one", Arc::new(ScriptedProbe::new().with_offset(1)))
            .with_named::<Probe>("plus-two", Arc::new(ScriptedProbe::new().with_offset(2)));

        assert_eq!(reg.resolve::<Probe>(Some("plus-one")).map(|p| p.emit(0)).ok(), Some(Ok(1)));
        assert_eq!(reg.resolve::<Probe>(Some("plus-two")).map(|p| p.emit(0)).ok(), Some(Ok(2)));
        assert_eq!(reg.selectors::<Probe>(), vec!["plus-one", "plus-two"]);
        assert_eq!(reg.algebras(), vec![Probe::id()]);
    }

    #[test]
    fn unbind_removes() {
        let mut reg = InterpreterRegistry::new().with::<Probe>(Arc::new(ScriptedProbe::new()));
        assert!(reg.unbind::<Probe>(None));
        assert!(!reg.unbind::<Probe>(None));
        assert!(reg.is_empty());
    }
}
