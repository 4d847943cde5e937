//! Typed continuation slot carried by every command.

use std::fmt;

/// "What happens with the operation's result."
///
/// A `Continuation<R, N>` consumes the result `R` of one command and
/// produces `N`, which inside a [`Program`](crate::Program) is the next
/// program node. It is consumed exactly once.
///
/// # Example
///
/// ```
/// use hfm_engine::Continuation;
///
/// let k = Continuation::new(|n: u32| n * 2).then(|n| format!("{n} slices"));
/// assert_eq!(k.resume(4), "8 slices");
/// ```
pub struct Continuation<R, N> {
    f: Box<dyn FnOnce(R) -> N + Send>,
}

impl<R: 'static, N: 'static> Continuation<R, N> {
    /// Wraps a closure as a continuation.
    pub fn new(f: impl FnOnce(R) -> N + Send + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    /// Feeds the command result in, producing what comes next.
    pub fn resume(self, value: R) -> N {
        (self.f)(value)
    }

    /// Post-composes `g`, yielding a continuation with a new target type.
    ///
    /// This is the only plumbing an algebra's `map` needs per variant.
    pub fn then<M: 'static>(self, g: impl FnOnce(N) -> M + Send + 'static) -> Continuation<R, M> {
        let f = self.f;
        Continuation::new(move |value| g(f(value)))
    }
}

impl<R: 'static> Continuation<R, R> {
    /// The continuation of a bare command: hands the result straight back.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|value| value)
    }
}

impl<R, N> fmt::Debug for Continuation<R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Continuation<{} -> {}>",
            std::any::type_name::<R>(),
            std::any::type_name::<N>()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        assert_eq!(Continuation::<i32, i32>::identity().resume(7), 7);
    }

    #[test]
    fn then_composes_in_order() {
        let k = Continuation::new(|s: String| s.len()).then(|n| n + 1);
        assert_eq!(k.resume("abc".into()), 4);
    }

    #[test]
    fn debug_names_types() {
        let k = Continuation::<u8, String>::new(|b| b.to_string());
        let dbg = format!("{k:?}");
        assert!(dbg.contains("u8"));
        assert!(dbg.contains("String"));
    }
}
