//! Program representation and composition.
//!
//! A [`Program`] is pure data: either a final value, or one command whose
//! continuation yields the rest of the program. Building a program runs
//! nothing; only the [`Engine`](crate::Engine) interprets it.
//!
//! # Composition
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`Program::pure`] | Program that is already done |
//! | [`Program::lift`] | One-step program from a bare command |
//! | [`Program::bind`] | Feed the result into a function producing the next program |
//! | [`Program::map`] | Transform the result, no extra command |
//! | [`Program::then`] | Sequence, discarding the previous result |
//!
//! Sequencing is data dependency: the closure given to `bind` cannot run
//! before the command it follows has produced its value.
//!
//! # Laws
//!
//! - `Program::pure(v).bind(f)` is `f(v)`; nothing is dispatched.
//! - `p.bind(f).bind(g)` dispatches the same commands and yields the same
//!   value as `p.bind(|x| f(x).bind(g))`.
//!
//! # Stack usage
//!
//! A step keeps the functions bound after it in a flat list instead of
//! folding them into its command's continuation. `bind` on a step is a
//! push, and the engine unwinds those lists with its own stack, so neither
//! left-nested (`p.bind(f).bind(g)...`) nor right-nested chains grow the
//! call stack, however long they get.

use crate::algebra::{Algebra, CommandInfo};
use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

/// Result value of a step, typed again by the function consuming it.
pub(crate) type Value = Box<dyn Any + Send>;

/// A function bound after a step.
pub(crate) type Bound<A> = Box<dyn FnOnce(Value) -> Node<A> + Send>;

/// Untyped program node, driven by the engine.
pub(crate) enum Node<A: Algebra> {
    Done(Value),
    /// A command plus the functions bound after it, in application order.
    Step(Box<A::Command<Node<A>>>, Vec<Bound<A>>),
}

/// Recovers a step value at the type its producer promised.
pub(crate) fn unerase<T: 'static>(value: Value) -> T {
    match value.downcast::<T>() {
        Ok(value) => *value,
        Err(_) => unreachable!("program value is not a {}", type_name::<T>()),
    }
}

/// A program over algebra `A` that eventually yields `T`.
pub struct Program<A: Algebra, T> {
    node: Node<A>,
    _value: PhantomData<fn() -> T>,
}

impl<A: Algebra, T: Send + 'static> Program<A, T> {
    fn from_node(node: Node<A>) -> Self {
        Self {
            node,
            _value: PhantomData,
        }
    }

    pub(crate) fn into_node(self) -> Node<A> {
        self.node
    }

    /// Lifts a plain value into a program with no steps.
    pub fn pure(value: T) -> Self {
        Self::from_node(Node::Done(Box::new(value)))
    }

    /// Wraps a bare command (identity continuation) into a one-step program.
    pub fn lift(command: A::Command<T>) -> Self {
        let command = A::map::<T, Node<A>>(command, |value| Node::Done(Box::new(value)));
        Self::from_node(Node::Step(Box::new(command), Vec::new()))
    }

    /// Chains `f` after this program, passing it the result.
    pub fn bind<U: Send + 'static, F>(self, f: F) -> Program<A, U>
    where
        F: FnOnce(T) -> Program<A, U> + Send + 'static,
    {
        match self.node {
            Node::Done(value) => f(unerase(value)),
            Node::Step(command, mut bound) => {
                bound.push(Box::new(move |value| f(unerase(value)).node));
                Program::from_node(Node::Step(command, bound))
            }
        }
    }

    /// Transforms the eventual value without adding a step.
    pub fn map<U: Send + 'static, F>(self, f: F) -> Program<A, U>
    where
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.bind(move |value| Program::pure(f(value)))
    }

    /// Runs `next` after this program, discarding this program's value.
    pub fn then<U: Send + 'static>(self, next: Program<A, U>) -> Program<A, U> {
        self.bind(move |_| next)
    }

    /// Returns `true` if no command remains.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.node, Node::Done(_))
    }

    /// Returns the final value if no command remains.
    pub fn into_done(self) -> Option<T> {
        match self.node {
            Node::Done(value) => Some(unerase(value)),
            Node::Step(..) => None,
        }
    }

    /// Describes the next command, if any.
    #[must_use]
    pub fn peek(&self) -> Option<CommandInfo> {
        self.node.peek()
    }
}

impl<A: Algebra> Node<A> {
    pub(crate) fn peek(&self) -> Option<CommandInfo> {
        match self {
            Node::Done(_) => None,
            Node::Step(command, _) => Some(A::describe::<Node<A>>(command)),
        }
    }
}

impl<A: Algebra, T: fmt::Debug + 'static> fmt::Debug for Program<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Done(value) => match value.downcast_ref::<T>() {
                Some(value) => f.debug_tuple("Done").field(value).finish(),
                None => f.write_str("Done(..)"),
            },
            Node::Step(command, _) => f
                .debug_tuple("Step")
                .field(&A::describe::<Node<A>>(command).to_string())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Probe;

    #[test]
    fn pure_is_done() {
        let program: Program<Probe, i64> = Program::pure(5);
        assert!(program.is_done());
        assert_eq!(program.into_done(), Some(5));
    }

    #[test]
    fn bind_on_pure_applies_immediately() {
        let program: Program<Probe, i64> = Program::pure(2).bind(|n| Program::pure(n * 10));
        assert_eq!(program.into_done(), Some(20));
    }

    #[test]
    fn map_on_pure_adds_no_step() {
        let program: Program<Probe, String> = Program::pure(3).map(|n: i64| n.to_string());
        assert_eq!(program.into_done().as_deref(), Some("3"));
    }

    #[test]
    fn lift_builds_one_step() {
        let program = Probe::emit(1);
        assert!(!program.is_done());
        let next = program.peek().map(|info| info.to_string());
        assert_eq!(next.as_deref(), Some("probe::Emit(1)"));
    }

    #[test]
    fn bind_keeps_first_command_in_front() {
        let program = Probe::emit(1).bind(|_| Probe::emit(2));
        let next = program.peek().map(|info| info.detail);
        assert_eq!(next.as_deref(), Some("1"));
    }

    #[test]
    fn long_bind_chain_builds_and_drops_flat() {
        let mut program = Probe::emit(0);
        for _ in 0..100_000 {
            program = program.bind(|x| Probe::emit(x + 1));
        }
        assert_eq!(program.peek().map(|info| info.detail).as_deref(), Some("0"));
        drop(program);
    }

    #[test]
    fn debug_shows_next_command() {
        let program = Probe::emit(9);
        assert_eq!(format!("{program:?}"), "Step(\"probe::Emit(9)\")");
        let done: Program<Probe, i64> = Program::pure(1);
        assert_eq!(format!("{done:?}"), "Done(1)");
    }
}
