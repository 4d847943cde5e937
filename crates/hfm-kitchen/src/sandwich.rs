//! Sandwich language.
//!
//! ```text
//! StartNewSandwich                  → SandwichBody
//! AddComponent(component, body)     → SandwichBody
//! FinishSandwich(body)              → Sandwich
//! ```
//!
//! The body returned by one command is the input of the next, so a
//! component cannot be added before a sandwich was started.

use crate::ingredient::{ingredients, Ingredient};
use hfm_engine::{
    Algebra, CommandInfo, ConstructionError, Continuation, FailureCause, InterpreterFailure,
    Program, StepContext,
};
use hfm_types::TryNew;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sandwich being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SandwichBody {
    /// Components in the order they were added.
    pub components: Vec<Ingredient>,
}

/// A finished sandwich.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sandwich {
    /// Components, bottom to top.
    pub components: Vec<Ingredient>,
}

impl fmt::Display for Sandwich {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.components.iter().map(Ingredient::as_str).collect();
        write!(f, "sandwich [{}]", names.join(", "))
    }
}

/// Capability set for the sandwich language.
pub trait SandwichInterpreter: Send + Sync {
    /// Starts an empty sandwich.
    fn start_new_sandwich(&self) -> Result<SandwichBody, InterpreterFailure>;

    /// Puts `component` on top of `body`.
    fn add_component(
        &self,
        component: Ingredient,
        body: SandwichBody,
    ) -> Result<SandwichBody, InterpreterFailure>;

    /// Closes the sandwich.
    fn finish_sandwich(&self, body: SandwichBody) -> Result<Sandwich, InterpreterFailure>;
}

/// Sandwich commands.
pub enum SandwichCommand<Next> {
    StartNewSandwich {
        next: Continuation<SandwichBody, Next>,
    },
    AddComponent {
        component: Ingredient,
        body: SandwichBody,
        next: Continuation<SandwichBody, Next>,
    },
    FinishSandwich {
        body: SandwichBody,
        next: Continuation<Sandwich, Next>,
    },
}

/// The sandwich algebra.
#[derive(Debug)]
pub struct SandwichAlgebra;

/// A program that makes a sandwich.
pub type SandwichRecipe = Program<SandwichAlgebra, Sandwich>;

impl SandwichAlgebra {
    /// `StartNewSandwich`.
    pub fn start() -> Program<Self, SandwichBody> {
        Program::lift(SandwichCommand::StartNewSandwich {
            next: Continuation::identity(),
        })
    }

    /// `AddComponent` with an already validated component.
    pub fn add(component: Ingredient, body: SandwichBody) -> Program<Self, SandwichBody> {
        Program::lift(SandwichCommand::AddComponent {
            component,
            body,
            next: Continuation::identity(),
        })
    }

    /// `AddComponent` from a component name.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] if `name` is not a valid ingredient.
    pub fn add_component(
        name: &str,
        body: SandwichBody,
    ) -> Result<Program<Self, SandwichBody>, ConstructionError> {
        Ok(Self::add(name.parse()?, body))
    }

    /// `FinishSandwich`.
    pub fn finish(body: SandwichBody) -> Program<Self, Sandwich> {
        Program::lift(SandwichCommand::FinishSandwich {
            body,
            next: Continuation::identity(),
        })
    }

    /// Start, add every component in order, finish.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] for an empty list or an invalid name; no
    /// program is built in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use hfm_kitchen::SandwichAlgebra;
    ///
    /// let recipe = SandwichAlgebra::recipe(&["Cheese", "Salt"])?;
    /// assert_eq!(recipe.peek().map(|c| c.name), Some("StartNewSandwich"));
    /// assert!(SandwichAlgebra::recipe(&[] as &[&str]).is_err());
    /// # Ok::<(), hfm_engine::ConstructionError>(())
    /// ```
    pub fn recipe<S: AsRef<str>>(components: &[S]) -> Result<SandwichRecipe, ConstructionError> {
        Ok(SandwichOrder::try_new(ingredients("components", components)?)?.recipe())
    }

    fn stack(
        mut rest: std::vec::IntoIter<Ingredient>,
        body: SandwichBody,
    ) -> Program<Self, Sandwich> {
        match rest.next() {
            Some(component) => Self::add(component, body).bind(move |body| Self::stack(rest, body)),
            None => Self::finish(body),
        }
    }
}

/// A validated sandwich order: at least one component.
///
/// [`recipe`](Self::recipe) can be called any number of times, which is
/// what a retried child program needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SandwichOrder {
    components: Vec<Ingredient>,
}

impl SandwichOrder {
    /// Components in order.
    #[must_use]
    pub fn components(&self) -> &[Ingredient] {
        &self.components
    }

    /// Builds the sandwich program for this order.
    pub fn recipe(&self) -> SandwichRecipe {
        let components = self.components.clone();
        SandwichAlgebra::start()
            .bind(move |body| SandwichAlgebra::stack(components.into_iter(), body))
    }
}

impl TryNew for SandwichOrder {
    type Error = ConstructionError;
    type Args = Vec<Ingredient>;

    fn try_new(components: Vec<Ingredient>) -> Result<Self, ConstructionError> {
        if components.is_empty() {
            return Err(ConstructionError::Empty {
                field: "components",
            });
        }
        Ok(Self { components })
    }
}

impl fmt::Display for SandwichOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.components.iter().map(Ingredient::as_str).collect();
        write!(f, "sandwich of {}", names.join(", "))
    }
}

impl Algebra for SandwichAlgebra {
    const NAME: &'static str = "sandwich";
    type Interpreter = dyn SandwichInterpreter;
    type Command<Next: 'static> = SandwichCommand<Next>;

    fn map<N: 'static, M: 'static>(
        command: SandwichCommand<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> SandwichCommand<M> {
        match command {
            SandwichCommand::StartNewSandwich { next } => SandwichCommand::StartNewSandwich {
                next: next.then(f),
            },
            SandwichCommand::AddComponent {
                component,
                body,
                next,
            } => SandwichCommand::AddComponent {
                component,
                body,
                next: next.then(f),
            },
            SandwichCommand::FinishSandwich { body, next } => SandwichCommand::FinishSandwich {
                body,
                next: next.then(f),
            },
        }
    }

    fn describe<N: 'static>(command: &SandwichCommand<N>) -> CommandInfo {
        match command {
            SandwichCommand::StartNewSandwich { .. } => CommandInfo::of::<Self>("StartNewSandwich"),
            SandwichCommand::AddComponent { component, .. } => {
                CommandInfo::of::<Self>("AddComponent").with_detail(component.as_str())
            }
            SandwichCommand::FinishSandwich { body, .. } => CommandInfo::of::<Self>("FinishSandwich")
                .with_detail(format!("{} components", body.components.len())),
        }
    }

    fn dispatch<N: 'static>(
        command: SandwichCommand<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause> {
        let maker = cx.interpreter();
        match command {
            SandwichCommand::StartNewSandwich { next } => Ok(next.resume(maker.start_new_sandwich()?)),
            SandwichCommand::AddComponent {
                component,
                body,
                next,
            } => Ok(next.resume(maker.add_component(component, body)?)),
            SandwichCommand::FinishSandwich { body, next } => {
                Ok(next.resume(maker.finish_sandwich(body)?))
            }
        }
    }
}
