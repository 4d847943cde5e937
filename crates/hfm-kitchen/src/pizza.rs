//! Pizza language.
//!
//! ```text
//! PrepareDough(size)             → Dough
//! AddTopping(topping, dough)     → Dough
//! Bake(dough, minutes)           → Pizza
//! ```

use crate::ingredient::{ingredients, Ingredient, PizzaSize};
use hfm_engine::{
    Algebra, CommandInfo, ConstructionError, Continuation, FailureCause, InterpreterFailure,
    Program, StepContext,
};
use hfm_types::TryNew;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accepted baking times, in minutes.
pub const BAKE_MINUTES: std::ops::RangeInclusive<u32> = 5..=30;

/// Raw pizza base with its toppings so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dough {
    pub size: PizzaSize,
    pub toppings: Vec<Ingredient>,
}

/// A baked pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pizza {
    pub size: PizzaSize,
    pub toppings: Vec<Ingredient>,
    pub baked_minutes: u32,
    /// Name of the maker whose oven baked it.
    pub maker: String,
}

impl fmt::Display for Pizza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.toppings.iter().map(Ingredient::as_str).collect();
        write!(
            f,
            "{} pizza [{}] by {}",
            self.size,
            names.join(", "),
            self.maker
        )
    }
}

/// Capability set for the pizza language.
pub trait PizzaInterpreter: Send + Sync {
    fn prepare_dough(&self, size: PizzaSize) -> Result<Dough, InterpreterFailure>;

    fn add_topping(&self, topping: Ingredient, dough: Dough) -> Result<Dough, InterpreterFailure>;

    fn bake(&self, dough: Dough, minutes: u32) -> Result<Pizza, InterpreterFailure>;
}

/// Pizza commands.
pub enum PizzaCommand<Next> {
    PrepareDough {
        size: PizzaSize,
        next: Continuation<Dough, Next>,
    },
    AddTopping {
        topping: Ingredient,
        dough: Dough,
        next: Continuation<Dough, Next>,
    },
    Bake {
        dough: Dough,
        minutes: u32,
        next: Continuation<Pizza, Next>,
    },
}

/// The pizza algebra.
#[derive(Debug)]
pub struct PizzaAlgebra;

/// A program that makes a pizza.
pub type PizzaRecipe = Program<PizzaAlgebra, Pizza>;

impl PizzaAlgebra {
    /// `PrepareDough`.
    pub fn prepare(size: PizzaSize) -> Program<Self, Dough> {
        Program::lift(PizzaCommand::PrepareDough {
            size,
            next: Continuation::identity(),
        })
    }

    /// `AddTopping`.
    pub fn top(topping: Ingredient, dough: Dough) -> Program<Self, Dough> {
        Program::lift(PizzaCommand::AddTopping {
            topping,
            dough,
            next: Continuation::identity(),
        })
    }

    /// `Bake`.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::OutOfRange`] if `minutes` is outside
    /// [`BAKE_MINUTES`].
    pub fn bake(dough: Dough, minutes: u32) -> Result<Program<Self, Pizza>, ConstructionError> {
        check_minutes(minutes)?;
        Ok(Self::bake_checked(dough, minutes))
    }

    fn bake_checked(dough: Dough, minutes: u32) -> Program<Self, Pizza> {
        Program::lift(PizzaCommand::Bake {
            dough,
            minutes,
            next: Continuation::identity(),
        })
    }

    /// Prepare, top in order, bake.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] for no toppings, an invalid topping name or a
    /// baking time outside [`BAKE_MINUTES`].
    pub fn recipe<S: AsRef<str>>(
        size: PizzaSize,
        toppings: &[S],
        minutes: u32,
    ) -> Result<PizzaRecipe, ConstructionError> {
        let toppings = ingredients("toppings", toppings)?;
        Ok(PizzaOrder::try_new((size, toppings, minutes))?.recipe())
    }

    fn layer(
        mut rest: std::vec::IntoIter<Ingredient>,
        dough: Dough,
        minutes: u32,
    ) -> Program<Self, Pizza> {
        match rest.next() {
            Some(topping) => {
                Self::top(topping, dough).bind(move |dough| Self::layer(rest, dough, minutes))
            }
            None => Self::bake_checked(dough, minutes),
        }
    }
}

fn check_minutes(minutes: u32) -> Result<(), ConstructionError> {
    if BAKE_MINUTES.contains(&minutes) {
        return Ok(());
    }
    Err(ConstructionError::OutOfRange {
        field: "minutes",
        value: i64::from(minutes),
        min: i64::from(*BAKE_MINUTES.start()),
        max: i64::from(*BAKE_MINUTES.end()),
    })
}

/// A validated pizza order: size, at least one topping, a baking time
/// within [`BAKE_MINUTES`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PizzaOrder {
    size: PizzaSize,
    toppings: Vec<Ingredient>,
    minutes: u32,
}

impl PizzaOrder {
    #[must_use]
    pub fn size(&self) -> PizzaSize {
        self.size
    }

    #[must_use]
    pub fn toppings(&self) -> &[Ingredient] {
        &self.toppings
    }

    #[must_use]
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Builds the pizza program for this order.
    pub fn recipe(&self) -> PizzaRecipe {
        let toppings = self.toppings.clone();
        let minutes = self.minutes;
        PizzaAlgebra::prepare(self.size)
            .bind(move |dough| PizzaAlgebra::layer(toppings.into_iter(), dough, minutes))
    }
}

impl TryNew for PizzaOrder {
    type Error = ConstructionError;
    type Args = (PizzaSize, Vec<Ingredient>, u32);

    fn try_new((size, toppings, minutes): Self::Args) -> Result<Self, ConstructionError> {
        if toppings.is_empty() {
            return Err(ConstructionError::Empty { field: "toppings" });
        }
        check_minutes(minutes)?;
        Ok(Self {
            size,
            toppings,
            minutes,
        })
    }
}

impl fmt::Display for PizzaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.toppings.iter().map(Ingredient::as_str).collect();
        write!(
            f,
            "{} pizza with {}, {} min",
            self.size,
            names.join(", "),
            self.minutes
        )
    }
}

impl Algebra for PizzaAlgebra {
    const NAME: &'static str = "pizza";
    type Interpreter = dyn PizzaInterpreter;
    type Command<Next: 'static> = PizzaCommand<Next>;

    fn map<N: 'static, M: 'static>(
        command: PizzaCommand<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> PizzaCommand<M> {
        match command {
            PizzaCommand::PrepareDough { size, next } => PizzaCommand::PrepareDough {
                size,
                next: next.then(f),
            },
            PizzaCommand::AddTopping {
                topping,
                dough,
                next,
            } => PizzaCommand::AddTopping {
                topping,
                dough,
                next: next.then(f),
            },
            PizzaCommand::Bake {
                dough,
                minutes,
                next,
            } => PizzaCommand::Bake {
                dough,
                minutes,
                next: next.then(f),
            },
        }
    }

    fn describe<N: 'static>(command: &PizzaCommand<N>) -> CommandInfo {
        match command {
            PizzaCommand::PrepareDough { size, .. } => {
                CommandInfo::of::<Self>("PrepareDough").with_detail(size.to_string())
            }
            PizzaCommand::AddTopping { topping, .. } => {
                CommandInfo::of::<Self>("AddTopping").with_detail(topping.as_str())
            }
            PizzaCommand::Bake { minutes, .. } => {
                CommandInfo::of::<Self>("Bake").with_detail(format!("{minutes} min"))
            }
        }
    }

    fn dispatch<N: 'static>(
        command: PizzaCommand<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause> {
        let maker = cx.interpreter();
        match command {
            PizzaCommand::PrepareDough { size, next } => Ok(next.resume(maker.prepare_dough(size)?)),
            PizzaCommand::AddTopping {
                topping,
                dough,
                next,
            } => Ok(next.resume(maker.add_topping(topping, dough)?)),
            PizzaCommand::Bake {
                dough,
                minutes,
                next,
            } => Ok(next.resume(maker.bake(dough, minutes)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hfm_types::ErrorCode;

    #[test]
    fn bake_time_is_range_checked() {
        let dough = Dough {
            size: PizzaSize::Small,
            toppings: vec![],
        };
        let err = PizzaAlgebra::bake(dough.clone(), 90).err().unwrap();
        assert_eq!(
            err,
            ConstructionError::OutOfRange {
                field: "minutes",
                value: 90,
                min: 5,
                max: 30
            }
        );
        assert!(PizzaAlgebra::bake(dough, 12).is_ok());
    }

    #[test]
    fn recipe_requires_toppings() {
        let none: [&str; 0] = [];
        let err = PizzaAlgebra::recipe(PizzaSize::Large, &none, 10).err().unwrap();
        assert_eq!(err.code(), "CONSTRUCTION_EMPTY");
    }

    #[test]
    fn recipe_first_command() {
        let recipe = PizzaAlgebra::recipe(PizzaSize::Medium, &["Tomato", "Basil"], 12).unwrap();
        assert_eq!(
            recipe.peek().map(|c| c.to_string()).as_deref(),
            Some("pizza::PrepareDough(medium)")
        );
    }

    #[test]
    fn order_validates_all_fields() {
        let basil: Ingredient = "Basil".parse().unwrap();
        assert!(PizzaOrder::try_new((PizzaSize::Small, vec![basil.clone()], 8)).is_ok());
        assert!(PizzaOrder::try_new((PizzaSize::Small, vec![], 8)).is_err());
        assert!(PizzaOrder::try_new((PizzaSize::Small, vec![basil], 4)).is_err());
    }

    #[test]
    fn pizza_display() {
        let pizza = Pizza {
            size: PizzaSize::Large,
            toppings: vec!["Tomato".parse().unwrap()],
            baked_minutes: 10,
            maker: "luigi".into(),
        };
        assert_eq!(pizza.to_string(), "large pizza [Tomato] by luigi");
    }
}
