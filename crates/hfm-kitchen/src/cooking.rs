//! Cooking-machine language.
//!
//! The parent language of the kitchen. Its commands embed complete
//! sandwich and pizza programs, which the engine runs with the sandwich
//! and pizza interpreters; the cooking interpreter itself only chooses
//! random meals and serves.
//!
//! ```text
//! MakeSandwich(Program<Sandwich>)         → Sandwich
//! MakePizza(maker?, Program<Pizza>)       → Pizza       (PizzaMakers by name)
//! MakeCombo(Program<Sandwich>, Program<Pizza>) → Meal   (children in parallel)
//! MakeRandomMeal                          → Meal        (chosen while running)
//! Serve(meal)                             → Served
//! ```
//!
//! `MakeRandomMeal` runs its child under the failure policy of the
//! chosen algebra; a recovered failure becomes [`Meal::Unavailable`].

use crate::pizza::{Pizza, PizzaOrder, PizzaRecipe};
use crate::sandwich::{Sandwich, SandwichOrder, SandwichRecipe};
use hfm_engine::{
    Algebra, ChildOutcome, CommandInfo, ConstructionError, Continuation, FailureCause,
    InterpreterFailure, Program, StepContext,
};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Whatever the machine produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Meal {
    Sandwich(Sandwich),
    Pizza(Pizza),
    Combo { sandwich: Sandwich, pizza: Pizza },
    /// A supervised child failed and its policy recovered the failure.
    Unavailable { reason: String },
}

impl Meal {
    /// Returns `true` unless the meal is [`Unavailable`](Self::Unavailable).
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandwich(sandwich) => write!(f, "{sandwich}"),
            Self::Pizza(pizza) => write!(f, "{pizza}"),
            Self::Combo { sandwich, pizza } => write!(f, "combo: {sandwich} + {pizza}"),
            Self::Unavailable { reason } => write!(f, "meal unavailable ({reason})"),
        }
    }
}

impl From<Sandwich> for Meal {
    fn from(value: Sandwich) -> Self {
        Self::Sandwich(value)
    }
}

impl From<Pizza> for Meal {
    fn from(value: Pizza) -> Self {
        Self::Pizza(value)
    }
}

/// A served meal with its ticket number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Served {
    pub ticket: u32,
    pub meal: Meal,
}

impl fmt::Display for Served {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.ticket, self.meal)
    }
}

/// What `MakeRandomMeal` turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MealChoice {
    Sandwich(SandwichOrder),
    Pizza {
        /// Named pizza maker; `None` uses the default binding.
        maker: Option<String>,
        order: PizzaOrder,
    },
}

impl fmt::Display for MealChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandwich(order) => write!(f, "{order}"),
            Self::Pizza {
                maker: Some(maker),
                order,
            } => write!(f, "{order} by {maker}"),
            Self::Pizza { maker: None, order } => write!(f, "{order}"),
        }
    }
}

/// Capability set for the cooking machine itself.
pub trait CookingInterpreter: Send + Sync {
    /// Picks the meal for `MakeRandomMeal`.
    fn choose_meal(&self) -> Result<MealChoice, InterpreterFailure>;

    /// Hands a meal to the customer, returning the ticket number.
    fn serve(&self, meal: &Meal) -> Result<u32, InterpreterFailure>;
}

/// Cooking-machine commands.
pub enum CookingCommand<Next> {
    MakeSandwich {
        recipe: SandwichRecipe,
        next: Continuation<Sandwich, Next>,
    },
    MakePizza {
        maker: Option<String>,
        recipe: PizzaRecipe,
        next: Continuation<Pizza, Next>,
    },
    MakeCombo {
        sandwich: SandwichRecipe,
        pizza: PizzaRecipe,
        next: Continuation<Meal, Next>,
    },
    MakeRandomMeal {
        next: Continuation<Meal, Next>,
    },
    Serve {
        meal: Meal,
        next: Continuation<Served, Next>,
    },
}

/// The cooking-machine algebra.
#[derive(Debug)]
pub struct CookingMachine;

impl CookingMachine {
    /// `MakeSandwich`.
    pub fn make_sandwich(recipe: SandwichRecipe) -> Program<Self, Sandwich> {
        Program::lift(CookingCommand::MakeSandwich {
            recipe,
            next: Continuation::identity(),
        })
    }

    /// `MakePizza` with the default pizza maker.
    pub fn make_pizza(recipe: PizzaRecipe) -> Program<Self, Pizza> {
        Program::lift(CookingCommand::MakePizza {
            maker: None,
            recipe,
            next: Continuation::identity(),
        })
    }

    /// `MakePizza` with the pizza maker registered as `maker`.
    ///
    /// # Errors
    ///
    /// [`ConstructionError::Empty`] for a blank maker name.
    pub fn make_pizza_by(
        maker: &str,
        recipe: PizzaRecipe,
    ) -> Result<Program<Self, Pizza>, ConstructionError> {
        let maker = maker.trim();
        if maker.is_empty() {
            return Err(ConstructionError::Empty { field: "maker" });
        }
        Ok(Program::lift(CookingCommand::MakePizza {
            maker: Some(maker.to_string()),
            recipe,
            next: Continuation::identity(),
        }))
    }

    /// `MakeCombo`.
    pub fn make_combo(sandwich: SandwichRecipe, pizza: PizzaRecipe) -> Program<Self, Meal> {
        Program::lift(CookingCommand::MakeCombo {
            sandwich,
            pizza,
            next: Continuation::identity(),
        })
    }

    /// `MakeRandomMeal`.
    pub fn make_random_meal() -> Program<Self, Meal> {
        Program::lift(CookingCommand::MakeRandomMeal {
            next: Continuation::identity(),
        })
    }

    /// `Serve`.
    pub fn serve(meal: Meal) -> Program<Self, Served> {
        Program::lift(CookingCommand::Serve {
            meal,
            next: Continuation::identity(),
        })
    }
}

fn settle<T>(outcome: ChildOutcome<T>, meal: impl FnOnce(T) -> Meal) -> Meal {
    match outcome {
        ChildOutcome::Completed(value) => meal(value),
        ChildOutcome::Recovered(err) => Meal::Unavailable {
            reason: err.root_cause().to_string(),
        },
    }
}

impl Algebra for CookingMachine {
    const NAME: &'static str = "cooking";
    type Interpreter = dyn CookingInterpreter;
    type Command<Next: 'static> = CookingCommand<Next>;

    fn map<N: 'static, M: 'static>(
        command: CookingCommand<N>,
        f: impl FnOnce(N) -> M + Send + 'static,
    ) -> CookingCommand<M> {
        match command {
            CookingCommand::MakeSandwich { recipe, next } => CookingCommand::MakeSandwich {
                recipe,
                next: next.then(f),
            },
            CookingCommand::MakePizza {
                maker,
                recipe,
                next,
            } => CookingCommand::MakePizza {
                maker,
                recipe,
                next: next.then(f),
            },
            CookingCommand::MakeCombo {
                sandwich,
                pizza,
                next,
            } => CookingCommand::MakeCombo {
                sandwich,
                pizza,
                next: next.then(f),
            },
            CookingCommand::MakeRandomMeal { next } => CookingCommand::MakeRandomMeal {
                next: next.then(f),
            },
            CookingCommand::Serve { meal, next } => CookingCommand::Serve {
                meal,
                next: next.then(f),
            },
        }
    }

    fn describe<N: 'static>(command: &CookingCommand<N>) -> CommandInfo {
        match command {
            CookingCommand::MakeSandwich { .. } => CommandInfo::of::<Self>("MakeSandwich"),
            CookingCommand::MakePizza { maker, .. } => {
                let info = CommandInfo::of::<Self>("MakePizza");
                match maker {
                    Some(maker) => info.with_detail(maker.as_str()),
                    None => info,
                }
            }
            CookingCommand::MakeCombo { .. } => CommandInfo::of::<Self>("MakeCombo"),
            CookingCommand::MakeRandomMeal { .. } => CommandInfo::of::<Self>("MakeRandomMeal"),
            CookingCommand::Serve { meal, .. } => {
                CommandInfo::of::<Self>("Serve").with_detail(meal.to_string())
            }
        }
    }

    fn dispatch<N: 'static>(
        command: CookingCommand<N>,
        cx: &StepContext<'_, Self>,
    ) -> Result<N, FailureCause> {
        match command {
            CookingCommand::MakeSandwich { recipe, next } => Ok(next.resume(cx.run_child(recipe)?)),
            CookingCommand::MakePizza {
                maker,
                recipe,
                next,
            } => {
                let pizza = match maker {
                    Some(maker) => cx.run_child_as(&maker, recipe)?,
                    None => cx.run_child(recipe)?,
                };
                Ok(next.resume(pizza))
            }
            CookingCommand::MakeCombo {
                sandwich,
                pizza,
                next,
            } => {
                let (sandwich, pizza) = cx.join_children(sandwich, pizza)?;
                Ok(next.resume(Meal::Combo { sandwich, pizza }))
            }
            CookingCommand::MakeRandomMeal { next } => {
                let choice = cx.interpreter().choose_meal()?;
                debug!(choice = %choice, "random meal chosen");
                let meal = match choice {
                    MealChoice::Sandwich(order) => {
                        settle(cx.supervise_child(None, || order.recipe())?, Meal::Sandwich)
                    }
                    MealChoice::Pizza { maker, order } => settle(
                        cx.supervise_child(maker.as_deref(), || order.recipe())?,
                        Meal::Pizza,
                    ),
                };
                Ok(next.resume(meal))
            }
            CookingCommand::Serve { meal, next } => {
                let ticket = cx.interpreter().serve(&meal)?;
                Ok(next.resume(Served { ticket, meal }))
            }
        }
    }
}
