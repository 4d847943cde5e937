//! Interpreters for the kitchen languages.
//!
//! | Interpreter | Algebra | Behaviour |
//! |-------------|---------|-----------|
//! | [`SandwichStation`] | sandwich | stacks components, height limit |
//! | [`PizzaOven`] | pizza | named maker, optional dough stock |
//! | [`RandomChef`] | cooking | seeded random meals, ticket counter |
//! | `Mock*` | all | record calls into a shared log (`mock` feature) |

#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod production;
mod random;

pub use production::{PizzaOven, SandwichStation, DEFAULT_MAX_COMPONENTS, DEFAULT_MAX_TOPPINGS};
pub use random::{RandomChef, DEFAULT_PANTRY};
