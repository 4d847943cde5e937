//! Kitchen languages for the HFM engine.
//!
//! Three algebras, two of them nested inside the third:
//!
//! ```text
//! CookingMachine ──┬── MakeSandwich(Program<SandwichAlgebra>)
//!                  ├── MakePizza(maker?, Program<PizzaAlgebra>)
//!                  ├── MakeCombo(sandwich, pizza)   (in parallel)
//!                  ├── MakeRandomMeal               (chosen while running)
//!                  └── Serve(meal)
//! ```
//!
//! Each algebra has its own interpreter trait. The [`Kitchen`] builder
//! binds the production interpreters; `interpreters::mock` (feature
//! `mock`) binds recording ones. The programs are the same either way.
//!
//! # Example
//!
//! ```
//! use hfm_engine::Engine;
//! use hfm_kitchen::{Kitchen, Meal, Order};
//!
//! let program = Order::Sandwich.program(None)?;
//! let served = Engine::new().execute(program, &Kitchen::new().with_seed(1).registry())?;
//!
//! assert_eq!(served.ticket, 1);
//! assert_eq!(served.meal.to_string(), "sandwich [Cheese, Salt]");
//! assert!(matches!(served.meal, Meal::Sandwich(_)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cooking;
mod ingredient;
pub mod interpreters;
mod kitchen;
mod menu;
mod pizza;
mod sandwich;

pub use cooking::{CookingCommand, CookingInterpreter, CookingMachine, Meal, MealChoice, Served};
pub use ingredient::{ingredients, Ingredient, PizzaSize, MAX_INGREDIENT_LEN};
pub use kitchen::{Kitchen, HOUSE_MAKER};
pub use menu::{
    house_choice, house_pizza, house_sandwich, Order, HOUSE_PIZZA, HOUSE_PIZZA_MINUTES,
    HOUSE_SANDWICH,
};
pub use pizza::{
    Dough, Pizza, PizzaAlgebra, PizzaCommand, PizzaInterpreter, PizzaOrder, PizzaRecipe,
    BAKE_MINUTES,
};
pub use sandwich::{
    Sandwich, SandwichAlgebra, SandwichBody, SandwichCommand, SandwichInterpreter, SandwichOrder,
    SandwichRecipe,
};
