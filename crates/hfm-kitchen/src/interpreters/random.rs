//! Cooking interpreter that improvises.

use crate::cooking::{CookingInterpreter, Meal, MealChoice};
use crate::ingredient::{Ingredient, PizzaSize};
use crate::pizza::PizzaOrder;
use crate::sandwich::SandwichOrder;
use hfm_engine::InterpreterFailure;
use hfm_types::TryNew;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

/// Ingredients the chef picks from when no pantry is given.
pub const DEFAULT_PANTRY: &[&str] = &[
    "Cheese",
    "Salt",
    "Ham",
    "Tomato",
    "Lettuce",
    "Mozzarella",
    "Basil",
    "Mushroom",
    "Olive",
];

/// Chooses random meals and hands out ticket numbers.
///
/// A seeded chef makes the same choices for the same sequence of calls.
#[derive(Debug)]
pub struct RandomChef {
    rng: Mutex<StdRng>,
    pantry: Vec<Ingredient>,
    makers: Vec<String>,
    next_ticket: AtomicU32,
}

impl RandomChef {
    /// Chef with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Chef seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        let pantry = DEFAULT_PANTRY
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        Self {
            rng: Mutex::new(rng),
            pantry,
            makers: Vec::new(),
            next_ticket: AtomicU32::new(1),
        }
    }

    /// Named pizza makers the chef may hand a pizza to. With none, pizzas
    /// go to the default pizza binding.
    #[must_use]
    pub fn with_makers<I, S>(mut self, makers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.makers = makers.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the pantry.
    #[must_use]
    pub fn with_pantry(mut self, pantry: Vec<Ingredient>) -> Self {
        self.pantry = pantry;
        self
    }

    fn pick(&self, rng: &mut StdRng, min: usize, max: usize) -> Vec<Ingredient> {
        let count = rng.gen_range(min..=max).min(self.pantry.len());
        self.pantry.choose_multiple(rng, count).cloned().collect()
    }
}

impl CookingInterpreter for RandomChef {
    fn choose_meal(&self) -> Result<MealChoice, InterpreterFailure> {
        if self.pantry.is_empty() {
            return Err(InterpreterFailure::unavailable("pantry is empty"));
        }
        let mut rng = self.rng.lock();
        let choice = if rng.gen_bool(0.5) {
            let order = SandwichOrder::try_new(self.pick(&mut rng, 1, 4))
                .map_err(|e| InterpreterFailure::failed(e.to_string()))?;
            MealChoice::Sandwich(order)
        } else {
            let size = PizzaSize::ALL
                .choose(&mut *rng)
                .copied()
                .unwrap_or(PizzaSize::Medium);
            let toppings = self.pick(&mut rng, 1, 3);
            let minutes = rng.gen_range(8..=15);
            let order = PizzaOrder::try_new((size, toppings, minutes))
                .map_err(|e| InterpreterFailure::failed(e.to_string()))?;
            let maker = self.makers.choose(&mut *rng).cloned();
            MealChoice::Pizza { maker, order }
        };
        debug!(choice = %choice, "chef improvised");
        Ok(choice)
    }

    fn serve(&self, meal: &Meal) -> Result<u32, InterpreterFailure> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        info!(ticket, meal = %meal, "served");
        Ok(ticket)
    }
}
