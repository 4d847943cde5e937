//! Production interpreters for the sandwich and pizza languages.

use crate::ingredient::{Ingredient, PizzaSize};
use crate::pizza::{Dough, Pizza, PizzaInterpreter};
use crate::sandwich::{Sandwich, SandwichBody, SandwichInterpreter};
use hfm_engine::InterpreterFailure;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Default limit of components per sandwich.
pub const DEFAULT_MAX_COMPONENTS: usize = 12;

/// Default limit of toppings per pizza.
pub const DEFAULT_MAX_TOPPINGS: usize = 8;

/// Sandwich station with a height limit.
#[derive(Debug, Clone)]
pub struct SandwichStation {
    max_components: usize,
}

impl Default for SandwichStation {
    fn default() -> Self {
        Self {
            max_components: DEFAULT_MAX_COMPONENTS,
        }
    }
}

impl SandwichStation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse sandwiches taller than `max` components.
    #[must_use]
    pub fn with_max_components(mut self, max: usize) -> Self {
        self.max_components = max;
        self
    }
}

impl SandwichInterpreter for SandwichStation {
    fn start_new_sandwich(&self) -> Result<SandwichBody, InterpreterFailure> {
        debug!("sandwich started");
        Ok(SandwichBody::default())
    }

    fn add_component(
        &self,
        component: Ingredient,
        mut body: SandwichBody,
    ) -> Result<SandwichBody, InterpreterFailure> {
        if body.components.len() >= self.max_components {
            return Err(InterpreterFailure::rejected(format!(
                "sandwich already has {} components",
                self.max_components
            )));
        }
        debug!(component = %component, "component added");
        body.components.push(component);
        Ok(body)
    }

    fn finish_sandwich(&self, body: SandwichBody) -> Result<Sandwich, InterpreterFailure> {
        if body.components.is_empty() {
            return Err(InterpreterFailure::rejected("nothing between the bread"));
        }
        info!(components = body.components.len(), "sandwich finished");
        Ok(Sandwich {
            components: body.components,
        })
    }
}

/// A named pizza maker's oven.
///
/// With a dough stock set, each `PrepareDough` uses one portion; once the
/// stock is gone the maker reports [`InterpreterFailure::Unavailable`],
/// a recoverable failure.
#[derive(Debug)]
pub struct PizzaOven {
    maker: String,
    max_toppings: usize,
    dough_stock: Mutex<Option<u32>>,
}

impl PizzaOven {
    /// Oven of the maker called `maker`, with unlimited dough.
    #[must_use]
    pub fn new(maker: impl Into<String>) -> Self {
        Self {
            maker: maker.into(),
            max_toppings: DEFAULT_MAX_TOPPINGS,
            dough_stock: Mutex::new(None),
        }
    }

    /// Limits the number of doughs this oven can prepare.
    #[must_use]
    pub fn with_dough_stock(self, portions: u32) -> Self {
        *self.dough_stock.lock() = Some(portions);
        self
    }

    /// Maker name.
    #[must_use]
    pub fn maker(&self) -> &str {
        &self.maker
    }

    /// Remaining dough portions; `None` is unlimited.
    #[must_use]
    pub fn dough_left(&self) -> Option<u32> {
        *self.dough_stock.lock()
    }
}

impl PizzaInterpreter for PizzaOven {
    fn prepare_dough(&self, size: PizzaSize) -> Result<Dough, InterpreterFailure> {
        let mut stock = self.dough_stock.lock();
        if let Some(left) = stock.as_mut() {
            if *left == 0 {
                return Err(InterpreterFailure::unavailable(format!(
                    "{} is out of dough",
                    self.maker
                )));
            }
            *left -= 1;
        }
        debug!(maker = %self.maker, size = %size, "dough prepared");
        Ok(Dough {
            size,
            toppings: Vec::new(),
        })
    }

    fn add_topping(
        &self,
        topping: Ingredient,
        mut dough: Dough,
    ) -> Result<Dough, InterpreterFailure> {
        if dough.toppings.len() >= self.max_toppings {
            return Err(InterpreterFailure::rejected(format!(
                "more than {} toppings",
                self.max_toppings
            )));
        }
        debug!(maker = %self.maker, topping = %topping, "topping added");
        dough.toppings.push(topping);
        Ok(dough)
    }

    fn bake(&self, dough: Dough, minutes: u32) -> Result<Pizza, InterpreterFailure> {
        info!(maker = %self.maker, size = %dough.size, minutes, "pizza baked");
        Ok(Pizza {
            size: dough.size,
            toppings: dough.toppings,
            baked_minutes: minutes,
            maker: self.maker.clone(),
        })
    }
}
