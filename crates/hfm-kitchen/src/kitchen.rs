//! Registry assembly for the kitchen languages.

use crate::cooking::CookingMachine;
use crate::interpreters::{PizzaOven, RandomChef, SandwichStation};
use crate::pizza::PizzaAlgebra;
use crate::sandwich::SandwichAlgebra;
use hfm_engine::InterpreterRegistry;
use std::sync::Arc;

/// Maker name of the default pizza binding.
pub const HOUSE_MAKER: &str = "house";

/// Builder for a production interpreter registry.
///
/// Binds a [`SandwichStation`], a default [`PizzaOven`] named
/// [`HOUSE_MAKER`], one named oven per pizza maker, and a
/// [`RandomChef`] that may hand pizzas to those makers.
///
/// # Example
///
/// ```
/// use hfm_kitchen::{Kitchen, PizzaAlgebra};
///
/// let registry = Kitchen::new()
///     .with_makers(["luigi", "mario"])
///     .with_seed(7)
///     .registry();
/// assert!(registry.is_bound::<PizzaAlgebra>(Some("luigi")));
/// assert_eq!(registry.selectors::<PizzaAlgebra>(), vec!["luigi", "mario"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Kitchen {
    makers: Vec<String>,
    seed: Option<u64>,
    dough_stock: Option<u32>,
    max_components: Option<usize>,
}

impl Kitchen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds named pizza makers (the `PizzaMakers` dictionary).
    #[must_use]
    pub fn with_makers<I, S>(mut self, makers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.makers.extend(makers.into_iter().map(Into::into));
        self
    }

    /// Seeds the chef for reproducible random meals.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Limits the dough each oven can prepare.
    #[must_use]
    pub fn with_dough_stock(mut self, portions: u32) -> Self {
        self.dough_stock = Some(portions);
        self
    }

    /// Limits sandwich height.
    #[must_use]
    pub fn with_max_components(mut self, max: usize) -> Self {
        self.max_components = Some(max);
        self
    }

    /// Maker names, in the order they were added.
    #[must_use]
    pub fn makers(&self) -> &[String] {
        &self.makers
    }

    fn oven(&self, maker: &str) -> PizzaOven {
        let oven = PizzaOven::new(maker);
        match self.dough_stock {
            Some(portions) => oven.with_dough_stock(portions),
            None => oven,
        }
    }

    /// Builds the registry.
    #[must_use]
    pub fn registry(&self) -> InterpreterRegistry {
        let station = match self.max_components {
            Some(max) => SandwichStation::new().with_max_components(max),
            None => SandwichStation::new(),
        };
        let chef = match self.seed {
            Some(seed) => RandomChef::seeded(seed),
            None => RandomChef::from_entropy(),
        }
        .with_makers(self.makers.iter().cloned());

        let mut registry = InterpreterRegistry::new()
            .with::<SandwichAlgebra>(Arc::new(station))
            .with::<PizzaAlgebra>(Arc::new(self.oven(HOUSE_MAKER)))
            .with::<CookingMachine>(Arc::new(chef));
        for maker in &self.makers {
            registry.bind_named::<PizzaAlgebra>(maker.as_str(), Arc::new(self.oven(maker)));
        }
        registry
    }
}
