//! Recording interpreters for tests and dry runs.
//!
//! Every call is written to a shared [`CallLog`], so a test can assert
//! the exact order in which commands reached the interpreters, across
//! languages.

use crate::cooking::{CookingInterpreter, CookingMachine, Meal, MealChoice};
use crate::ingredient::{Ingredient, PizzaSize};
use crate::kitchen::HOUSE_MAKER;
use crate::pizza::{Dough, Pizza, PizzaAlgebra, PizzaInterpreter};
use crate::sandwich::{Sandwich, SandwichAlgebra, SandwichBody, SandwichInterpreter};
use hfm_engine::{CallLog, InterpreterFailure, InterpreterRegistry};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Registry of recording interpreters sharing `log`.
///
/// The default pizza maker records as [`HOUSE_MAKER`]; every name in
/// `makers` gets its own named binding.
pub fn registry(
    log: &CallLog,
    makers: &[&str],
    choice: Option<MealChoice>,
) -> InterpreterRegistry {
    let mut registry = InterpreterRegistry::new()
        .with::<SandwichAlgebra>(Arc::new(MockSandwichMaker::new(log.clone())))
        .with::<PizzaAlgebra>(Arc::new(MockPizzaMaker::new(HOUSE_MAKER, log.clone())))
        .with::<CookingMachine>(Arc::new(MockMachine::new(choice, log.clone())));
    for maker in makers {
        let pizza_maker = MockPizzaMaker::new(*maker, log.clone());
        registry.bind_named::<PizzaAlgebra>(*maker, Arc::new(pizza_maker));
    }
    registry
}

/// Sandwich interpreter that records and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct MockSandwichMaker {
    log: CallLog,
}

impl MockSandwichMaker {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl SandwichInterpreter for MockSandwichMaker {
    fn start_new_sandwich(&self) -> Result<SandwichBody, InterpreterFailure> {
        self.log.record("sandwich.start");
        Ok(SandwichBody::default())
    }

    fn add_component(
        &self,
        component: Ingredient,
        mut body: SandwichBody,
    ) -> Result<SandwichBody, InterpreterFailure> {
        self.log.record(format!("sandwich.add({component})"));
        body.components.push(component);
        Ok(body)
    }

    fn finish_sandwich(&self, body: SandwichBody) -> Result<Sandwich, InterpreterFailure> {
        self.log.record("sandwich.finish");
        Ok(Sandwich {
            components: body.components,
        })
    }
}

/// Pizza interpreter that records under its maker name.
///
/// A configured failure is returned by `PrepareDough` for the next
/// `times` calls.
#[derive(Debug)]
pub struct MockPizzaMaker {
    name: String,
    log: CallLog,
    failure: Mutex<Option<(InterpreterFailure, u32)>>,
}

impl MockPizzaMaker {
    #[must_use]
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            failure: Mutex::new(None),
        }
    }

    /// Fails `PrepareDough` the next `times` calls with `failure`.
    #[must_use]
    pub fn failing(self, failure: InterpreterFailure, times: u32) -> Self {
        *self.failure.lock() = Some((failure, times));
        self
    }

    fn take_failure(&self) -> Option<InterpreterFailure> {
        let mut slot = self.failure.lock();
        let (failure, left) = slot.as_mut()?;
        if *left == 0 {
            return None;
        }
        *left -= 1;
        Some(failure.clone())
    }
}

impl PizzaInterpreter for MockPizzaMaker {
    fn prepare_dough(&self, size: PizzaSize) -> Result<Dough, InterpreterFailure> {
        self.log.record(format!("{}.dough({size})", self.name));
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }
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
        self.log.record(format!("{}.top({topping})", self.name));
        dough.toppings.push(topping);
        Ok(dough)
    }

    fn bake(&self, dough: Dough, minutes: u32) -> Result<Pizza, InterpreterFailure> {
        self.log.record(format!("{}.bake({minutes})", self.name));
        Ok(Pizza {
            size: dough.size,
            toppings: dough.toppings,
            baked_minutes: minutes,
            maker: self.name.clone(),
        })
    }
}

/// Cooking interpreter with a scripted random choice.
#[derive(Debug)]
pub struct MockMachine {
    choice: Option<MealChoice>,
    log: CallLog,
    next_ticket: AtomicU32,
}

impl MockMachine {
    /// Machine whose `MakeRandomMeal` always picks `choice`.
    #[must_use]
    pub fn new(choice: Option<MealChoice>, log: CallLog) -> Self {
        Self {
            choice,
            log,
            next_ticket: AtomicU32::new(1),
        }
    }
}

impl CookingInterpreter for MockMachine {
    fn choose_meal(&self) -> Result<MealChoice, InterpreterFailure> {
        self.log.record("machine.choose");
        self.choice
            .clone()
            .ok_or_else(|| InterpreterFailure::rejected("no meal scripted"))
    }

    fn serve(&self, meal: &Meal) -> Result<u32, InterpreterFailure> {
        self.log.record(format!("machine.serve({meal})"));
        Ok(self.next_ticket.fetch_add(1, Ordering::Relaxed))
    }
}
