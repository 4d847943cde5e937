//! House orders as cooking-machine programs.

use crate::cooking::{CookingMachine, Meal, MealChoice, Served};
use crate::ingredient::{ingredients, PizzaSize};
use crate::pizza::{PizzaAlgebra, PizzaOrder, PizzaRecipe};
use crate::sandwich::{SandwichAlgebra, SandwichOrder, SandwichRecipe};
use hfm_engine::{ConstructionError, Program};
use hfm_types::TryNew;
use std::fmt;
use std::str::FromStr;

/// Components of the house sandwich, bottom to top.
pub const HOUSE_SANDWICH: &[&str] = &["Cheese", "Salt"];

/// Toppings of the house pizza.
pub const HOUSE_PIZZA: &[&str] = &["Tomato", "Mozzarella", "Basil"];

/// Baking time of the house pizza.
pub const HOUSE_PIZZA_MINUTES: u32 = 12;

/// Builds the house sandwich recipe.
///
/// # Errors
///
/// Never fails for the built-in components; the error is kept for callers
/// that pass it on.
pub fn house_sandwich() -> Result<SandwichRecipe, ConstructionError> {
    SandwichAlgebra::recipe(HOUSE_SANDWICH)
}

/// Builds the house pizza recipe.
///
/// # Errors
///
/// See [`house_sandwich`].
pub fn house_pizza() -> Result<PizzaRecipe, ConstructionError> {
    PizzaAlgebra::recipe(PizzaSize::Medium, HOUSE_PIZZA, HOUSE_PIZZA_MINUTES)
}

/// The house meal as a `MakeRandomMeal` choice.
///
/// A pizza by `maker` when one is named, otherwise the house sandwich.
///
/// # Errors
///
/// [`ConstructionError::Empty`] for a blank maker name.
pub fn house_choice(maker: Option<&str>) -> Result<MealChoice, ConstructionError> {
    let Some(maker) = maker else {
        let order = SandwichOrder::try_new(ingredients("components", HOUSE_SANDWICH)?)?;
        return Ok(MealChoice::Sandwich(order));
    };
    let maker = maker.trim();
    if maker.is_empty() {
        return Err(ConstructionError::Empty { field: "maker" });
    }
    let toppings = ingredients("toppings", HOUSE_PIZZA)?;
    Ok(MealChoice::Pizza {
        maker: Some(maker.to_string()),
        order: PizzaOrder::try_new((PizzaSize::Medium, toppings, HOUSE_PIZZA_MINUTES))?,
    })
}

/// Something a customer can order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Sandwich,
    Pizza,
    Combo,
    Random,
}

impl Order {
    pub const ALL: [Order; 4] = [Self::Sandwich, Self::Pizza, Self::Combo, Self::Random];

    /// The cooking program for this order, ending with `Serve`.
    ///
    /// `maker` picks a named pizza maker for [`Order::Pizza`]; other
    /// orders ignore it.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] for a blank maker name.
    pub fn program(
        self,
        maker: Option<&str>,
    ) -> Result<Program<CookingMachine, Served>, ConstructionError> {
        let meal: Program<CookingMachine, Meal> = match self {
            Self::Sandwich => CookingMachine::make_sandwich(house_sandwich()?).map(Meal::from),
            Self::Pizza => match maker {
                Some(maker) => CookingMachine::make_pizza_by(maker, house_pizza()?)?,
                None => CookingMachine::make_pizza(house_pizza()?),
            }
            .map(Meal::from),
            Self::Combo => CookingMachine::make_combo(house_sandwich()?, house_pizza()?),
            Self::Random => CookingMachine::make_random_meal(),
        };
        Ok(meal.bind(CookingMachine::serve))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sandwich => "sandwich",
            Self::Pizza => "pizza",
            Self::Combo => "combo",
            Self::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for Order {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|order| order.to_string() == wanted)
            .ok_or_else(|| ConstructionError::invalid("order", format!("unknown order '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_parse_roundtrip() {
        for order in Order::ALL {
            assert_eq!(order.to_string().parse::<Order>().unwrap(), order);
        }
        assert_eq!(" Combo ".parse::<Order>().unwrap(), Order::Combo);
        assert!("soup".parse::<Order>().is_err());
    }

    #[test]
    fn programs_start_with_the_right_command() {
        let first = |order: Order, maker| {
            order
                .program(maker)
                .unwrap()
                .peek()
                .map(|c| c.to_string())
                .unwrap()
        };
        assert_eq!(first(Order::Sandwich, None), "cooking::MakeSandwich");
        assert_eq!(first(Order::Pizza, Some("luigi")), "cooking::MakePizza(luigi)");
        assert_eq!(first(Order::Combo, None), "cooking::MakeCombo");
        assert_eq!(first(Order::Random, None), "cooking::MakeRandomMeal");
    }

    #[test]
    fn house_choice_follows_the_maker() {
        let choice = house_choice(None).unwrap();
        assert_eq!(choice.to_string(), "sandwich of Cheese, Salt");

        match house_choice(Some("luigi")).unwrap() {
            MealChoice::Pizza { maker, order } => {
                assert_eq!(maker.as_deref(), Some("luigi"));
                assert_eq!(order.minutes(), HOUSE_PIZZA_MINUTES);
            }
            other => panic!("expected pizza, got {other}"),
        }
        assert!(house_choice(Some("  ")).is_err());
    }

    #[test]
    fn blank_maker_is_rejected() {
        assert!(Order::Pizza.program(Some(" ")).is_err());
        assert!(Order::Sandwich.program(Some(" ")).is_ok());
    }
}
