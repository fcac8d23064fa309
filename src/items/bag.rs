//! The player's bag
//!
//! Items are kept as stacks in the order they were first obtained.

use serde::{Deserialize, Serialize};

/// Largest quantity a single stack can hold
pub const MAX_STACK: u32 = 999;

/// A quantity of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: u32,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_id: u32, quantity: u32) -> Self {
        Self { item_id, quantity }
    }
}

/// Ordered item stacks
///
/// Deserializing rejects empty or overfull stacks and repeated item ids, so a
/// loaded bag upholds the same limits as one built through `add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemStack>", into = "Vec<ItemStack>")]
pub struct Bag {
    stacks: Vec<ItemStack>,
}

impl Bag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items, merging into an existing stack
    /// Returns how many were actually added (stacks cap at `MAX_STACK`)
    pub fn add(&mut self, item_id: u32, quantity: u32) -> u32 {
        if quantity == 0 {
            return 0;
        }
        let stack = match self.stacks.iter_mut().position(|s| s.item_id == item_id) {
            Some(i) => &mut self.stacks[i],
            None => {
                self.stacks.push(ItemStack::new(item_id, 0));
                let last = self.stacks.len() - 1;
                &mut self.stacks[last]
            }
        };
        let added = quantity.min(MAX_STACK.saturating_sub(stack.quantity));
        stack.quantity += added;
        added
    }

    /// Remove items; fails without change if there are not enough
    pub fn remove(&mut self, item_id: u32, quantity: u32) -> bool {
        let Some(i) = self.stacks.iter().position(|s| s.item_id == item_id) else {
            return false;
        };
        if self.stacks[i].quantity < quantity {
            return false;
        }
        self.stacks[i].quantity -= quantity;
        if self.stacks[i].quantity == 0 {
            self.stacks.remove(i);
        }
        true
    }

    /// How many of an item the player holds
    pub fn count(&self, item_id: u32) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl TryFrom<Vec<ItemStack>> for Bag {
    type Error = String;

    fn try_from(stacks: Vec<ItemStack>) -> Result<Self, Self::Error> {
        for (i, stack) in stacks.iter().enumerate() {
            if stack.quantity == 0 || stack.quantity > MAX_STACK {
                return Err(format!(
                    "item {} has quantity {}, expected 1..={}",
                    stack.item_id, stack.quantity, MAX_STACK
                ));
            }
            if stacks[..i].iter().any(|s| s.item_id == stack.item_id) {
                return Err(format!("item {} appears in more than one stack", stack.item_id));
            }
        }
        Ok(Self { stacks })
    }
}

impl From<Bag> for Vec<ItemStack> {
    fn from(bag: Bag) -> Self {
        bag.stacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_stacks() {
        let mut bag = Bag::new();
        bag.add(4, 5);
        bag.add(17, 1);
        bag.add(4, 3);
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.count(4), 8);
        assert_eq!(bag.stacks()[0].item_id, 4);
    }

    #[test]
    fn test_add_caps_at_max_stack() {
        let mut bag = Bag::new();
        assert_eq!(bag.add(1, MAX_STACK - 2), MAX_STACK - 2);
        assert_eq!(bag.add(1, 10), 2);
        assert_eq!(bag.count(1), MAX_STACK);
    }

    #[test]
    fn test_remove_drops_empty_stack() {
        let mut bag = Bag::new();
        bag.add(190, 2);
        assert!(!bag.remove(190, 3));
        assert!(bag.remove(190, 2));
        assert!(bag.is_empty());
        assert!(!bag.remove(190, 1));
    }

    #[test]
    fn test_json_enforces_stack_limits() {
        let mut bag = Bag::new();
        bag.add(4, MAX_STACK);
        bag.add(17, 1);
        let json = serde_json::to_string(&bag).unwrap();
        assert_eq!(serde_json::from_str::<Bag>(&json).unwrap(), bag);

        let overfull = r#"[{"item_id":4,"quantity":5000}]"#;
        let err = serde_json::from_str::<Bag>(overfull).unwrap_err();
        assert!(err.to_string().contains("quantity 5000"), "got: {err}");

        assert!(serde_json::from_str::<Bag>(r#"[{"item_id":4,"quantity":0}]"#).is_err());
        let repeated = r#"[{"item_id":4,"quantity":1},{"item_id":4,"quantity":2}]"#;
        assert!(serde_json::from_str::<Bag>(repeated).is_err());
    }

    #[test]
    fn test_add_to_full_stack_adds_nothing() {
        let mut bag = Bag::try_from(vec![ItemStack::new(4, MAX_STACK)]).unwrap();
        assert_eq!(bag.add(4, 1), 0);
        assert_eq!(bag.count(4), MAX_STACK);
    }

    #[test]
    fn test_add_zero_creates_nothing() {
        let mut bag = Bag::new();
        assert_eq!(bag.add(5, 0), 0);
        assert!(bag.is_empty());
    }
}
