//! Item system

pub mod bag;

pub use bag::{Bag, ItemStack, MAX_STACK};
