// Item stacks held by pawns and structures.
//
// An `Inventory` is a map from `ItemKind` to a positive count. Zero-count
// stacks are never stored, so `is_empty()` and iteration only ever see items
// that are actually present. `ItemStack` is the (kind, quantity) pair used
// in catalog cost/input/output lists and in withdraw requests.
//
// See also: `catalog.rs` for the costs and recipes expressed as
// `ItemStack` lists, `assignment.rs` which compares a pawn's inventory
// against required inputs, `structure_sim.rs` which moves items around.

use crate::types::ItemKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quantity of one item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemKind,
    pub quantity: u32,
}

impl ItemStack {
    pub const fn new(item: ItemKind, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemKind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: ItemKind) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item: ItemKind, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.items.entry(item).or_insert(0) += quantity;
    }

    /// Remove up to `quantity`, returning how many were actually removed.
    pub fn take(&mut self, item: ItemKind, quantity: u32) -> u32 {
        let Some(held) = self.items.get_mut(&item) else {
            return 0;
        };
        let taken = (*held).min(quantity);
        *held -= taken;
        if *held == 0 {
            self.items.remove(&item);
        }
        taken
    }

    /// Whether every stack in `needs` is fully covered.
    pub fn has_all(&self, needs: &[ItemStack]) -> bool {
        needs.iter().all(|s| self.count(s.item) >= s.quantity)
    }

    /// Remove every stack in `needs`. Either all are removed or nothing
    /// changes; returns whether the removal happened.
    pub fn remove_all(&mut self, needs: &[ItemStack]) -> bool {
        if !self.has_all(needs) {
            return false;
        }
        for stack in needs {
            self.take(stack.item, stack.quantity);
        }
        true
    }

    /// Move everything from `self` into `other`, returning the total count.
    pub fn drain_into(&mut self, other: &mut Inventory) -> u32 {
        let mut moved = 0;
        for (item, qty) in std::mem::take(&mut self.items) {
            other.add(item, qty);
            moved += qty;
        }
        moved
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.items.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<ItemStack> for Inventory {
    fn from_iter<I: IntoIterator<Item = ItemStack>>(iter: I) -> Self {
        let mut inv = Inventory::new();
        for stack in iter {
            inv.add(stack.item, stack.quantity);
        }
        inv
    }
}
