use std::ops::Range;

use rand::Rng;
use tracing::debug;

use crate::config::{ITEM_VALUE_MAX, ITEM_VALUE_MIN, MAX_ITEMS, SPAWN_ATTEMPTS};
use crate::grid::GridSize;
use crate::snake::{Position, Snake};

/// A numbered collectible. Its value is both the score and the growth gained.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Item {
    pub position: Position,
    pub value: u32,
}

impl Item {
    #[must_use]
    pub fn new(position: Position, value: u32) -> Self {
        debug_assert!((ITEM_VALUE_MIN..=ITEM_VALUE_MAX).contains(&value));
        Self { position, value }
    }
}

/// The items currently on the board, never more than [`MAX_ITEMS`].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(MAX_ITEMS),
        }
    }

    /// Adds `item` unless the set is full or its cell already holds an item.
    pub fn place(&mut self, item: Item) -> bool {
        if self.is_full() || self.occupies(item.position) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes and returns the item at `position`, if any.
    pub fn take_at(&mut self, position: Position) -> Option<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.position == position)?;
        Some(self.items.remove(index))
    }

    /// Drops every item outside `bounds`. Returns how many were removed.
    pub fn retain_within(&mut self, bounds: GridSize) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.position.is_within_bounds(bounds));
        before - self.items.len()
    }

    /// Returns true if an item sits on `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.items.iter().any(|item| item.position == position)
    }

    /// Returns true when no more items may be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_ITEMS
    }

    /// Returns the number of items on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

/// Tries to add one item on a free cell.
///
/// Makes up to [`SPAWN_ATTEMPTS`] random trials and stops at the first cell
/// not covered by the snake or another item. Exhausting the trials is a
/// silent no-op. Returns the spawned item, if any.
pub fn try_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    items: &mut ItemSet,
) -> Option<Item> {
    if items.is_full() {
        return None;
    }

    let columns = spawn_axis(bounds.width);
    let rows = spawn_axis(bounds.height);

    for _ in 0..SPAWN_ATTEMPTS {
        let position = Position {
            x: rng.gen_range(columns.clone()),
            y: rng.gen_range(rows.clone()),
        };
        if snake.occupies(position) || items.occupies(position) {
            continue;
        }

        let item = Item::new(position, rng.gen_range(ITEM_VALUE_MIN..=ITEM_VALUE_MAX));
        items.place(item);
        debug!(x = position.x, y = position.y, value = item.value, "item spawned");
        return Some(item);
    }

    debug!("item spawn gave up, board too crowded");
    None
}

/// Spawn coordinates skip the outer ring when the axis is wide enough to have
/// an interior.
fn spawn_axis(extent: u16) -> Range<i32> {
    let extent = i32::from(extent.max(1));
    if extent >= 3 { 1..extent - 1 } else { 0..extent }
}
