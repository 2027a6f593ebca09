//! Slot table for soft-deleted entities
//!
//! Entities are deactivated in place. Their slots are collected into a free
//! list by [`Arena::reclaim`] and handed back out by [`Arena::insert`], so the
//! backing vector only grows when every slot is live.

use serde::{Deserialize, Serialize};

/// Anything that can live in an [`Arena`]
pub trait Slot {
    fn id(&self) -> u32;
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: Vec<T>,
    /// Free slot indices, highest first so `pop` returns the lowest
    #[serde(default)]
    free: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Slot> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, reusing a reclaimed slot when one is free. Returns the slot index.
    pub fn insert(&mut self, value: T) -> usize {
        while let Some(index) = self.free.pop() {
            // A slot can only be handed out if nothing revived it since reclaim
            if !self.slots[index].is_active() {
                self.slots[index] = value;
                return index;
            }
        }
        self.slots.push(value);
        self.slots.len() - 1
    }

    /// Rebuild the free list from every inactive slot
    pub fn reclaim(&mut self) {
        self.free.clear();
        self.free.extend(
            self.slots
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, slot)| !slot.is_active())
                .map(|(i, _)| i),
        );
    }

    /// Number of slots, live or not
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&T> {
        self.slots.iter().find(|s| s.id() == id)
    }

    /// All slots in storage order, including inactive ones
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    /// Slot indices sorted by entity id, for deterministic processing order
    pub fn indices_by_id(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&i| self.slots[i].id());
        order
    }
}
