//! Kanban board aggregate.

use super::{KanbanDomainError, Pool};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All pools for one operator.
///
/// Items are stored as trimmed text. Every pool operation keeps the pools
/// disjoint: an item sits in exactly one pool or in none. The done pool is a
/// history and may hold the same text more than once, so recurring tasks can
/// be completed again.
///
/// Equality compares pool contents; a pool with no entry equals an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pools: BTreeMap<Pool, Vec<String>>,
}

impl Board {
    /// Creates a board with every pool empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board by appending `items` to `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError`] when an item is blank or already present.
    pub fn with_items<I, S>(mut self, pool: Pool, items: I) -> Result<Self, KanbanDomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in items {
            self.insert(item.as_ref(), pool)?;
        }
        Ok(self)
    }

    /// Returns the items of `pool` in order.
    #[must_use]
    pub fn get_tasks_in(&self, pool: Pool) -> &[String] {
        self.pools.get(&pool).map_or(&[], Vec::as_slice)
    }

    /// Returns the first item of `pool`.
    #[must_use]
    pub fn head(&self, pool: Pool) -> Option<&str> {
        self.get_tasks_in(pool).first().map(String::as_str)
    }

    /// Returns the number of items in `pool`.
    #[must_use]
    pub fn len(&self, pool: Pool) -> usize {
        self.get_tasks_in(pool).len()
    }

    /// Returns whether every pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.values().all(Vec::is_empty)
    }

    /// Returns the pool holding `item`, if any.
    #[must_use]
    pub fn locate(&self, item: &str) -> Option<Pool> {
        let needle = item.trim();
        self.pools
            .iter()
            .find(|(_, items)| items.iter().any(|existing| existing == needle))
            .map(|(pool, _)| *pool)
    }

    /// Removes `item` from `pool` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::NotFound`] when the item is not in `pool`.
    pub fn pop(&mut self, item: &str, pool: Pool) -> Result<String, KanbanDomainError> {
        let needle = item.trim();
        let not_found = || KanbanDomainError::NotFound {
            item: needle.to_owned(),
            pool,
        };
        let items = self.pools.get_mut(&pool).ok_or_else(not_found)?;
        let position = items
            .iter()
            .position(|existing| existing == needle)
            .ok_or_else(not_found)?;
        Ok(items.remove(position))
    }

    /// Appends `item` to `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::AlreadyPresent`] when the item is in
    /// another pool, or in the same pool unless that pool is done.
    /// Returns [`KanbanDomainError::EmptyItem`] for blank text.
    pub fn insert(&mut self, item: &str, pool: Pool) -> Result<(), KanbanDomainError> {
        let text = self.admit(item, pool)?;
        self.pools.entry(pool).or_default().push(text);
        Ok(())
    }

    /// Prepends `item` to `pool`.
    ///
    /// # Errors
    ///
    /// Same as [`Board::insert`].
    pub fn insert_front(&mut self, item: &str, pool: Pool) -> Result<(), KanbanDomainError> {
        let text = self.admit(item, pool)?;
        self.pools.entry(pool).or_default().insert(0, text);
        Ok(())
    }

    /// Rewrites `old` as `new` at the same position in `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::NotFound`] when `old` is not in `pool`, or
    /// [`KanbanDomainError::AlreadyPresent`] when `new` already sits anywhere
    /// else on the board.
    pub fn replace(&mut self, pool: Pool, old: &str, new: &str) -> Result<(), KanbanDomainError> {
        let old_text = old.trim();
        let new_text = new.trim();
        if new_text.is_empty() {
            return Err(KanbanDomainError::EmptyItem);
        }
        if old_text != new_text {
            if let Some(holder) = self.blocking_pool(new_text, pool) {
                return Err(KanbanDomainError::AlreadyPresent {
                    item: new_text.to_owned(),
                    pool: holder,
                });
            }
        }
        let slot = self
            .pools
            .get_mut(&pool)
            .and_then(|items| items.iter_mut().find(|existing| existing.as_str() == old_text))
            .ok_or_else(|| KanbanDomainError::NotFound {
                item: old_text.to_owned(),
                pool,
            })?;
        new_text.clone_into(slot);
        Ok(())
    }

    /// Moves `item` from `from` to the end of `to`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::NotFound`] when `item` is not in `from`.
    pub fn move_item(&mut self, item: &str, from: Pool, to: Pool) -> Result<(), KanbanDomainError> {
        let text = self.pop(item, from)?;
        self.insert(&text, to)
    }

    /// Stable-sorts `pool` by `key`; equal keys keep their relative order.
    pub fn sort_pool_by_key<K, F>(&mut self, pool: Pool, key: F)
    where
        K: Ord,
        F: FnMut(&String) -> K,
    {
        if let Some(items) = self.pools.get_mut(&pool) {
            items.sort_by_key(key);
        }
    }

    /// Removes and returns every item of `pool`.
    pub fn drain(&mut self, pool: Pool) -> Vec<String> {
        self.pools.remove(&pool).unwrap_or_default()
    }

    /// Returns item counts for every pool in pipeline order.
    #[must_use]
    pub fn counts(&self) -> Vec<(Pool, usize)> {
        Pool::ALL
            .into_iter()
            .map(|pool| (pool, self.len(pool)))
            .collect()
    }

    fn admit(&self, item: &str, target: Pool) -> Result<String, KanbanDomainError> {
        let text = item.trim();
        if text.is_empty() {
            return Err(KanbanDomainError::EmptyItem);
        }
        if let Some(pool) = self.blocking_pool(text, target) {
            return Err(KanbanDomainError::AlreadyPresent {
                item: text.to_owned(),
                pool,
            });
        }
        Ok(text.to_owned())
    }

    /// Returns the pool that keeps `text` out of `target`, if any.
    fn blocking_pool(&self, text: &str, target: Pool) -> Option<Pool> {
        self.locate(text)
            .filter(|holder| !(*holder == Pool::Done && target == Pool::Done))
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        Pool::ALL
            .into_iter()
            .all(|pool| self.get_tasks_in(pool) == other.get_tasks_in(pool))
    }
}

impl Eq for Board {}
