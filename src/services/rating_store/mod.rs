use crate::error::{RecError, Result};
use crate::models::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Item catalog plus the sparse user x item rating matrix.
///
/// Each item's rater set and each user's rating map are updated together, so
/// an item lists exactly the users holding a stored rating for it. The store
/// is also the only writer of the per-item similarity memos; see
/// [`RatingStore::record_similarity`].
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    items: BTreeMap<ItemId, Item>,
    users: BTreeMap<UserId, BTreeMap<ItemId, f64>>,
    observation_count: usize,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a catalog stream followed by an observation stream.
    pub fn from_records<C, O>(catalog: C, observations: O) -> Result<Self>
    where
        C: IntoIterator<Item = CatalogEntry>,
        O: IntoIterator<Item = Observation>,
    {
        let mut store = Self::new();

        for entry in catalog {
            store.add_item(entry.item_id, entry.title)?;
        }

        let mut ignored = 0usize;
        for observation in observations {
            if !store.add_observation(observation.user_id, observation.item_id, observation.rating)? {
                ignored += 1;
            }
        }

        info!(
            "Rating store loaded: {} items, {} users, {} observations ({} repeated pairs ignored)",
            store.item_count(),
            store.user_count(),
            store.observation_count(),
            ignored
        );

        Ok(store)
    }

    pub fn add_item(&mut self, id: ItemId, title: impl Into<String>) -> Result<()> {
        if self.items.contains_key(&id) {
            return Err(RecError::DuplicateItem(id));
        }

        self.items.insert(id, Item::new(id, title.into()));
        Ok(())
    }

    /// Stores `rating` for `(user, item)`.
    ///
    /// Returns `Ok(false)` without touching anything when the pair already
    /// holds a rating: observations are write-once and the first value wins.
    pub fn add_observation(&mut self, user: UserId, item: ItemId, rating: f64) -> Result<bool> {
        if !rating.is_finite() {
            return Err(RecError::InvalidRating {
                user_id: user,
                item_id: item,
                rating,
            });
        }

        let entry = self.items.get_mut(&item).ok_or(RecError::UnknownItem(item))?;
        let ratings = self.users.entry(user).or_default();

        if ratings.contains_key(&item) {
            debug!("Ignoring repeated rating {} for user {} item {}", rating, user, item);
            return Ok(false);
        }

        ratings.insert(item, rating);
        entry.users.insert(user);
        self.observation_count += 1;
        Ok(true)
    }

    pub fn rating_of(&self, user: UserId, item: ItemId) -> Option<f64> {
        self.users.get(&user).and_then(|ratings| ratings.get(&item)).copied()
    }

    pub fn users_who_rated(&self, item: ItemId) -> Result<&BTreeSet<UserId>> {
        Ok(&self.item(item)?.users)
    }

    pub fn items_rated_by(&self, user: UserId) -> Result<&BTreeMap<ItemId, f64>> {
        self.users.get(&user).ok_or(RecError::UnknownUser(user))
    }

    pub fn item(&self, id: ItemId) -> Result<&Item> {
        self.items.get(&id).ok_or(RecError::UnknownItem(id))
    }

    pub fn title_of(&self, id: ItemId) -> Result<&str> {
        Ok(self.item(id)?.title.as_str())
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn contains_user(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn observation_count(&self) -> usize {
        self.observation_count
    }

    /// Rating pairs `(rating of a, rating of b)` from every user who rated
    /// both items, in ascending user id order.
    pub fn co_ratings(&self, a: ItemId, b: ItemId) -> Result<Vec<(f64, f64)>> {
        let raters_a = self.users_who_rated(a)?;
        let raters_b = self.users_who_rated(b)?;

        let pairs = raters_a
            .intersection(raters_b)
            .filter_map(|user| {
                let ratings = self.users.get(user)?;
                Some((*ratings.get(&a)?, *ratings.get(&b)?))
            })
            .collect();

        Ok(pairs)
    }

    /// Memoized similarity of `a` towards `b`, if one was recorded.
    pub fn cached_similarity(&self, a: ItemId, b: ItemId) -> Result<Option<f64>> {
        let item_a = self.item(a)?;
        self.item(b)?;
        Ok(item_a.cached_similarity(b))
    }

    /// Writes `value` into both items' memos in one step.
    pub(crate) fn record_similarity(&mut self, a: ItemId, b: ItemId, value: f64) -> Result<()> {
        if !self.items.contains_key(&b) {
            return Err(RecError::UnknownItem(b));
        }

        self.items
            .get_mut(&a)
            .ok_or(RecError::UnknownItem(a))?
            .similarities
            .insert(b, value);

        if let Some(item_b) = self.items.get_mut(&b) {
            item_b.similarities.insert(a, value);
        }

        Ok(())
    }
}
