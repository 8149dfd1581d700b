use crate::error::Result;
use crate::models::ListingId;
use crate::storage::Preferences;
use tracing::debug;

/// Saved listing ids. Every change is written through before memory updates,
/// so a failed write leaves the wishlist as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    ids: Vec<ListingId>,
}

impl Wishlist {
    /// Load the persisted wishlist, dropping duplicate ids
    pub fn load(prefs: &Preferences) -> Self {
        let mut ids = Vec::new();
        for id in prefs.wishlist() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        debug!(count = ids.len(), "Loaded wishlist");
        Self { ids }
    }

    pub fn ids(&self) -> &[ListingId] {
        &self.ids
    }

    pub fn contains(&self, id: ListingId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn add(&mut self, prefs: &mut Preferences, id: ListingId) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        let mut next = self.ids.clone();
        next.push(id);
        self.commit(prefs, next)
    }

    pub fn remove(&mut self, prefs: &mut Preferences, id: ListingId) -> Result<()> {
        let next: Vec<_> = self.ids.iter().copied().filter(|&i| i != id).collect();
        self.commit(prefs, next)
    }

    /// Add `id` if absent, otherwise remove it. Returns whether it is now saved.
    pub fn toggle(&mut self, prefs: &mut Preferences, id: ListingId) -> Result<bool> {
        if self.contains(id) {
            self.remove(prefs, id)?;
            Ok(false)
        } else {
            self.add(prefs, id)?;
            Ok(true)
        }
    }

    fn commit(&mut self, prefs: &mut Preferences, next: Vec<ListingId>) -> Result<()> {
        prefs.save_wishlist(&next)?;
        self.ids = next;
        Ok(())
    }
}
