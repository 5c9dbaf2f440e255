//! Best-effort game name resolution.
//!
//! Names are purely cosmetic, so every step degrades to `None` instead of
//! failing. Steps, first hit wins:
//! 1. configured target display name, when the target matches
//! 2. upstream `lastLocation`, unless it is the `website` placeholder
//! 3. universe id -> name (memoized)
//! 4. place id -> universe id (memoized) -> step 3

use async_trait::async_trait;
use rbxmon_core::TargetFilter;
use tracing::debug;

use crate::cache::MemoCache;
use crate::error::Result;

/// Location upstream reports for users browsing the site.
const WEBSITE_LOCATION: &str = "website";

/// Catalog lookups used for name resolution.
#[async_trait]
pub trait GameCatalog: Send + Sync {
    /// Title of a universe, if upstream knows it.
    async fn universe_name(&self, universe_id: u64) -> Result<Option<String>>;

    /// Universe a place belongs to, if upstream knows it.
    async fn place_universe(&self, place_id: &str) -> Result<Option<u64>>;
}

/// Resolves display names for games, caching catalog answers.
pub struct GameNameResolver<C> {
    catalog: C,
    target: TargetFilter,
    names: MemoCache<u64, String>,
    universes: MemoCache<String, u64>,
}

impl<C: GameCatalog> GameNameResolver<C> {
    /// Creates a resolver backed by `catalog`.
    pub fn new(catalog: C, target: TargetFilter) -> Self {
        Self {
            catalog,
            target,
            names: MemoCache::new(),
            universes: MemoCache::new(),
        }
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolves a name for the given presence fields.
    pub async fn resolve(
        &self,
        place_id: Option<&str>,
        universe_id: Option<u64>,
        last_location: Option<&str>,
    ) -> Option<String> {
        if let Some(name) = &self.target.display_name {
            if self.target.matches_ids(place_id, universe_id) {
                return Some(name.clone());
            }
        }

        if let Some(location) = last_location.map(str::trim) {
            if !location.is_empty() && !location.eq_ignore_ascii_case(WEBSITE_LOCATION) {
                return Some(location.to_string());
            }
        }

        if let Some(universe_id) = universe_id {
            return self.universe_name(universe_id).await;
        }

        let universe_id = self.place_universe(place_id?).await?;
        self.universe_name(universe_id).await
    }

    async fn universe_name(&self, universe_id: u64) -> Option<String> {
        if let Some(name) = self.names.get(&universe_id) {
            return Some(name);
        }

        match self.catalog.universe_name(universe_id).await {
            Ok(Some(name)) => {
                self.names.insert(universe_id, name.clone());
                Some(name)
            }
            Ok(None) => None,
            Err(e) => {
                debug!(universe_id, error = %e, "game name lookup failed");
                None
            }
        }
    }

    async fn place_universe(&self, place_id: &str) -> Option<u64> {
        if let Some(universe_id) = self.universes.get(place_id) {
            return Some(universe_id);
        }

        match self.catalog.place_universe(place_id).await {
            Ok(Some(universe_id)) => {
                self.universes.insert(place_id.to_string(), universe_id);
                Some(universe_id)
            }
            Ok(None) => None,
            Err(e) => {
                debug!(place_id = %place_id, error = %e, "place universe lookup failed");
                None
            }
        }
    }
}
