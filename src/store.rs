//! Storage collaborator: user records, listing persistence, usage counters.
//!
//! The core never talks to a database directly — it calls the opaque
//! [`ListingStore`] trait in a fixed read-check-write order: resolve the
//! user, check the quota, then (after generation) save the listing and
//! increment the counter. Whatever atomicity the backing store offers is
//! all the atomicity the quota has: two concurrent requests from the same
//! user can both pass the check before either write lands, so the limit is
//! approximate, not exact.
//!
//! [`MemoryStore`] backs tests and the CLI; production deployments implement
//! the trait over their relational store.

use crate::error::ListingError;
use crate::listing::GeneratedListing;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// A resolved user row: identity, plan tier, and usage position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub tier: String,
    pub listings_used: u32,
    pub listings_limit: u32,
}

impl UserRecord {
    /// A free-tier user: 5 listings per period, none used.
    pub fn free_tier(id: i64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            tier: "free".into(),
            listings_used: 0,
            listings_limit: 5,
        }
    }
}

/// A persisted listing row, as the store receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredListing {
    pub user_id: i64,
    pub product_name: String,
    pub marketplace: String,
    pub listing: GeneratedListing,
}

/// The persistence operations the orchestrator depends on.
///
/// Failures map to [`ListingError::Persistence`] at the call site; the
/// orchestrator attaches the generated listing so the caller keeps it.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Resolve a user by email. `Ok(None)` means no such user.
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Persist a generated listing for the owning user.
    async fn save_listing(&self, record: StoredListing) -> Result<(), StoreError>;

    /// Bump the user's usage counter, returning the new count.
    async fn increment_usage(&self, user_id: i64) -> Result<u32, StoreError>;
}

/// An opaque storage failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

/// In-memory [`ListingStore`] for tests and the CLI.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<i64, UserRecord>,
    listings: Vec<StoredListing>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a single user, the common test fixture.
    pub fn with_user(user: UserRecord) -> Self {
        let store = Self::new();
        store.insert_user(user);
        store
    }

    pub fn insert_user(&self, user: UserRecord) {
        self.inner.lock().unwrap().users.insert(user.id, user);
    }

    /// Snapshot of everything saved so far, in insertion order.
    pub fn listings(&self) -> Vec<StoredListing> {
        self.inner.lock().unwrap().listings.clone()
    }

    pub fn user(&self, id: i64) -> Option<UserRecord> {
        self.inner.lock().unwrap().users.get(&id).cloned()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn save_listing(&self, record: StoredListing) -> Result<(), StoreError> {
        debug!(user_id = record.user_id, product = %record.product_name, "saving listing");
        self.inner.lock().unwrap().listings.push(record);
        Ok(())
    }

    async fn increment_usage(&self, user_id: i64) -> Result<u32, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError(format!("no user with id {user_id}")))?;
        user.listings_used += 1;
        Ok(user.listings_used)
    }
}

/// Map a store failure into the fatal error, keeping the listing.
pub(crate) fn persistence_error(err: StoreError, listing: GeneratedListing) -> ListingError {
    ListingError::Persistence {
        detail: err.to_string(),
        listing: Box::new(listing),
    }
}
