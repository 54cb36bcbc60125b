// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for user lookups.
//!
//! Wraps any [`UserLookup`] and keeps recently fetched records for a fixed
//! TTL, so repeated logins for the same account skip the backing store.
//! Only successful lookups are cached; a miss always reaches the store.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;

use super::{RepositoryResult, UserLookup, UserRecord};

/// Cached entry: user record + insertion timestamp.
struct CacheEntry {
    user: UserRecord,
    inserted_at: Instant,
}

/// Read-through cache in front of a user store.
pub struct CachedUserLookup {
    inner: Arc<dyn UserLookup>,
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl CachedUserLookup {
    /// Create a new cache with the given capacity and TTL.
    ///
    /// - `capacity`: Max number of user records to cache.
    /// - `ttl`: Time-to-live for each cache entry.
    pub fn new(inner: Arc<dyn UserLookup>, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    fn get_fresh(&self, name: &str) -> Option<UserRecord> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(name) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.user.clone());
            }
            cache.pop(name);
        }
        None
    }

    fn put(&self, user: UserRecord) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                user.name.clone(),
                CacheEntry {
                    user,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserLookup for CachedUserLookup {
    async fn get_user_by_name(&self, name: &str) -> RepositoryResult<UserRecord> {
        if let Some(user) = self.get_fresh(name) {
            tracing::trace!(user = name, "user cache hit");
            return Ok(user);
        }

        let user = self.inner.get_user_by_name(name).await?;
        self.put(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::repository::{InMemoryUserRepository, RepositoryError};

    fn record(name: &str) -> UserRecord {
        UserRecord {
            name: name.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role::user(),
        }
    }

    #[tokio::test]
    async fn serves_cached_record_after_store_change() {
        let store = Arc::new(InMemoryUserRepository::with_users([record("alice")]));
        let cached = CachedUserLookup::new(store.clone(), 8, Duration::from_secs(60));

        cached.get_user_by_name("alice").await.unwrap();
        store.remove_user("alice").await;

        assert_eq!(cached.get_user_by_name("alice").await.unwrap().name, "alice");
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let store = Arc::new(InMemoryUserRepository::with_users([record("alice")]));
        let cached = CachedUserLookup::new(store.clone(), 8, Duration::ZERO);

        cached.get_user_by_name("alice").await.unwrap();
        store.remove_user("alice").await;

        assert!(matches!(
            cached.get_user_by_name("alice").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let store = Arc::new(InMemoryUserRepository::new());
        let cached = CachedUserLookup::new(store.clone(), 8, Duration::from_secs(60));

        assert!(cached.get_user_by_name("bob").await.is_err());
        assert_eq!(cached.cached_entries(), 0);

        store.insert_user(record("bob")).await;
        assert!(cached.get_user_by_name("bob").await.is_ok());
    }

    #[tokio::test]
    async fn capacity_bounds_entries() {
        let store = Arc::new(InMemoryUserRepository::with_users([
            record("a"),
            record("b"),
            record("c"),
        ]));
        let cached = CachedUserLookup::new(store, 2, Duration::from_secs(60));

        for name in ["a", "b", "c"] {
            cached.get_user_by_name(name).await.unwrap();
        }
        assert_eq!(cached.cached_entries(), 2);
    }
}
