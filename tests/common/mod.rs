#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use geekshop_session::cache::{CachedSession, InMemorySessionCache, SessionCache};
use geekshop_session::config::SessionOptions;
use geekshop_session::database::{
    MemorySessionStore, MemoryUserRepository, SessionRecord, SessionStore,
};
use geekshop_session::error::{CacheError, StoreError};
use geekshop_session::models::{Permission, Role, User};
use geekshop_session::service::SessionService;

/// Wraps the in-memory store, counting calls and injecting failures.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemorySessionStore,
    pub inserts: AtomicUsize,
    pub finds: AtomicUsize,
    pub expiry_updates: AtomicUsize,
    pub conflicts_remaining: AtomicUsize,
    pub unavailable: AtomicBool,
}

impl CountingStore {
    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn expiry_updates(&self) -> usize {
        self.expiry_updates.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for CountingStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let conflict = self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if conflict {
            return Err(StoreError::Conflict("duplicate token".into()));
        }
        self.inner.insert(record).await
    }

    async fn find_active_by_token(&self, token: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.check_available()?;
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_active_by_token(token).await
    }

    async fn update_expiry(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_available()?;
        self.expiry_updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_expiry(token, expires_at).await
    }

    async fn invalidate_all_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        self.check_available()?;
        self.inner.invalidate_all_for_user(user_id).await
    }

    async fn find_tokens_for_user(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        self.inner.find_tokens_for_user(user_id).await
    }

    async fn update_active_order(
        &self,
        token: &str,
        order_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        self.inner.update_active_order(token, order_id).await
    }

    async fn invalidate(&self, token: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.inner.invalidate(token).await
    }
}

/// A cache whose backend is down.
pub struct BrokenCache;

#[async_trait]
impl SessionCache for BrokenCache {
    async fn get(&self, _token: &str) -> Result<Option<CachedSession>, CacheError> {
        Err(CacheError::Backend("connection reset".into()))
    }

    async fn set(&self, _session: &CachedSession) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection reset".into()))
    }

    async fn delete(&self, _token: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection reset".into()))
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection reset".into()))
    }
}

pub fn options() -> SessionOptions {
    SessionOptions {
        session_duration: Duration::hours(1),
        anonymous_session_duration: Duration::hours(2),
        session_cache_ttl_secs: 300,
        token_bytes: 32,
    }
}

pub const READER_ROLE: i64 = 1;
pub const EDITOR_ROLE: i64 = 2;
pub const ADMIN_ROLE: i64 = 3;

pub fn alice() -> User {
    User {
        id: 1,
        identifier: "alice@example.com".into(),
        verified: true,
        roles: vec![
            Role::new(READER_ROLE, "reader", [Permission::Authenticated, Permission::ReadCatalog]),
            Role::new(
                EDITOR_ROLE,
                "editor",
                [Permission::ReadCatalog, Permission::UpdateCatalog],
            ),
        ],
    }
}

pub fn bob() -> User {
    User {
        id: 2,
        identifier: "bob@example.com".into(),
        verified: false,
        roles: vec![Role::new(READER_ROLE, "reader", [Permission::Authenticated, Permission::ReadCatalog])],
    }
}

pub fn admin() -> User {
    User {
        id: 99,
        identifier: "admin@example.com".into(),
        verified: true,
        roles: vec![Role::new(
            ADMIN_ROLE,
            "superadmin",
            [Permission::Authenticated, Permission::SuperAdmin],
        )],
    }
}

pub struct Harness {
    pub store: Arc<CountingStore>,
    pub cache: Arc<InMemorySessionCache>,
    pub users: Arc<MemoryUserRepository>,
    pub service: Arc<SessionService>,
}

impl Harness {
    pub async fn new() -> Self {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(InMemorySessionCache::default());
        let users = Arc::new(MemoryUserRepository::new());
        for user in [alice(), bob(), admin()] {
            users.put(user).await;
        }

        let service = Arc::new(SessionService::new(
            store.clone(),
            cache.clone(),
            users.clone(),
            options(),
        ));

        Self {
            store,
            cache,
            users,
            service,
        }
    }

    /// Replaces the cached view of `token` with one whose freshness window
    /// has already closed.
    pub async fn make_stale(&self, token: &str) {
        let mut view = self
            .cache
            .get(token)
            .await
            .unwrap()
            .expect("session should be cached");
        view.cache_expiry = Utc::now().timestamp() - 1;
        self.cache.set(&view).await.unwrap();
    }
}
