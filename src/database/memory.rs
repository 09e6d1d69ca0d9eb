//! In-memory `Store` used by tests, with switches to make individual writes fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::{Store, StoreError, StoreResult, UpdateSummary};
use crate::models::{
    CartItem, CategoryStat, CollectionCounts, MenuItem, PaymentRecord, Review, Role, User,
};
use crate::services::analytics_service;

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    menu: RwLock<HashMap<ObjectId, MenuItem>>,
    reviews: RwLock<Vec<Review>>,
    carts: RwLock<HashMap<ObjectId, CartItem>>,
    payments: RwLock<Vec<PaymentRecord>>,
    fail_payment_inserts: AtomicBool,
    fail_cart_deletes: AtomicBool,
    stale_user_lookups: AtomicBool,
    category_stats_delay_ms: AtomicU64,
    user_reads: AtomicUsize,
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_payment_inserts(&self, fail: bool) {
        self.fail_payment_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_cart_deletes(&self, fail: bool) {
        self.fail_cart_deletes.store(fail, Ordering::SeqCst);
    }

    /// Lookups by email report no user even when one is stored, as if another
    /// request inserted it between our find and our insert.
    pub fn stale_user_lookups(&self, stale: bool) {
        self.stale_user_lookups.store(stale, Ordering::SeqCst);
    }

    pub fn delay_category_stats(&self, delay: Duration) {
        self.category_stats_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of `find_user_by_email` calls so far.
    pub fn user_reads(&self) -> usize {
        self.user_reads.load(Ordering::SeqCst)
    }

    pub fn seed_user(&self, email: &str, role: Role) -> ObjectId {
        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            email: email.to_string(),
            name: None,
            role,
            profile: Default::default(),
        };
        self.users.write().unwrap().insert(id, user);
        id
    }

    pub fn seed_menu_item(&self, name: &str, category: &str, price: f64) -> ObjectId {
        let id = ObjectId::new();
        let item = MenuItem {
            id: Some(id),
            name: name.to_string(),
            category: category.to_string(),
            price,
            recipe: None,
            image: None,
        };
        self.menu.write().unwrap().insert(id, item);
        id
    }

    pub fn remove_menu_item(&self, id: &ObjectId) {
        self.menu.write().unwrap().remove(id);
    }

    pub fn seed_review(&self, name: &str, rating: f64) {
        self.reviews.write().unwrap().push(Review {
            id: Some(ObjectId::new()),
            name: name.to_string(),
            details: String::new(),
            rating,
        });
    }

    pub fn seed_cart_item(&self, email: &str, menu_id: &ObjectId, price: f64) -> ObjectId {
        let id = ObjectId::new();
        let item = CartItem {
            id: Some(id),
            email: email.to_string(),
            menu_id: menu_id.to_hex(),
            name: None,
            image: None,
            price,
        };
        self.carts.write().unwrap().insert(id, item);
        id
    }

    pub fn cart_len(&self) -> usize {
        self.carts.read().unwrap().len()
    }

    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.payments.read().unwrap().clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.user_reads.fetch_add(1, Ordering::SeqCst);
        if self.stale_user_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().map_err(poisoned)?.values().cloned().collect())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<ObjectId> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey);
        }
        let id = ObjectId::new();
        let mut stored = user.clone();
        stored.id = Some(id);
        users.insert(id, stored);
        Ok(id)
    }

    async fn delete_user(&self, id: &ObjectId) -> StoreResult<u64> {
        let removed = self.users.write().map_err(poisoned)?.remove(id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn set_user_role(&self, id: &ObjectId, role: Role) -> StoreResult<UpdateSummary> {
        let mut users = self.users.write().map_err(poisoned)?;
        Ok(match users.get_mut(id) {
            Some(user) => {
                let modified = u64::from(user.role != role);
                user.role = role;
                UpdateSummary {
                    matched: 1,
                    modified,
                }
            }
            None => UpdateSummary::default(),
        })
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.menu.read().map_err(poisoned)?.values().cloned().collect())
    }

    async fn find_menu_item(&self, id: &ObjectId) -> StoreResult<Option<MenuItem>> {
        Ok(self.menu.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.reviews.read().map_err(poisoned)?.clone())
    }

    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let carts = self.carts.read().map_err(poisoned)?;
        Ok(carts.values().filter(|c| c.email == email).cloned().collect())
    }

    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        let mut stored = item.clone();
        stored.id = Some(id);
        self.carts.write().map_err(poisoned)?.insert(id, stored);
        Ok(id)
    }

    async fn delete_cart_item(&self, id: &ObjectId) -> StoreResult<u64> {
        let removed = self.carts.write().map_err(poisoned)?.remove(id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn delete_cart_items(&self, ids: &[ObjectId]) -> StoreResult<u64> {
        if self.fail_cart_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("cart delete rejected".to_string()));
        }
        let mut carts = self.carts.write().map_err(poisoned)?;
        Ok(ids.iter().filter(|id| carts.remove(*id).is_some()).count() as u64)
    }

    async fn insert_payment(&self, payment: &PaymentRecord) -> StoreResult<ObjectId> {
        if self.fail_payment_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("payment insert rejected".to_string()));
        }
        let id = ObjectId::new();
        let mut stored = payment.clone();
        stored.id = Some(id);
        self.payments.write().map_err(poisoned)?.push(stored);
        Ok(id)
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        let payments = self.payments.read().map_err(poisoned)?;
        Ok(payments.iter().filter(|p| p.email == email).cloned().collect())
    }

    async fn collection_counts(&self) -> StoreResult<CollectionCounts> {
        Ok(CollectionCounts {
            users: self.users.read().map_err(poisoned)?.len() as u64,
            menu_items: self.menu.read().map_err(poisoned)?.len() as u64,
            payments: self.payments.read().map_err(poisoned)?.len() as u64,
        })
    }

    async fn total_revenue(&self) -> StoreResult<f64> {
        Ok(self.payments.read().map_err(poisoned)?.iter().map(|p| p.amount).sum())
    }

    async fn category_stats(&self) -> StoreResult<Vec<CategoryStat>> {
        let delay = self.category_stats_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let payments = self.payments.read().map_err(poisoned)?;
        let menu = self.menu.read().map_err(poisoned)?;
        Ok(analytics_service::aggregate_category_stats(&payments, &menu))
    }
}
