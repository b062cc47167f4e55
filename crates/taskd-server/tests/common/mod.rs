#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use taskd_core::{Error, Item, Result};
use taskd_server::server::store::TodoStore;

/// In-memory [`TodoStore`] double with an injectable insert failure mode and
/// a call counter.
#[derive(Clone, Default)]
pub struct MockTodoStore {
    items: Arc<Mutex<HashMap<i64, Item>>>,
    next_id: Arc<AtomicI64>,
    insert_calls: Arc<AtomicUsize>,
    fail_inserts: Arc<AtomicBool>,
}

impl MockTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `insert` has been invoked, failures included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// When set, every `insert` fails with a persistence error.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Seeds an item directly, bypassing the insert path.
    pub fn seed(&self, item: Item) {
        self.items.lock().unwrap().insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn get_sync(&self, id: i64) -> Option<Item> {
        self.items.lock().unwrap().get(&id).cloned()
    }
}

impl TodoStore for MockTodoStore {
    async fn insert(&self, item: &Item) -> Result<i64> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Error::Persistence {
                detail: "injected insert failure".to_string(),
            });
        }

        item.validate()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut stored = item.clone();
        stored.id = id;
        self.items.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self.items.lock().unwrap().values().cloned().collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn get(&self, id: i64) -> Result<Option<Item>> {
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, item: &Item) -> Result<()> {
        item.validate()?;
        self.items.lock().unwrap().insert(item.id, item.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.items.lock().unwrap().remove(&id);
        Ok(())
    }
}
