use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per entity id. Serializes check-then-act sequences on the same
/// record inside this process.
#[derive(Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            // 無人持有的鎖順便清掉
            slots.retain(|key, lock| *key == id || Arc::strong_count(lock) > 1);
            slots.entry(id).or_default().clone()
        };
        slot.lock_owned().await
    }
}
