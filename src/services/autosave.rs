//! Debounced auto-save scheduling.
//!
//! A field edit restarts a per-field timer; only the last edit inside the
//! window is persisted, collapsing a burst of keystrokes into one write.
//! Fields that participate in cross-entity consistency (date of birth,
//! expiry date, gender) bypass the window through `write_immediately`, which
//! shares the same persistence and cache-invalidation step — the distinction
//! is a policy flag, not duplicated logic.
//!
//! Writes are read-modify-write against the store, so commits for the same
//! (user, entity) are serialized through a per-entity async lock: without
//! it, two debounced edits to different fields of one record could
//! interleave and one field's write would be lost.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;

use crate::domain::errors::UserDataResult;
use crate::domain::models::{FieldKey, UserId};

type GenerationMap = HashMap<(UserId, FieldKey), u64>;
type CommitLockMap = HashMap<(UserId, String), Arc<AsyncMutex<()>>>;

pub struct AutosaveScheduler {
    window: Duration,
    /// Monotonic generation per (user, field). A pending write commits only
    /// if its generation is still current when its commit slot arrives.
    generations: Arc<Mutex<GenerationMap>>,
    /// One commit lock per (user, entity). Writes for the same entity record
    /// run one at a time, in the order their timers fire.
    commit_locks: Mutex<CommitLockMap>,
}

impl AutosaveScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generations: Arc::new(Mutex::new(HashMap::new())),
            commit_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn bump(&self, user_id: &UserId, field_key: &FieldKey) -> u64 {
        let mut map = self.generations.lock().unwrap();
        let entry = map.entry((user_id.clone(), field_key.clone())).or_insert(0);
        *entry += 1;
        *entry
    }

    fn current(map: &Arc<Mutex<GenerationMap>>, user_id: &UserId, field_key: &FieldKey) -> u64 {
        map.lock()
            .unwrap()
            .get(&(user_id.clone(), field_key.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn commit_lock(&self, user_id: &UserId, field_key: &FieldKey) -> Arc<AsyncMutex<()>> {
        let entity = field_key
            .as_str()
            .split_once('.')
            .map_or(field_key.as_str(), |(e, _)| e)
            .to_string();
        let mut map = self.commit_locks.lock().unwrap();
        Arc::clone(map.entry((user_id.clone(), entity)).or_default())
    }

    /// Schedule `write` to run after the debounce window, superseding any
    /// pending write for the same (user, field).
    ///
    /// The write runs on a detached task: navigating away from the screen
    /// does not cancel it, only a newer edit to the same field does. The
    /// generation is re-checked under the entity's commit lock, so a write
    /// that was superseded while waiting for its slot never commits. A
    /// failed write is logged, not surfaced — the edit is dropped and the
    /// field keeps its last persisted value.
    pub fn schedule_debounced<F, Fut>(&self, user_id: UserId, field_key: FieldKey, write: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UserDataResult<()>> + Send + 'static,
    {
        let generation = self.bump(&user_id, &field_key);
        let generations = Arc::clone(&self.generations);
        let lock = self.commit_lock(&user_id, &field_key);
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let _commit = lock.lock().await;
            if Self::current(&generations, &user_id, &field_key) != generation {
                // Superseded by a newer edit
                return;
            }

            if let Err(err) = write().await {
                tracing::warn!(
                    user_id = %user_id,
                    field = %field_key,
                    error = %err,
                    "debounced auto-save write failed"
                );
            }
        });
    }

    /// Run `write` now, cancelling any pending debounced write for the same
    /// field so a stale value cannot land after the immediate one. Takes the
    /// same per-entity commit lock as the debounced path.
    pub async fn write_immediately<F, Fut>(
        &self,
        user_id: &UserId,
        field_key: &FieldKey,
        write: F,
    ) -> UserDataResult<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = UserDataResult<()>>,
    {
        self.bump(user_id, field_key);
        let lock = self.commit_lock(user_id, field_key);
        let _commit = lock.lock().await;
        write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scheduler() -> AutosaveScheduler {
        AutosaveScheduler::new(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn burst_of_edits_collapses_to_one_write() {
        let scheduler = scheduler();
        let user = UserId::from("u1");
        let key = FieldKey::personal("occupation");
        let writes = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(String::new()));

        for value in ["E", "En", "Engineer"] {
            let writes = Arc::clone(&writes);
            let last = Arc::clone(&last);
            scheduler.schedule_debounced(user.clone(), key.clone(), move || async move {
                writes.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = value.to_string();
                Ok(())
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), "Engineer");
    }

    #[tokio::test]
    async fn distinct_fields_do_not_cancel_each_other() {
        let scheduler = scheduler();
        let user = UserId::from("u1");
        let writes = Arc::new(AtomicUsize::new(0));

        for field in ["occupation", "email"] {
            let writes = Arc::clone(&writes);
            scheduler.schedule_debounced(user.clone(), FieldKey::personal(field), move || async move {
                writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn immediate_write_cancels_pending_debounce() {
        let scheduler = scheduler();
        let user = UserId::from("u1");
        let key = FieldKey::passport("expiryDate");
        let writes = Arc::new(AtomicUsize::new(0));

        {
            let writes = Arc::clone(&writes);
            scheduler.schedule_debounced(user.clone(), key.clone(), move || async move {
                writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        scheduler
            .write_immediately(&user, &key, || async { Ok(()) })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        // The debounced closure was superseded before its timer fired
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn same_entity_writes_never_overlap() {
        let scheduler = scheduler();
        let user = UserId::from("u1");
        let events = Arc::new(Mutex::new(Vec::new()));

        // First write holds its commit slot well past the second timer
        {
            let events = Arc::clone(&events);
            scheduler.schedule_debounced(
                user.clone(),
                FieldKey::personal("occupation"),
                move || async move {
                    events.lock().unwrap().push("a-start");
                    tokio::time::sleep(Duration::from_millis(60)).await;
                    events.lock().unwrap().push("a-end");
                    Ok(())
                },
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        {
            let events = Arc::clone(&events);
            scheduler.schedule_debounced(
                user.clone(),
                FieldKey::personal("email"),
                move || async move {
                    events.lock().unwrap().push("b-start");
                    events.lock().unwrap().push("b-end");
                    Ok(())
                },
            );
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            *events.lock().unwrap(),
            vec!["a-start", "a-end", "b-start", "b-end"]
        );
    }

    #[tokio::test]
    async fn different_entities_commit_independently() {
        let scheduler = scheduler();
        let user = UserId::from("u1");
        let events = Arc::new(Mutex::new(Vec::new()));

        {
            let events = Arc::clone(&events);
            scheduler.schedule_debounced(
                user.clone(),
                FieldKey::personal("occupation"),
                move || async move {
                    tokio::time::sleep(Duration::from_millis(60)).await;
                    events.lock().unwrap().push("personal");
                    Ok(())
                },
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        {
            let events = Arc::clone(&events);
            scheduler.schedule_debounced(
                user.clone(),
                FieldKey::passport("fullName"),
                move || async move {
                    events.lock().unwrap().push("passport");
                    Ok(())
                },
            );
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        // The passport write is not held up by the slow personal write
        assert_eq!(*events.lock().unwrap(), vec!["passport", "personal"]);
    }
}
