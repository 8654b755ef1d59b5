//! Per-user read tracking: `note id -> last seen reply count`.
//!
//! The map is a pure cache, never a system of record: it can be discarded
//! at any time and the worst case is that everything looks unread again.
//! Storage keys are namespaced by user id so switching accounts on the
//! same device does not leak read state between users.

use std::collections::HashMap;
use std::path::PathBuf;

use corkboard_core::types::DbId;

/// Storage key prefix; the user id is appended per account.
const READ_COUNTS_PREFIX: &str = "read_counts_";

/// Key/value persistence the tracker sits on.
///
/// Implementations map a string key to a string payload -- localStorage on
/// the web, AsyncStorage on mobile, a plain file here. Load failures are
/// swallowed by the tracker (the cache re-derives), save failures are the
/// implementation's to report.
pub trait ReadCountStorage {
    /// Fetch the payload stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous payload.
    fn set_item(&mut self, key: &str, value: &str);
}

/// File-backed storage: one JSON file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ReadCountStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(error = %e, "failed to create read-count storage dir");
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            tracing::warn!(error = %e, "failed to persist read counts");
        }
    }
}

/// Tracks the last seen reply count per note for one authenticated user.
///
/// Key absent means "never opened". The derivation rules:
///
/// - unread: reply count > 0 and (never seeded, or current > stored)
/// - recent: never opened *and* zero replies -- a genuinely new topic,
///   distinct from unread (which requires replies beyond what was seen)
pub struct ReadTracker<S: ReadCountStorage> {
    user_id: DbId,
    counts: HashMap<DbId, i64>,
    storage: S,
}

impl<S: ReadCountStorage> ReadTracker<S> {
    /// Load the tracker for `user_id` from storage.
    ///
    /// Missing or unparseable payloads load as an empty map.
    pub fn load(user_id: DbId, storage: S) -> Self {
        let counts = storage
            .get_item(&storage_key(user_id))
            .and_then(|raw| serde_json::from_str::<HashMap<DbId, i64>>(&raw).ok())
            .unwrap_or_default();
        Self {
            user_id,
            counts,
            storage,
        }
    }

    /// Seed entries for notes seen for the first time.
    ///
    /// Called after a list fetch: every note without an entry is recorded
    /// at its *current* reply count, so pre-existing threads read as
    /// "already seen up to now" instead of flooding the first load with
    /// unread badges.
    pub fn seed(&mut self, notes: &[(DbId, i64)]) {
        let mut changed = false;
        for &(note_id, reply_count) in notes {
            if !self.counts.contains_key(&note_id) {
                self.counts.insert(note_id, reply_count);
                changed = true;
            }
        }
        if changed {
            self.persist();
        }
    }

    /// Record that the user has opened the note and seen all
    /// `current_count` replies.
    pub fn mark_read(&mut self, note_id: DbId, current_count: i64) {
        self.counts.insert(note_id, current_count);
        self.persist();
    }

    /// The user's own freshly created note starts as read-at-zero.
    pub fn note_created(&mut self, note_id: DbId) {
        self.counts.insert(note_id, 0);
        self.persist();
    }

    /// Forget a deleted note's entry.
    pub fn note_deleted(&mut self, note_id: DbId) {
        if self.counts.remove(&note_id).is_some() {
            self.persist();
        }
    }

    /// The user posted a reply: they have implicitly seen the new count.
    pub fn reply_added(&mut self, note_id: DbId, new_count: i64) {
        self.counts.insert(note_id, new_count);
        self.persist();
    }

    /// A reply was removed; clamp to the lower count.
    pub fn reply_removed(&mut self, note_id: DbId, new_count: i64) {
        self.counts.insert(note_id, new_count.max(0));
        self.persist();
    }

    /// Whether the note has replies the user has not seen.
    pub fn is_unread(&self, note_id: DbId, current_count: i64) -> bool {
        if current_count == 0 {
            return false;
        }
        match self.counts.get(&note_id) {
            None => true,
            Some(&seen) => current_count > seen,
        }
    }

    /// Whether the note qualifies for the "recent" tab: never opened and
    /// still without replies.
    pub fn is_recent(&self, note_id: DbId, current_count: i64) -> bool {
        !self.counts.contains_key(&note_id) && current_count == 0
    }

    /// The stored last-seen count, if the note was ever seeded.
    pub fn last_seen(&self, note_id: DbId) -> Option<i64> {
        self.counts.get(&note_id).copied()
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.counts) {
            Ok(raw) => self.storage.set_item(&storage_key(self.user_id), &raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize read counts"),
        }
    }
}

fn storage_key(user_id: DbId) -> String {
    format!("{READ_COUNTS_PREFIX}{user_id}")
}
