//! In-memory document store
//!
//! DashMap keyed by document key. Every write takes the shard lock for its
//! key, so `add` is an atomic create-if-absent and `replace` an atomic
//! compare-and-swap.
//!
//! # CAS
//!
//! A single counter hands out CAS values for the whole store, so a CAS is
//! never reused across keys or across delete/recreate.
//!
//! # Vbuckets
//!
//! Keys map to vbuckets by `((crc32(key) >> 16) & 0x7fff) % num_vbuckets`.
//! Each vbucket owns a sequence number, bumped on every write it receives,
//! and a UUID fixed at construction. Together they form the mutation token.
//!
//! # Locks
//!
//! `get_and_lock` assigns a fresh CAS and hides it: while the lock holds,
//! `get` reports `u64::MAX` and only a write presenting the lock CAS gets
//! through. The first successful write releases the lock.

use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use docmock_core::{Document, DocumentStore, MutationInfo, MutationToken, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Vbucket count used by [`MemoryStore::new`]
pub const DEFAULT_NUM_VBUCKETS: u16 = 64;

/// CAS reported by `get` for a locked item
pub const LOCKED_CAS: u64 = u64::MAX;

#[derive(Debug)]
struct Vbucket {
    uuid: u64,
    seqno: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
struct ItemLock {
    cas: u64,
    until: Instant,
}

impl ItemLock {
    fn is_held(&self) -> bool {
        Instant::now() < self.until
    }
}

#[derive(Debug)]
struct Entry {
    doc: Document,
    lock: Option<ItemLock>,
}

impl Entry {
    fn held_lock(&self) -> Option<ItemLock> {
        self.lock.filter(ItemLock::is_held)
    }

    /// Refuse a write presenting `cas` (0 = any) while another holder owns the lock
    fn check_lock(&self, cas: u64) -> Result<(), StoreError> {
        match self.held_lock() {
            Some(lock) if lock.cas != cas => Err(StoreError::Locked),
            _ => Ok(()),
        }
    }
}

/// Thread-safe in-memory implementation of [`DocumentStore`]
#[derive(Debug)]
pub struct MemoryStore {
    items: DashMap<String, Entry>,
    next_cas: AtomicU64,
    vbuckets: Vec<Vbucket>,
}

impl MemoryStore {
    /// Create an empty store with [`DEFAULT_NUM_VBUCKETS`] vbuckets
    pub fn new() -> Self {
        Self::with_vbuckets(DEFAULT_NUM_VBUCKETS)
    }

    /// Create an empty store with `num_vbuckets` vbuckets (at least one)
    pub fn with_vbuckets(num_vbuckets: u16) -> Self {
        let count = num_vbuckets.max(1);
        let vbuckets = (0..count)
            .map(|_| Vbucket {
                uuid: rand::random::<u64>(),
                seqno: AtomicU64::new(0),
            })
            .collect();
        info!(target: "docmock::store", num_vbuckets = count, "Created in-memory store");
        MemoryStore {
            items: DashMap::new(),
            next_cas: AtomicU64::new(1),
            vbuckets,
        }
    }

    /// Number of vbuckets keys are spread over
    pub fn num_vbuckets(&self) -> u16 {
        // with_vbuckets never builds more than u16::MAX
        self.vbuckets.len() as u16
    }

    /// Vbucket a key hashes to
    pub fn vbucket_for(&self, key: &str) -> u16 {
        let hash = crc32fast::hash(key.as_bytes());
        (((hash >> 16) & 0x7fff) % u32::from(self.num_vbuckets())) as u16
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no documents are stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Store a document whether or not the key exists
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Locked` if the existing item is locked.
    pub fn upsert(&self, mut doc: Document) -> Result<MutationInfo, StoreError> {
        let key = doc.key.clone();
        match self.items.entry(key) {
            MapEntry::Occupied(mut occupied) => {
                occupied.get().check_lock(0)?;
                let info = self.stamp(&mut doc);
                occupied.insert(Entry { doc, lock: None });
                Ok(info)
            }
            MapEntry::Vacant(vacant) => {
                let info = self.stamp(&mut doc);
                vacant.insert(Entry { doc, lock: None });
                Ok(info)
            }
        }
    }

    /// Delete a document
    ///
    /// A `cas` of 0 deletes whatever is stored.
    ///
    /// # Errors
    ///
    /// - `StoreError::KeyNotFound` if the key is absent
    /// - `StoreError::Locked` if locked under another CAS
    /// - `StoreError::CasMismatch` if `cas` is nonzero and stale
    pub fn remove(&self, key: &str, cas: u64) -> Result<MutationInfo, StoreError> {
        match self.items.entry(key.to_string()) {
            MapEntry::Vacant(_) => Err(StoreError::KeyNotFound),
            MapEntry::Occupied(occupied) => {
                let entry = occupied.get();
                entry.check_lock(cas)?;
                if cas != 0 && cas != entry.doc.cas {
                    return Err(StoreError::CasMismatch {
                        expected: cas,
                        actual: entry.doc.cas,
                    });
                }
                let (key, _) = occupied.remove_entry();
                let info = MutationInfo {
                    cas: self.next_cas(),
                    token: self.next_token(&key),
                };
                debug!(target: "docmock::store", key = %key, "Removed document");
                Ok(info)
            }
        }
    }

    /// Fetch a document and lock it for `timeout`
    ///
    /// The returned document carries the lock CAS; present it to `replace`
    /// or `unlock`.
    ///
    /// # Errors
    ///
    /// - `StoreError::KeyNotFound` if the key is absent
    /// - `StoreError::Locked` if it is already locked
    pub fn get_and_lock(&self, key: &str, timeout: Duration) -> Result<Document, StoreError> {
        let mut entry = self.items.get_mut(key).ok_or(StoreError::KeyNotFound)?;
        if entry.held_lock().is_some() {
            return Err(StoreError::Locked);
        }
        let cas = self.next_cas();
        entry.doc.cas = cas;
        entry.lock = Some(ItemLock {
            cas,
            until: Instant::now() + timeout,
        });
        debug!(target: "docmock::store", key = %key, cas, "Locked document");
        Ok(entry.doc.clone())
    }

    /// Release a lock taken by [`get_and_lock`](Self::get_and_lock)
    ///
    /// Unlocking an item that is not locked succeeds.
    ///
    /// # Errors
    ///
    /// - `StoreError::KeyNotFound` if the key is absent
    /// - `StoreError::Locked` if `cas` is not the lock CAS
    pub fn unlock(&self, key: &str, cas: u64) -> Result<(), StoreError> {
        let mut entry = self.items.get_mut(key).ok_or(StoreError::KeyNotFound)?;
        match entry.held_lock() {
            Some(lock) if lock.cas != cas => Err(StoreError::Locked),
            _ => {
                entry.lock = None;
                Ok(())
            }
        }
    }

    fn next_cas(&self) -> u64 {
        self.next_cas.fetch_add(1, Ordering::SeqCst)
    }

    fn next_token(&self, key: &str) -> MutationToken {
        let vbucket = self.vbucket_for(key);
        let vb = &self.vbuckets[usize::from(vbucket)];
        MutationToken {
            vbucket,
            vbucket_uuid: vb.uuid,
            seqno: vb.seqno.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Assign the CAS and mutation token for a write of `doc`
    fn stamp(&self, doc: &mut Document) -> MutationInfo {
        doc.cas = self.next_cas();
        let token = self.next_token(&doc.key);
        debug!(target: "docmock::store", key = %doc.key, cas = doc.cas, seqno = token.seqno, "Stored document");
        MutationInfo {
            cas: doc.cas,
            token,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Document> {
        let entry = self.items.get(key)?;
        let mut doc = entry.doc.clone();
        if entry.held_lock().is_some() {
            doc.cas = LOCKED_CAS;
        }
        Some(doc)
    }

    fn add(&self, mut doc: Document) -> Result<MutationInfo, StoreError> {
        match self.items.entry(doc.key.clone()) {
            MapEntry::Occupied(_) => Err(StoreError::KeyExists),
            MapEntry::Vacant(vacant) => {
                let info = self.stamp(&mut doc);
                vacant.insert(Entry { doc, lock: None });
                Ok(info)
            }
        }
    }

    fn replace(&self, mut doc: Document, expected_cas: u64) -> Result<MutationInfo, StoreError> {
        match self.items.entry(doc.key.clone()) {
            MapEntry::Vacant(_) => Err(StoreError::KeyNotFound),
            MapEntry::Occupied(mut occupied) => {
                let current = occupied.get();
                current.check_lock(expected_cas)?;
                if current.doc.cas != expected_cas {
                    return Err(StoreError::CasMismatch {
                        expected: expected_cas,
                        actual: current.doc.cas,
                    });
                }
                let info = self.stamp(&mut doc);
                occupied.insert(Entry { doc, lock: None });
                Ok(info)
            }
        }
    }
}
