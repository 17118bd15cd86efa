//! The profile cache manager
//!
//! Owns the bounded list of resolved profile paths and their one-to-one
//! mapping onto depth slices of the storage texture. Loading is deduplicated
//! by canonical path; every failure degrades to the invalid-profile sentinel
//! rather than propagating.

use std::path::Path;

use log::{debug, warn};

use super::stage_inputs::StageInputs;
use super::storage::{DatasetTexture, ProfileStorage, StorageConfig};
use crate::error::ProfileResult;
use crate::loaders::{IesLoader, ProfileLoader};
use crate::path_util::{self, CacheKey};

/// Sentinel returned when no valid profile slot exists. Callers must not
/// bind the storage texture with this index.
pub const INVALID_PROFILE: i32 = -1;

/// Stage-constant name the capacity is published under.
pub const MAX_PROFILES_DEFINE: &str = "MAX_IES_PROFILES";

/// Bounded cache mapping profile files to storage slots.
///
/// Slot `i` of the storage resource holds the profile whose cache key sits at
/// position `i` of the entry list; the list is append-only for the manager's
/// lifetime, so returned indices stay stable. `load` takes `&mut self` —
/// cross-thread use requires external serialization.
pub struct IesProfileManager<L: ProfileLoader = IesLoader, S: ProfileStorage = DatasetTexture> {
    loader: L,
    storage: S,
    entries: Vec<CacheKey>,
}

impl IesProfileManager {
    /// Create a manager with the built-in loader and a storage texture on the
    /// process-wide GPU context, and register its bindings.
    pub fn new(inputs: &mut StageInputs) -> ProfileResult<Self> {
        let storage = DatasetTexture::from_global_context(StorageConfig::default())?;
        Ok(Self::with_parts(IesLoader::new(), storage, inputs))
    }
}

impl<L: ProfileLoader, S: ProfileStorage> IesProfileManager<L, S> {
    /// Create a manager from injected collaborators and register the storage
    /// binding plus the capacity constant. Must happen before any `load`.
    pub fn with_parts(loader: L, storage: S, inputs: &mut StageInputs) -> Self {
        storage.register_inputs(inputs);
        inputs.define(MAX_PROFILES_DEFINE, storage.capacity());
        Self {
            loader,
            storage,
            entries: Vec::new(),
        }
    }

    /// Load a profile and return its slot index, or [`INVALID_PROFILE`].
    ///
    /// The path may be relative or absolute in host-native form; spellings
    /// that resolve to the same absolute path share one slot. A repeated
    /// request returns the existing slot without re-loading or re-uploading.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> i32 {
        let shown = path.as_ref().display().to_string();

        let key = match path_util::cache_key(path.as_ref()) {
            Ok(key) => key,
            Err(err) => {
                warn!("Cannot resolve IES profile path {shown}: {err}");
                return INVALID_PROFILE;
            }
        };

        if let Some(slot) = self.entries.iter().position(|entry| *entry == key) {
            return slot as i32;
        }

        if self.entries.len() as u32 >= self.storage.capacity() {
            warn!(
                "Cannot load IES profile {shown}: cache is full (maximum: {})",
                self.storage.capacity()
            );
            return INVALID_PROFILE;
        }

        let dataset = match self.loader.load(Path::new(&key)) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!("Failed to load IES profile {shown}: {err}");
                return INVALID_PROFILE;
            }
        };
        if dataset.is_empty() {
            warn!("IES profile {shown} decoded to an empty dataset");
            return INVALID_PROFILE;
        }

        let slot = self.entries.len() as u32;
        if let Err(err) = self.storage.write_layer(slot, &dataset) {
            warn!("Failed to upload IES profile {shown} to slot {slot}: {err}");
            return INVALID_PROFILE;
        }
        self.entries.push(key);
        debug!("Loaded IES profile {shown} into slot {slot}");
        slot as i32
    }

    /// Number of filled slots.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total slot capacity.
    pub fn capacity(&self) -> u32 {
        self.storage.capacity()
    }

    /// Cache keys in slot order.
    pub fn entries(&self) -> &[CacheKey] {
        &self.entries
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
