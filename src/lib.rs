//! Bounded GPU-resident cache for IES photometric light profiles.
//!
//! Loads IESNA LM-63 profile files, decodes each into a fixed-size
//! single-channel dataset, and uploads it into one depth slice of a shared
//! `R16Float` 3D texture so a rendering pipeline can reference profiles by
//! integer index. Slots are assigned monotonically, deduplicated by canonical
//! path, and never evicted for the life of the manager.
//!
//! ```no_run
//! use ies_atlas::{IesProfileManager, StageInputs, INVALID_PROFILE};
//!
//! let mut inputs = StageInputs::new();
//! let mut profiles = IesProfileManager::new(&mut inputs)?;
//! let slot = profiles.load("assets/profiles/spot.ies");
//! if slot != INVALID_PROFILE {
//!     // pass `slot` to the light that uses this profile
//! }
//! # Ok::<(), ies_atlas::ProfileError>(())
//! ```

pub mod core;
pub mod error;
pub mod gpu;
pub mod loaders;
pub mod path_util;

pub use crate::core::manager::{IesProfileManager, INVALID_PROFILE, MAX_PROFILES_DEFINE};
pub use crate::core::stage_inputs::{StageInputs, TextureInput};
pub use crate::core::storage::{
    DatasetTexture, ProfileStorage, StorageConfig, DATASET_FORMAT, DATASET_HEIGHT,
    DATASET_TEXTURE_INPUT, DATASET_WIDTH, MAX_PROFILES,
};
pub use crate::error::{LoadError, ProfileError, ProfileResult};
pub use crate::loaders::{
    validate_ies_data, validate_ies_file, IesDataset, IesLoader, ProfileLoader,
};
