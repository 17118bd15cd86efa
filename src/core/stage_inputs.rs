//! Named shared inputs published to downstream pipeline stages.
//!
//! Resource owners register bindings here at initialization; render stages
//! look them up by name. This registry is passed into constructors explicitly
//! instead of components holding a back-reference to the owning pipeline.

use std::collections::HashMap;

use log::warn;

/// A texture binding shared with downstream stages.
pub struct TextureInput {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Registry of named texture bindings and integer configuration constants.
#[derive(Default)]
pub struct StageInputs {
    textures: HashMap<String, TextureInput>,
    constants: HashMap<String, u32>,
}

impl StageInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture binding under a stable name.
    pub fn add_texture(&mut self, name: impl Into<String>, input: TextureInput) {
        let name = name.into();
        if self.textures.insert(name.clone(), input).is_some() {
            warn!("Stage input '{}' registered twice, replacing", name);
        }
    }

    /// Publish an integer configuration constant under a stable name.
    pub fn define(&mut self, name: impl Into<String>, value: u32) {
        let name = name.into();
        if self.constants.insert(name.clone(), value).is_some() {
            warn!("Stage constant '{}' defined twice, replacing", name);
        }
    }

    pub fn texture(&self, name: &str) -> Option<&TextureInput> {
        self.textures.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<u32> {
        self.constants.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_round_trip() {
        let mut inputs = StageInputs::new();
        assert_eq!(inputs.constant("MAX_IES_PROFILES"), None);
        inputs.define("MAX_IES_PROFILES", 32);
        assert_eq!(inputs.constant("MAX_IES_PROFILES"), Some(32));
    }

    #[test]
    fn redefining_replaces_the_value() {
        let mut inputs = StageInputs::new();
        inputs.define("MAX_IES_PROFILES", 32);
        inputs.define("MAX_IES_PROFILES", 16);
        assert_eq!(inputs.constant("MAX_IES_PROFILES"), Some(16));
    }
}
