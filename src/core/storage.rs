//! GPU storage for decoded profile datasets
//!
//! One 3D `R16Float` texture holds every cached profile, one 512×512 tile
//! per depth slice. The cache manager is the sole writer; the rendering
//! pipeline samples it read-only through a named stage input.

use std::sync::Arc;

use half::f16;

use super::stage_inputs::{StageInputs, TextureInput};
use crate::error::{ProfileError, ProfileResult};
use crate::gpu::{align_copy_bpr, ctx};
use crate::loaders::IesDataset;

/// Tile width: vertical angle axis, clamped at 0 and 180 degrees.
pub const DATASET_WIDTH: u32 = 512;
/// Tile height: horizontal angle axis, repeats every 360 degrees.
pub const DATASET_HEIGHT: u32 = 512;
/// Fixed number of profile slots per process run.
pub const MAX_PROFILES: u32 = 32;
/// Stage-input name the rendering pipeline binds the storage texture under.
pub const DATASET_TEXTURE_INPUT: &str = "IESDatasetTex";

/// Single-channel 16-bit float, linear-filterable.
pub const DATASET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R16Float;

const BYTES_PER_TEXEL: u32 = 2;

/// Largest per-axis dimension accepted for the storage texture. Matches the
/// default wgpu 3D texture limit.
const MAX_STORAGE_DIM: u32 = 2048;

/// Configuration for the profile storage texture
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Texture label for debugging
    pub label: Option<String>,
    /// Tile width in texels
    pub width: u32,
    /// Tile height in texels
    pub height: u32,
    /// Number of depth slices (profile slots)
    pub max_entries: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            label: Some("IESDatasets".to_string()),
            width: DATASET_WIDTH,
            height: DATASET_HEIGHT,
            max_entries: MAX_PROFILES,
        }
    }
}

/// Destination for decoded profile datasets, one tile per slot.
///
/// The seam between the cache manager and the GPU; tests substitute a
/// recording implementation here.
pub trait ProfileStorage {
    /// Number of addressable slots.
    fn capacity(&self) -> u32;

    /// Rasterize and upload a dataset into the given slot.
    fn write_layer(&mut self, layer: u32, dataset: &IesDataset) -> ProfileResult<()>;

    /// Expose bindings to downstream consumers.
    fn register_inputs(&self, inputs: &mut StageInputs);
}

/// The concrete wgpu-backed storage texture.
pub struct DatasetTexture {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    texture: wgpu::Texture,
    width: u32,
    height: u32,
    depth: u32,
}

impl DatasetTexture {
    /// Create the storage texture on an explicit device/queue.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        config: StorageConfig,
    ) -> ProfileResult<Self> {
        validate_config(&config)?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: config.label.as_deref(),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: config.max_entries,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: DATASET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Ok(Self {
            device,
            queue,
            texture,
            width: config.width,
            height: config.height,
            depth: config.max_entries,
        })
    }

    /// Create the storage texture on the process-wide GPU context.
    pub fn from_global_context(config: StorageConfig) -> ProfileResult<Self> {
        let g = ctx();
        Self::new(g.device.clone(), g.queue.clone(), config)
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Tile dimensions `(width, height)`.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn create_view(&self) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Sampler matching the storage addressing contract: linear filtering,
    /// clamp on the vertical-angle and slot axes, repeat on the
    /// horizontal-angle axis.
    pub fn create_sampler(&self) -> wgpu::Sampler {
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ies-dataset-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: f32::MAX,
            compare: None,
            anisotropy_clamp: 1,
            border_color: None,
        })
    }

    /// Read one depth slice back to the CPU, depadded to tight rows.
    pub fn read_layer(&self, layer: u32) -> ProfileResult<Vec<f16>> {
        if layer >= self.depth {
            return Err(ProfileError::readback(format!(
                "layer {} out of range (capacity {})",
                layer, self.depth
            )));
        }

        let row_bytes = self.width * BYTES_PER_TEXEL;
        let padded_bpr = align_copy_bpr(row_bytes);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ies-dataset-readback"),
            size: (padded_bpr as u64) * (self.height as u64),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ies-dataset-readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| ProfileError::readback("map callback dropped"))?
            .map_err(|err| ProfileError::readback(format!("buffer map failed: {err}")))?;

        let data = slice.get_mapped_range();
        let mut texels = Vec::with_capacity((self.width as usize) * (self.height as usize));
        for row in 0..self.height as usize {
            let start = row * padded_bpr as usize;
            let row_slice = &data[start..start + row_bytes as usize];
            texels.extend(
                row_slice
                    .chunks_exact(2)
                    .map(|b| f16::from_le_bytes([b[0], b[1]])),
            );
        }
        drop(data);
        buffer.unmap();
        Ok(texels)
    }
}

impl ProfileStorage for DatasetTexture {
    fn capacity(&self) -> u32 {
        self.depth
    }

    fn write_layer(&mut self, layer: u32, dataset: &IesDataset) -> ProfileResult<()> {
        if layer >= self.depth {
            return Err(ProfileError::upload(format!(
                "layer {} out of range (capacity {})",
                layer, self.depth
            )));
        }

        let texels = dataset.generate_tile(self.width, self.height);
        let bytes: &[u8] = bytemuck::cast_slice(&texels);
        let row_bytes = self.width * BYTES_PER_TEXEL;
        let padded_bpr = align_copy_bpr(row_bytes);

        let padded_storage;
        let upload: &[u8] = if padded_bpr == row_bytes {
            bytes
        } else {
            let mut staged = vec![0u8; (padded_bpr as usize) * (self.height as usize)];
            for row in 0..self.height as usize {
                let src = row * row_bytes as usize;
                let dst = row * padded_bpr as usize;
                staged[dst..dst + row_bytes as usize]
                    .copy_from_slice(&bytes[src..src + row_bytes as usize]);
            }
            padded_storage = staged;
            &padded_storage
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
                aspect: wgpu::TextureAspect::All,
            },
            upload,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    fn register_inputs(&self, inputs: &mut StageInputs) {
        inputs.add_texture(
            DATASET_TEXTURE_INPUT,
            TextureInput {
                view: self.create_view(),
                sampler: self.create_sampler(),
            },
        );
    }
}

fn validate_config(config: &StorageConfig) -> ProfileResult<()> {
    if config.width == 0 || config.height == 0 || config.max_entries == 0 {
        return Err(ProfileError::device(
            "Storage dimensions must be > 0".to_string(),
        ));
    }
    if config.width > MAX_STORAGE_DIM
        || config.height > MAX_STORAGE_DIM
        || config.max_entries > MAX_STORAGE_DIM
    {
        return Err(ProfileError::device(format!(
            "Storage dimensions too large: {}x{}x{}, maximum per axis is {}",
            config.width, config.height, config.max_entries, MAX_STORAGE_DIM
        )));
    }
    Ok(())
}
