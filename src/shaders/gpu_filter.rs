// SPDX-License-Identifier: GPL-3.0-only
//! GPU color-matrix filter pipeline
//!
//! Uploads an RGBA image as a texture, evaluates the filter's color matrix
//! in a compute shader and reads the packed RGBA result back.

use crate::filters::{ColorMatrix, FilterType};
use crate::gpu::{self, wgpu};
use crate::gpu_processor_singleton;
use crate::shaders::gpu_processor::{CachedDimensions, compute_dispatch_size, read_buffer_async};
use std::sync::Arc;
use tracing::{debug, info};

const WORKGROUP_SIZE: u32 = 16;

/// Matrix uniform, laid out to match `Params` in color_matrix.wgsl
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MatrixParams {
    width: u32,
    height: u32,
    _padding: [u32; 2],
    rows: [[f32; 4]; 4],
    offsets: [f32; 4],
}

impl MatrixParams {
    pub(crate) fn new(width: u32, height: u32, matrix: &ColorMatrix) -> Self {
        Self {
            width,
            height,
            _padding: [0; 2],
            rows: matrix.rows(),
            offsets: matrix.offsets(),
        }
    }
}

/// GPU filter pipeline for RGBA images
pub struct GpuFilterPipeline {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    max_texture_dimension: u32,
    max_output_size: u64,
    // Cached resources for current dimensions
    cached_dims: CachedDimensions,
    input_texture: Option<wgpu::Texture>,
    output_buffer: Option<wgpu::Buffer>,
    staging_buffer: Option<wgpu::Buffer>,
}

impl GpuFilterPipeline {
    pub async fn new() -> Result<Self, String> {
        info!("Initializing GPU filter pipeline");

        let (device, queue, gpu_info) = gpu::create_compute_device("filter_pipeline_gpu").await?;

        info!(
            adapter_name = %gpu_info.adapter_name,
            adapter_backend = ?gpu_info.backend,
            max_texture_dimension = gpu_info.max_texture_dimension,
            "GPU device created for filter pipeline"
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("color_matrix_shader"),
            source: wgpu::ShaderSource::Wgsl(super::COLOR_MATRIX_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("color_matrix_bind_group_layout"),
            entries: &[
                // Input texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Packed RGBA output
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Matrix uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("color_matrix_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("color_matrix_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("color_matrix_uniform_buffer"),
            size: std::mem::size_of::<MatrixParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            uniform_buffer,
            max_texture_dimension: gpu_info.max_texture_dimension,
            max_output_size: gpu_info.max_storage_buffer_binding_size,
            cached_dims: CachedDimensions::default(),
            input_texture: None,
            output_buffer: None,
            staging_buffer: None,
        })
    }

    /// Whether an image of this size fits within the device limits
    pub fn supports(&self, width: u32, height: u32) -> bool {
        width > 0
            && height > 0
            && width <= self.max_texture_dimension
            && height <= self.max_texture_dimension
            && u64::from(width) * u64::from(height) * 4 <= self.max_output_size
    }

    fn ensure_resources(&mut self, width: u32, height: u32) {
        if !self.cached_dims.needs_update(width, height) {
            return;
        }

        debug!(width, height, "Allocating filter pipeline resources");

        let buffer_size = u64::from(width) * u64::from(height) * 4;

        self.input_texture = Some(self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("color_matrix_input_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        }));

        self.output_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("color_matrix_output_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        }));

        self.staging_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("color_matrix_staging_buffer"),
            size: buffer_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        }));

        self.cached_dims.update(width, height);
    }

    /// Apply a filter to tightly packed RGBA data (width * height * 4 bytes)
    pub async fn apply_filter_rgba(
        &mut self,
        rgba_data: &[u8],
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<Vec<u8>, String> {
        if filter == FilterType::Normal {
            return Ok(rgba_data.to_vec());
        }

        let expected_len = width as usize * height as usize * 4;
        if rgba_data.len() != expected_len {
            return Err(format!(
                "RGBA buffer is {} bytes, expected {} for {}x{}",
                rgba_data.len(),
                expected_len,
                width,
                height
            ));
        }

        if !self.supports(width, height) {
            return Err(format!(
                "Image {}x{} exceeds GPU limits (max dimension {})",
                width, height, self.max_texture_dimension
            ));
        }

        self.ensure_resources(width, height);

        let input_texture = self
            .input_texture
            .as_ref()
            .ok_or("Input texture not allocated")?;
        let output_buffer = self
            .output_buffer
            .as_ref()
            .ok_or("Output buffer not allocated")?;
        let staging_buffer = self
            .staging_buffer
            .as_ref()
            .ok_or("Staging buffer not allocated")?;

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: input_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let params = MatrixParams::new(width, height, &filter.matrix());
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&params));

        let input_view = input_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("color_matrix_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&input_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("color_matrix_encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("color_matrix_pass"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, Some(&bind_group), &[]);
            compute_pass.dispatch_workgroups(
                compute_dispatch_size(width, WORKGROUP_SIZE),
                compute_dispatch_size(height, WORKGROUP_SIZE),
                1,
            );
        }

        let buffer_size = expected_len as u64;
        encoder.copy_buffer_to_buffer(output_buffer, 0, staging_buffer, 0, buffer_size);

        self.queue.submit(std::iter::once(encoder.finish()));

        read_buffer_async(&self.device, staging_buffer).await
    }
}

gpu_processor_singleton!(
    GpuFilterPipeline,
    GPU_FILTER_PIPELINE,
    get_gpu_filter_pipeline
);

/// Apply a filter to RGBA data using the shared GPU pipeline
pub async fn apply_filter_gpu_rgba(
    rgba_data: &[u8],
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Vec<u8>, String> {
    let mut guard = get_gpu_filter_pipeline().await?;
    let pipeline = guard
        .as_mut()
        .ok_or("GPU filter pipeline not initialized")?;

    pipeline
        .apply_filter_rgba(rgba_data, width, height, filter)
        .await
}
