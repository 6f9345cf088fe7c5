// SPDX-License-Identifier: GPL-3.0-only
//! GPU compute shaders
//!
//! The color-matrix filter runs on the GPU when a Vulkan adapter is
//! available. [`crate::filters::apply_filter_cpu`] is the fallback and the
//! reference the shader is checked against.

mod gpu_filter;
mod gpu_processor;

pub use gpu_filter::{GpuFilterPipeline, apply_filter_gpu_rgba, get_gpu_filter_pipeline};
pub use gpu_processor::{CachedDimensions, compute_dispatch_size, read_buffer_async};

/// Color-matrix compute shader (WGSL)
pub const COLOR_MATRIX_SHADER: &str = include_str!("color_matrix.wgsl");
