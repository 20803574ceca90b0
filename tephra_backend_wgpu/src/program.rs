// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pipeline construction and per-frame draw recording.

use tephra_core::host::StencilMode;
use tephra_core::tile::TextureKey;
use tephra_render::{OverlayPlan, UNIFORM_BLOCK_SIZE};

use crate::error::ProgramError;

const SHADER: &str = include_str!("shader.wgsl");

/// Unit tile quad, two triangles.
const QUAD: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
];

/// Stride between per-tile uniform blocks in the shared buffer.
///
/// WebGPU requires dynamic uniform offsets to be 256-aligned on the common
/// adapters, which comfortably holds the 96-byte block.
const UNIFORM_STRIDE: u64 = 256;

/// Resolves overlay texture keys to views.
///
/// Implemented by the host's texture cache. A key may stop resolving
/// between planning and prepare (the cache evicted the tile); the item is
/// then skipped for the frame.
pub trait TextureSource {
    /// The view for `key`, or `None` if the texture no longer exists.
    fn texture_view(&self, key: TextureKey) -> Option<&wgpu::TextureView>;
}

/// Formats of the host pass the program will draw into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramConfig {
    /// Color target format of the host's translucent pass.
    pub target_format: wgpu::TextureFormat,
    /// Depth/stencil attachment format, if the host pass has one. Without
    /// it, [`StencilMode::Equal`] items degrade to unstenciled draws.
    pub depth_stencil_format: Option<wgpu::TextureFormat>,
}

/// The overlay's GPU program: shader, pipelines, and static resources.
///
/// Built once per device; drawing splits into [`prepare`](Self::prepare)
/// (outside the pass: uniform upload + bind groups) and
/// [`draw`](Self::draw) (records into the host's pass).
#[derive(Debug)]
pub struct OverlayProgram {
    pipeline: wgpu::RenderPipeline,
    stencil_pipeline: Option<wgpu::RenderPipeline>,
    bind_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    uniform_capacity: usize,
}

/// One frame's uploaded uniforms and bind groups, ready to draw.
#[derive(Debug, Default)]
pub struct PreparedOverlay {
    items: Vec<PreparedItem>,
}

impl PreparedOverlay {
    /// Number of draws this frame will record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
struct PreparedItem {
    bind_group: wgpu::BindGroup,
    uniform_offset: u32,
    stencil: StencilMode,
}

impl OverlayProgram {
    /// Compiles the shader and builds the pipelines.
    ///
    /// Validation failures are collected through wgpu error scopes and
    /// returned as [`ProgramError`]; a failed program must not be used.
    /// The uniform block layout is validated here once: the bind layout
    /// declares [`UNIFORM_BLOCK_SIZE`] as its minimum binding size, so a
    /// Rust/WGSL struct mismatch fails pipeline creation instead of
    /// rendering garbage later.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &ProgramConfig,
    ) -> Result<Self, ProgramError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tephra overlay shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(ProgramError::Shader(error));
        }

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tephra overlay bind layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(UNIFORM_BLOCK_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tephra overlay layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });

        let pipeline = build_pipeline(
            device,
            &module,
            &layout,
            config,
            "unstenciled",
            wgpu::CompareFunction::Always,
        )?;

        let stencil_pipeline = config
            .depth_stencil_format
            .map(|_| {
                build_pipeline(
                    device,
                    &module,
                    &layout,
                    config,
                    "stenciled",
                    wgpu::CompareFunction::Equal,
                )
            })
            .transpose()?;

        // Raw alert values must not be smoothed: nearest sampling, no
        // wraparound, no mipmaps.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tephra overlay sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let quad = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tephra overlay quad"),
            size: size_of_val(&QUAD) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&quad, 0, bytemuck::cast_slice(&QUAD));

        let uniform_capacity = 64;
        let uniforms = create_uniform_buffer(device, uniform_capacity);

        Ok(Self {
            pipeline,
            stencil_pipeline,
            bind_layout,
            sampler,
            quad,
            uniforms,
            uniform_capacity,
        })
    }

    /// Uploads the plan's uniforms and builds one bind group per item.
    ///
    /// Runs outside the render pass. Items whose textures stopped resolving
    /// since planning are skipped with a warning — the tile retries next
    /// frame, matching the missing-texture contract.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        plan: &OverlayPlan,
        textures: &dyn TextureSource,
    ) -> PreparedOverlay {
        if plan.items.len() > self.uniform_capacity {
            self.uniform_capacity = plan.items.len().next_power_of_two();
            self.uniforms = create_uniform_buffer(device, self.uniform_capacity);
        }

        let mut items = Vec::with_capacity(plan.items.len());
        for (index, item) in plan.items.iter().enumerate() {
            let Some(primary) = textures.texture_view(item.texture) else {
                log::warn!("tile {:?}: texture {:?} vanished before prepare", item.tile, item.texture);
                continue;
            };
            let Some(secondary) = textures.texture_view(item.secondary) else {
                log::warn!("tile {:?}: ancestor texture {:?} vanished before prepare", item.tile, item.secondary);
                continue;
            };

            let offset = index as u64 * UNIFORM_STRIDE;
            queue.write_buffer(&self.uniforms, offset, bytemuck::bytes_of(&item.uniforms));

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tephra overlay bind group"),
                layout: &self.bind_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: &self.uniforms,
                            offset: 0,
                            size: wgpu::BufferSize::new(UNIFORM_BLOCK_SIZE),
                        }),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(primary),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(secondary),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

            #[expect(
                clippy::cast_possible_truncation,
                reason = "dynamic offsets are u32 by WebGPU contract; plans never reach 16M tiles"
            )]
            let uniform_offset = offset as u32;
            items.push(PreparedItem {
                bind_group,
                uniform_offset,
                stencil: item.stencil,
            });
        }

        PreparedOverlay { items }
    }

    /// Records the prepared draws into the host's render pass.
    ///
    /// The pass's attachments must match the [`ProgramConfig`] the program
    /// was built with. Stencil references are applied per item as handed
    /// out by the host's overlap policy.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, prepared: &PreparedOverlay) {
        if prepared.items.is_empty() {
            return;
        }

        pass.set_vertex_buffer(0, self.quad.slice(..));
        for item in &prepared.items {
            match item.stencil {
                StencilMode::Always => pass.set_pipeline(&self.pipeline),
                StencilMode::Equal { reference } => match &self.stencil_pipeline {
                    Some(stenciled) => {
                        pass.set_pipeline(stenciled);
                        pass.set_stencil_reference(reference);
                    }
                    None => {
                        log::warn!("overlap stencil requested but the pass has no stencil attachment");
                        pass.set_pipeline(&self.pipeline);
                    }
                },
            }
            pass.set_bind_group(0, &item.bind_group, &[item.uniform_offset]);
            pass.draw(0..QUAD.len() as u32, 0..1);
        }
    }
}

fn create_uniform_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tephra overlay uniforms"),
        size: capacity as u64 * UNIFORM_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn build_pipeline(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    config: &ProgramConfig,
    stage: &'static str,
    stencil_compare: wgpu::CompareFunction,
) -> Result<wgpu::RenderPipeline, ProgramError> {
    let stencil_face = wgpu::StencilFaceState {
        compare: stencil_compare,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op: wgpu::StencilOperation::Keep,
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("tephra overlay pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.target_format,
                // Premultiplied over: src*1 + dst*(1 - src_alpha).
                blend: Some(wgpu::BlendState {
                    color: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                    alpha: wgpu::BlendComponent {
                        src_factor: wgpu::BlendFactor::One,
                        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                        operation: wgpu::BlendOperation::Add,
                    },
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: config.depth_stencil_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState {
                front: stencil_face,
                back: stencil_face,
                read_mask: 0xFF,
                write_mask: 0,
            },
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(source) => Err(ProgramError::Pipeline { stage, source }),
        None => Ok(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stride_holds_the_block() {
        assert!(UNIFORM_BLOCK_SIZE <= UNIFORM_STRIDE, "block must fit the stride");
        assert_eq!(UNIFORM_STRIDE % 256, 0, "WebGPU dynamic offset alignment");
    }

    #[test]
    fn quad_covers_the_unit_square() {
        for [x, y] in QUAD {
            assert!((0.0..=1.0).contains(&x));
            assert!((0.0..=1.0).contains(&y));
        }
        // Two triangles, consistent winding on both.
        assert_eq!(QUAD.len(), 6);
        assert_eq!(QUAD[1], QUAD[4]);
        assert_eq!(QUAD[2], QUAD[3]);
    }

    #[test]
    fn shader_declares_the_uniform_fields() {
        // The WGSL struct must track tephra_render::TileUniforms; this pins
        // the field list so a rename is caught without a GPU.
        for field in [
            "matrix: mat4x4<f32>",
            "ancestor_offset: vec2<f32>",
            "ancestor_scale: f32",
            "fade_opacity: f32",
            "fade_mix: f32",
            "layer_opacity: f32",
            "date_start: f32",
            "date_end: f32",
        ] {
            assert!(SHADER.contains(field), "shader lost uniform field: {field}");
        }
    }

    #[test]
    fn shader_keeps_the_classification_palette() {
        for constant in ["237.0", "164.0", "194.0", "220.0", "102.0", "153.0", "201.0", "42.0", "109.0"] {
            assert!(SHADER.contains(constant), "palette constant missing: {constant}");
        }
    }
}
