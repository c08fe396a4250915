//! WGSL shader compilation and program linking.
//!
//! Each [`Shader`] is parsed and validated with naga before wgpu sees it, so
//! compile failures carry the full diagnostic. [`ShaderProgram::link`] then
//! checks that the stages agree on their interface and reflects every
//! resource binding, which is what lets callers look uniforms up by name.

use std::collections::{BTreeMap, BTreeSet};

use crate::gfx::error::{GfxError, ShaderStage};
use crate::render::RenderCtx;

/// Binding slot of a named shader resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

/// What a reflected resource binds to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResourceKind {
    Texture2d,
    Sampler,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Uniform {
    location: UniformLocation,
    kind: ResourceKind,
}

/// Bind group layout plus slots for a texture and its companion sampler.
///
/// The sampler of a texture named `foo` is the resource named `foo_sampler`.
#[derive(Debug, Copy, Clone)]
pub struct TextureBinding<'a> {
    pub layout: &'a wgpu::BindGroupLayout,
    pub texture: UniformLocation,
    pub sampler: UniformLocation,
}

/// A compiled single-stage shader.
#[derive(Debug)]
pub struct Shader {
    stage: ShaderStage,
    ir: naga::Module,
    module: wgpu::ShaderModule,
}

impl Shader {
    pub fn compile(ctx: &RenderCtx<'_>, source: &str, stage: ShaderStage) -> Result<Self, GfxError> {
        let ir = check_source(source, stage)?;
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(match stage {
                ShaderStage::Vertex => "pinup vertex shader",
                ShaderStage::Fragment => "pinup fragment shader",
            }),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        log::debug!("compiled {stage} shader");
        Ok(Self { stage, ir, module })
    }
}

/// Parses and validates `source`, requiring an entry point for `stage`.
pub(crate) fn check_source(source: &str, stage: ShaderStage) -> Result<naga::Module, GfxError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| GfxError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| GfxError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    if !module.entry_points.iter().any(|ep| ep.stage == stage.to_naga()) {
        return Err(GfxError::Compile {
            stage,
            log: format!("no @{stage} entry point"),
        });
    }
    Ok(module)
}

/// Result of checking a set of stages against each other.
#[derive(Debug)]
pub(crate) struct Interface {
    vertex_entry: String,
    fragment_entry: String,
    uniforms: BTreeMap<String, Uniform>,
}

impl Interface {
    fn group_count(&self) -> u32 {
        self.uniforms
            .values()
            .map(|u| u.location.group + 1)
            .max()
            .unwrap_or(0)
    }
}

fn entry_point<'a>(
    modules: &[(ShaderStage, &'a naga::Module)],
    stage: ShaderStage,
) -> Option<&'a naga::EntryPoint> {
    modules
        .iter()
        .filter(|(s, _)| *s == stage)
        .flat_map(|(_, m)| m.entry_points.iter())
        .find(|ep| ep.stage == stage.to_naga())
}

/// Collects user locations of a value, looking through struct members.
fn locations(module: &naga::Module, ty: naga::Handle<naga::Type>, binding: Option<&naga::Binding>, out: &mut BTreeSet<u32>) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn resource_kind(module: &naga::Module, ty: naga::Handle<naga::Type>) -> Option<ResourceKind> {
    match &module.types[ty].inner {
        naga::TypeInner::Image {
            dim: naga::ImageDimension::D2,
            arrayed: false,
            class: naga::ImageClass::Sampled { kind: naga::ScalarKind::Float, multi: false },
        } => Some(ResourceKind::Texture2d),
        naga::TypeInner::Sampler { comparison: false } => Some(ResourceKind::Sampler),
        _ => None,
    }
}

/// Checks that one vertex and one fragment stage fit together and reflects their resources.
pub(crate) fn link_interface(modules: &[(ShaderStage, &naga::Module)]) -> Result<Interface, GfxError> {
    let vertex = entry_point(modules, ShaderStage::Vertex)
        .ok_or_else(|| GfxError::link("program has no vertex stage"))?;
    let fragment = entry_point(modules, ShaderStage::Fragment)
        .ok_or_else(|| GfxError::link("program has no fragment stage"))?;

    let vertex_module = modules
        .iter()
        .find(|(s, _)| *s == ShaderStage::Vertex)
        .map(|(_, m)| *m)
        .ok_or_else(|| GfxError::link("program has no vertex stage"))?;
    let fragment_module = modules
        .iter()
        .find(|(s, _)| *s == ShaderStage::Fragment)
        .map(|(_, m)| *m)
        .ok_or_else(|| GfxError::link("program has no fragment stage"))?;

    let mut outputs = BTreeSet::new();
    if let Some(result) = &vertex.function.result {
        locations(vertex_module, result.ty, result.binding.as_ref(), &mut outputs);
    }
    let mut inputs = BTreeSet::new();
    for arg in &fragment.function.arguments {
        locations(fragment_module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }
    if let Some(missing) = inputs.difference(&outputs).next() {
        return Err(GfxError::link(format!(
            "fragment input @location({missing}) is not written by `{}`",
            vertex.name
        )));
    }

    let mut uniforms: BTreeMap<String, Uniform> = BTreeMap::new();
    for (_, module) in modules {
        for (_, var) in module.global_variables.iter() {
            let (Some(name), Some(binding)) = (&var.name, &var.binding) else { continue };
            let kind = resource_kind(module, var.ty).ok_or_else(|| {
                GfxError::link(format!("resource `{name}` has an unsupported type"))
            })?;
            let uniform = Uniform {
                location: UniformLocation { group: binding.group, binding: binding.binding },
                kind,
            };

            if let Some(existing) = uniforms.get(name) {
                if *existing != uniform {
                    return Err(GfxError::link(format!(
                        "resource `{name}` is declared differently across stages"
                    )));
                }
                continue;
            }
            if let Some((other, _)) = uniforms.iter().find(|(_, u)| u.location == uniform.location) {
                return Err(GfxError::link(format!(
                    "`{name}` and `{other}` share @group({}) @binding({})",
                    binding.group, binding.binding
                )));
            }
            uniforms.insert(name.clone(), uniform);
        }
    }

    Ok(Interface {
        vertex_entry: vertex.name.clone(),
        fragment_entry: fragment.name.clone(),
        uniforms,
    })
}

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
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
    }
}

/// A linked vertex + fragment pipeline with name-addressable resources.
#[derive(Debug)]
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layouts: Vec<wgpu::BindGroupLayout>,
    uniforms: BTreeMap<String, Uniform>,
    shaders: Vec<Shader>,
}

impl ShaderProgram {
    /// Links `shaders` into a render pipeline that reads `vertex_layout`.
    ///
    /// Takes ownership of the shaders; they are released with the program.
    pub fn link(
        ctx: &RenderCtx<'_>,
        shaders: Vec<Shader>,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<Self, GfxError> {
        let stages: Vec<(ShaderStage, &naga::Module)> =
            shaders.iter().map(|s| (s.stage, &s.ir)).collect();
        let interface = link_interface(&stages)?;

        let find = |stage: ShaderStage| shaders.iter().find(|s| s.stage == stage);
        let (Some(vs), Some(fs)) = (find(ShaderStage::Vertex), find(ShaderStage::Fragment)) else {
            return Err(GfxError::link("program needs a vertex and a fragment shader"));
        };

        let bind_group_layouts: Vec<wgpu::BindGroupLayout> = (0..interface.group_count())
            .map(|group| {
                let entries: Vec<wgpu::BindGroupLayoutEntry> = interface
                    .uniforms
                    .values()
                    .filter(|u| u.location.group == group)
                    .map(|u| wgpu::BindGroupLayoutEntry {
                        binding: u.location.binding,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: match u.kind {
                            ResourceKind::Texture2d => wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            ResourceKind::Sampler => {
                                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                            }
                        },
                        count: None,
                    })
                    .collect();
                ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("pinup program bgl"),
                    entries: &entries,
                })
            })
            .collect();

        let layout_refs: Vec<&wgpu::BindGroupLayout> = bind_group_layouts.iter().collect();
        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pinup program pipeline layout"),
            bind_group_layouts: &layout_refs,
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pinup program pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs.module,
                entry_point: Some(interface.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs.module,
                entry_point: Some(interface.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "linked program `{}`/`{}` with {} resource(s)",
            interface.vertex_entry,
            interface.fragment_entry,
            interface.uniforms.len()
        );

        Ok(Self {
            pipeline,
            bind_group_layouts,
            uniforms: interface.uniforms,
            shaders,
        })
    }

    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }

    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation, GfxError> {
        self.uniforms
            .get(name)
            .map(|u| u.location)
            .ok_or_else(|| GfxError::UniformNotFound { name: name.to_owned() })
    }

    /// Looks up the texture `name` and its `{name}_sampler`, which must share a group.
    pub fn texture_binding(&self, name: &str) -> Result<TextureBinding<'_>, GfxError> {
        let sampler_name = format!("{name}_sampler");
        let texture = self.typed(name, ResourceKind::Texture2d)?;
        let sampler = self.typed(&sampler_name, ResourceKind::Sampler)?;
        if texture.group != sampler.group {
            return Err(GfxError::link(format!(
                "`{name}` and `{sampler_name}` must share a bind group"
            )));
        }
        let layout = self
            .bind_group_layouts
            .get(texture.group as usize)
            .ok_or_else(|| GfxError::UniformNotFound { name: name.to_owned() })?;
        Ok(TextureBinding { layout, texture, sampler })
    }

    fn typed(&self, name: &str, kind: ResourceKind) -> Result<UniformLocation, GfxError> {
        match self.uniforms.get(name) {
            Some(u) if u.kind == kind => Ok(u.location),
            _ => Err(GfxError::UniformNotFound { name: name.to_owned() }),
        }
    }

    /// Releases the pipeline and the shaders it was linked from.
    pub fn release(self) {
        log::debug!("releasing program with {} shader(s)", self.shaders.len());
        drop(self);
    }
}
