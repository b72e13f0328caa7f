//! WGSL sources for the three passes.
//!
//! The sources are embedded at build time. A shader directory can be given
//! to load edited copies at startup instead. Any copy that cannot be read
//! or does not compile is replaced by the embedded source.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

pub const TRANSFORM_WGSL: &str = include_str!("shaders/transform.wgsl");
pub const TRACE_WGSL: &str = include_str!("shaders/trace.wgsl");
pub const PRESENT_WGSL: &str = include_str!("shaders/present.wgsl");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Transform,
    Trace,
    Present,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 3] = [ShaderKind::Transform, ShaderKind::Trace, ShaderKind::Present];

    pub fn file_name(self) -> &'static str {
        match self {
            ShaderKind::Transform => "transform.wgsl",
            ShaderKind::Trace => "trace.wgsl",
            ShaderKind::Present => "present.wgsl",
        }
    }

    pub fn embedded(self) -> &'static str {
        match self {
            ShaderKind::Transform => TRANSFORM_WGSL,
            ShaderKind::Trace => TRACE_WGSL,
            ShaderKind::Present => PRESENT_WGSL,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShaderKind::Transform => "Transform Shader",
            ShaderKind::Trace => "Trace Shader",
            ShaderKind::Present => "Present Shader",
        }
    }
}

/// Resolves and compiles the WGSL modules.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Source text for `kind`: the file from the shader directory if one is
    /// set and readable, otherwise the embedded copy.
    pub fn source(&self, kind: ShaderKind) -> Cow<'static, str> {
        let Some(dir) = &self.dir else {
            return Cow::Borrowed(kind.embedded());
        };

        let path = dir.join(kind.file_name());
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                info!("Loaded {} from {}", kind.file_name(), path.display());
                Cow::Owned(source)
            }
            Err(err) => {
                warn!(
                    "Could not read {}: {}, using the built-in shader",
                    path.display(),
                    err
                );
                Cow::Borrowed(kind.embedded())
            }
        }
    }

    /// Compile `kind` on `device`.
    ///
    /// Compilation runs inside a validation error scope. When the resolved
    /// source fails, the error is logged and the embedded source is used.
    pub fn compile(&self, device: &wgpu::Device, kind: ShaderKind) -> wgpu::ShaderModule {
        let source = self.source(kind);
        let is_embedded = matches!(source, Cow::Borrowed(_));

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = create_module(device, kind, source);
        let Some(err) = pollster::block_on(device.pop_error_scope()) else {
            return module;
        };

        error!("Failed to compile {}:\n{}", kind.file_name(), err);
        if is_embedded {
            return module;
        }

        warn!("Falling back to the built-in {}", kind.file_name());
        create_module(device, kind, Cow::Borrowed(kind.embedded()))
    }

    /// Compile `kind` and hand the module to `build`, which creates the
    /// pipeline and whatever else the pass owns.
    ///
    /// Creation runs inside a validation error scope. A shader from the
    /// shader directory that compiles but does not fit the pipeline (a
    /// renamed entry point, a changed binding) is replaced by the embedded
    /// one and the pass is built again. Failures with the embedded shader
    /// are returned.
    pub fn build<T>(
        &self,
        device: &wgpu::Device,
        kind: ShaderKind,
        build: impl Fn(&wgpu::ShaderModule) -> T,
    ) -> anyhow::Result<T> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = self.compile(device, kind);
        let built = build(&shader);
        let Some(err) = pollster::block_on(device.pop_error_scope()) else {
            return Ok(built);
        };

        if self.dir().is_none() {
            anyhow::bail!("Failed to create the {} pipeline: {}", kind.file_name(), err);
        }

        error!("Pipeline for {} rejected:\n{}", kind.file_name(), err);
        warn!("Falling back to the built-in {}", kind.file_name());
        Self::embedded().build(device, kind, build)
    }
}

fn create_module(device: &wgpu::Device, kind: ShaderKind, source: Cow<'static, str>) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(kind.label()),
        source: wgpu::ShaderSource::Wgsl(source),
    })
}
