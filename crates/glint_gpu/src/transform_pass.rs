use crate::buffers::SceneBuffers;

/// Invocations per workgroup, matching `@workgroup_size` in transform.wgsl.
pub const WORKGROUP_SIZE: u32 = 64;

/// Workgroups needed to cover `triangles` invocations.
pub fn workgroup_count(triangles: u32) -> u32 {
    triangles.div_ceil(WORKGROUP_SIZE)
}

/// Compute pass writing world-space triangles from meshes and transforms.
pub struct TransformPass {
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    triangle_count: u32,
}

impl TransformPass {
    pub fn new(device: &wgpu::Device, shader: &wgpu::ShaderModule, buffers: &SceneBuffers) -> Self {
        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[storage(0, true), storage(1, true), storage(2, false)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffers.meshes.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.transforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.triangles.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Transform Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Transform Pipeline"),
            layout: Some(&pipeline_layout),
            module: shader,
            entry_point: "main",
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            triangle_count: buffers.triangle_count(),
        }
    }

    pub fn record(&self, encoder: &mut wgpu::CommandEncoder) {
        let groups = workgroup_count(self.triangle_count);
        if groups == 0 {
            return;
        }

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Transform Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(groups, 1, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workgroup_count() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(14), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(1000), 16);
    }

    #[test]
    fn test_workgroup_size_matches_shader() {
        let attr = format!("@workgroup_size({WORKGROUP_SIZE})");
        assert!(crate::shaders::TRANSFORM_WGSL.contains(&attr));
    }
}
