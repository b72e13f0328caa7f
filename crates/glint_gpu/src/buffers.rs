use glint_scene::{
    FrameState, FrameUniform, GpuLight, GpuMesh, GpuMeshTransform, GpuTriangle, Scene, TraceParams,
};
use wgpu::util::DeviceExt;

/// GPU buffers shared by the transform and trace passes.
///
/// Storage buffers are never empty: a binding needs at least one element,
/// and a zeroed triangle or light contributes nothing to the image.
pub struct SceneBuffers {
    /// Object-space meshes, written once
    pub meshes: wgpu::Buffer,
    /// One `GpuMeshTransform` per mesh, written every frame
    pub transforms: wgpu::Buffer,
    /// World-space triangles, written by the transform pass
    pub triangles: wgpu::Buffer,
    /// Written every frame
    pub lights: wgpu::Buffer,
    pub frame: wgpu::Buffer,
    mesh_count: usize,
    triangle_count: u32,
    light_count: usize,
}

impl SceneBuffers {
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let light_count = scene.light_count();
        let mut meshes = scene.to_gpu_meshes();
        let mesh_count = meshes.len();
        if meshes.is_empty() {
            meshes.push(GpuMesh::default());
        }
        let triangle_count = scene.triangle_count() as u32;

        let meshes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Buffer"),
            contents: bytemuck::cast_slice(&meshes),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let transforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Transform Buffer"),
            size: array_size::<GpuMeshTransform>(mesh_count),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let triangles = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("World Triangle Buffer"),
            size: array_size::<GpuTriangle>(triangle_count as usize),
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        let lights = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Buffer"),
            size: array_size::<GpuLight>(light_count),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "Scene buffers: {} meshes, {} triangles, {} lights",
            mesh_count,
            triangle_count,
            light_count
        );

        Self {
            meshes: meshes_buffer,
            transforms,
            triangles,
            lights,
            frame,
            mesh_count,
            triangle_count,
            light_count,
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Write the per-frame transforms, lights and uniform.
    pub fn upload(
        &self,
        queue: &wgpu::Queue,
        frame: &FrameState,
        params: &TraceParams,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            frame.transforms.len() == self.mesh_count,
            "Frame has {} transforms but the scene has {} meshes",
            frame.transforms.len(),
            self.mesh_count
        );
        anyhow::ensure!(
            frame.lights.len() == self.light_count,
            "Frame has {} lights but the light buffer holds {}",
            frame.lights.len(),
            self.light_count
        );

        if self.mesh_count > 0 {
            queue.write_buffer(
                &self.transforms,
                0,
                bytemuck::cast_slice(&frame.gpu_transforms()),
            );
        }
        if self.light_count > 0 {
            queue.write_buffer(&self.lights, 0, bytemuck::cast_slice(&frame.gpu_lights()));
        }
        queue.write_buffer(
            &self.frame,
            0,
            bytemuck::bytes_of(&frame.frame_uniform(params)),
        );
        Ok(())
    }
}

/// Byte size of a storage array of `count` elements, at least one element.
fn array_size<T>(count: usize) -> u64 {
    (count.max(1) * std::mem::size_of::<T>()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_size() {
        assert_eq!(array_size::<GpuTriangle>(14), 14 * 80);
        assert_eq!(array_size::<GpuLight>(2), 96);
        // Never zero sized
        assert_eq!(array_size::<GpuLight>(0), 48);
    }
}
