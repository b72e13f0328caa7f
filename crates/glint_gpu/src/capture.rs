//! Reading the offscreen target back to the CPU.

use image::{Rgb, RgbImage};
use thiserror::Error;

const BYTES_PER_PIXEL: u32 = 4;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("Readback channel closed before the buffer was mapped")]
    ChannelClosed,

    #[error("Readback holds {actual} bytes, {expected} needed for {width}x{height}")]
    Size {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row pitch of an RGBA8 copy of `width` pixels, padded to
/// `COPY_BYTES_PER_ROW_ALIGNMENT` (256 bytes).
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop the row padding and alpha of a mapped RGBA8 readback.
pub fn unpad_rows(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
) -> Result<RgbImage, CaptureError> {
    let pitch = padded_bytes_per_row as usize;
    let expected = pitch * height as usize;
    if data.len() < expected || pitch < (width * BYTES_PER_PIXEL) as usize {
        return Err(CaptureError::Size {
            width,
            height,
            expected,
            actual: data.len(),
        });
    }

    let mut image = RgbImage::new(width, height);
    for (y, row) in data.chunks_exact(pitch).take(height as usize).enumerate() {
        for (x, pixel) in row.chunks_exact(BYTES_PER_PIXEL as usize).take(width as usize).enumerate() {
            image.put_pixel(x as u32, y as u32, Rgb([pixel[0], pixel[1], pixel[2]]));
        }
    }
    Ok(image)
}

/// Readback buffer sized for one frame of the trace target.
pub struct FrameCapture {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

impl FrameCapture {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let padded_bytes_per_row = padded_bytes_per_row(width);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Readback Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            width,
            height,
            padded_bytes_per_row,
        }
    }

    /// Copy `texture` into the readback buffer.
    pub fn record_copy(&self, encoder: &mut wgpu::CommandEncoder, texture: &wgpu::Texture) {
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &self.buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Map the buffer after a submitted copy and convert it to an image.
    pub fn read(&self, device: &wgpu::Device) -> Result<RgbImage, CaptureError> {
        let slice = self.buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        receiver.recv().map_err(|_| CaptureError::ChannelClosed)??;

        let image = {
            let data = slice.get_mapped_range();
            unpad_rows(&data, self.width, self.height, self.padded_bytes_per_row)
        };
        self.buffer.unmap();
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_bytes_per_row() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1280), 5120);
        assert_eq!(padded_bytes_per_row(1366), 5632);
    }

    #[test]
    fn test_unpad_rows() {
        let width = 3;
        let height = 2;
        let pitch = padded_bytes_per_row(width);
        let mut data = vec![0xAA; (pitch * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let i = (y * pitch + x * 4) as usize;
                data[i..i + 4].copy_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }

        let image = unpad_rows(&data, width, height, pitch).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 7]);
        assert_eq!(image.get_pixel(2, 0).0, [2, 0, 7]);
        assert_eq!(image.get_pixel(1, 1).0, [1, 1, 7]);
    }

    #[test]
    fn test_unpad_rows_rejects_short_buffer() {
        let pitch = padded_bytes_per_row(4);
        let data = vec![0; pitch as usize];
        let err = unpad_rows(&data, 4, 2, pitch).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::Size {
                expected: 512,
                actual: 256,
                ..
            }
        ));
    }
}
