//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and straight-alpha color.
///
/// Frames are built in viewport pixels (y down); [`Vertex::to_ndc`] maps
/// them to clip space just before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Pixel position to normalized device coordinates (y up)
    pub fn to_ndc(self, width: f32, height: f32) -> Self {
        let [x, y] = self.position;
        Self::new(x / width * 2.0 - 1.0, 1.0 - y / height * 2.0, self.color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let c = [1.0; 4];
        assert_eq!(Vertex::new(0.0, 0.0, c).to_ndc(400.0, 800.0).position, [-1.0, 1.0]);
        assert_eq!(Vertex::new(400.0, 800.0, c).to_ndc(400.0, 800.0).position, [1.0, -1.0]);
        assert_eq!(Vertex::new(200.0, 400.0, c).to_ndc(400.0, 800.0).position, [0.0, 0.0]);
    }

    #[test]
    fn test_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
