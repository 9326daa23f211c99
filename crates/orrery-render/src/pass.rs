//! The single scene render pass: cleared colour target plus reverse-Z depth.

use crate::depth::DepthBuffer;

/// Convert a persisted RGB clear colour to an opaque `wgpu::Color`.
pub fn clear_color(rgb: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0] as f64,
        g: rgb[1] as f64,
        b: rgb[2] as f64,
        a: 1.0,
    }
}

/// Begin the scene pass, clearing colour to `clear` and depth to the far plane.
pub fn begin_scene_pass<'encoder>(
    encoder: &'encoder mut wgpu::CommandEncoder,
    color_view: &wgpu::TextureView,
    depth: &DepthBuffer,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'encoder> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("scene-pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_color_is_opaque() {
        let c = clear_color([0.25, 0.5, 1.0]);
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 1.0, 1.0));
    }

    #[test]
    fn test_black_default() {
        assert_eq!(clear_color([0.0; 3]), wgpu::Color::BLACK);
    }
}
