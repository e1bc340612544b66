use winit::dpi::PhysicalSize;

/// Depth buffer format used by every depth-tested pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth attachment matching the drawable size.
///
/// The surface can be resized at any time; call [`DepthTarget::ensure_size`]
/// before each pass so the attachment never disagrees with the color target.
pub struct DepthTarget {
    /// Kept alive alongside its view.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("prism depth target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
            size,
        }
    }

    /// Recreates the attachment if `size` differs from the current one.
    ///
    /// Zero-sized requests (minimized windows) keep the old attachment.
    pub fn ensure_size(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 || size == self.size {
            return;
        }
        log::debug!("resizing depth target to {}x{}", size.width, size.height);
        *self = Self::new(device, size);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
