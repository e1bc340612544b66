use super::{DecodedImage, MipmapGenerator, SamplingPolicy, TextureLoadError};

/// Texel format of the cube texture.
///
/// Unorm, not sRGB: image bytes reach the shader unconverted.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Opaque blue, shown until the real image is uploaded.
pub const PLACEHOLDER_TEXEL: [u8; 4] = [0, 0, 255, 255];

/// Layout of the texture bind group: texture at binding 0, sampler at 1.
pub fn texture_bind_group_layout(
    device: &wgpu::Device,
    texture_binding: u32,
    sampler_binding: u32,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("prism texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: texture_binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: sampler_binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Stable handle to the cube texture.
///
/// Always holds a complete texture + sampler + bind group. Replacing the image
/// swaps all three together, so the pipeline never sees an unbound slot.
pub struct TextureSlot {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    policy: SamplingPolicy,
    size: (u32, u32),
    texture_binding: u32,
    sampler_binding: u32,
}

impl TextureSlot {
    /// Creates the slot holding the 1x1 placeholder texel.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        texture_binding: u32,
        sampler_binding: u32,
    ) -> Self {
        let policy = SamplingPolicy::for_size(1, 1);
        let texture = upload(
            device,
            queue,
            1,
            1,
            &PLACEHOLDER_TEXEL,
            policy,
            "prism placeholder texture",
        );
        let bind_group = bind(device, layout, &texture, policy, texture_binding, sampler_binding);

        Self {
            texture,
            bind_group,
            policy,
            size: (1, 1),
            texture_binding,
            sampler_binding,
        }
    }

    /// Uploads `image` into the slot, choosing mipmaps or clamp-linear sampling
    /// from its dimensions.
    ///
    /// Images the device cannot hold are rejected before any GPU object is
    /// created; the slot then keeps its current texture.
    pub fn replace(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        mipmaps: &MipmapGenerator,
        image: &DecodedImage,
    ) -> Result<(), TextureLoadError> {
        check_image(image, device.limits().max_texture_dimension_2d)?;

        let policy = SamplingPolicy::for_size(image.width, image.height);
        let texture = upload(
            device,
            queue,
            image.width,
            image.height,
            &image.rgba,
            policy,
            "prism cube texture",
        );
        if policy.generates_mipmaps() {
            mipmaps.generate(device, queue, &texture, policy.mip_level_count());
        }

        self.bind_group = bind(
            device,
            layout,
            &texture,
            policy,
            self.texture_binding,
            self.sampler_binding,
        );
        self.texture = texture;
        self.policy = policy;
        self.size = (image.width, image.height);

        log::info!(
            "texture uploaded: {}x{} ({:?})",
            image.width,
            image.height,
            policy
        );
        Ok(())
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Rejects images with an empty side, a side above `max`, or a pixel buffer
/// that does not match the dimensions.
fn check_image(image: &DecodedImage, max: u32) -> Result<(), TextureLoadError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 || width > max || height > max {
        return Err(TextureLoadError::Unsupported { width, height, max });
    }

    let expected = width as usize * height as usize * 4;
    if image.rgba.len() != expected {
        return Err(TextureLoadError::Malformed {
            width,
            height,
            len: image.rgba.len(),
        });
    }
    Ok(())
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    rgba: &[u8],
    policy: SamplingPolicy,
    label: &str,
) -> wgpu::Texture {
    let mip_level_count = policy.mip_level_count();
    let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
    if mip_level_count > 1 {
        usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
    }

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

fn bind(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::Texture,
    policy: SamplingPolicy,
    texture_binding: u32,
    sampler_binding: u32,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&policy.sampler_descriptor());

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("prism texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: texture_binding,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: sampler_binding,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::headless_device;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            width,
            height,
            rgba: vec![200; width as usize * height as usize * 4],
        }
    }

    struct Fixture {
        device: wgpu::Device,
        queue: wgpu::Queue,
        layout: wgpu::BindGroupLayout,
        mipmaps: MipmapGenerator,
        slot: TextureSlot,
    }

    impl Fixture {
        fn new() -> Option<Self> {
            let Some((device, queue)) = headless_device() else {
                eprintln!("no GPU adapter available, skipping");
                return None;
            };
            let layout = texture_bind_group_layout(&device, 0, 1);
            let mipmaps = MipmapGenerator::new(&device);
            let slot = TextureSlot::placeholder(&device, &queue, &layout, 0, 1);
            Some(Self {
                device,
                queue,
                layout,
                mipmaps,
                slot,
            })
        }

        fn replace(&mut self, image: &DecodedImage) -> Result<(), TextureLoadError> {
            self.slot.replace(
                &self.device,
                &self.queue,
                &self.layout,
                &self.mipmaps,
                image,
            )
        }
    }

    #[test]
    fn image_checks() {
        assert!(check_image(&image(256, 256), 2048).is_ok());
        assert!(check_image(&image(2048, 1), 2048).is_ok());

        assert!(matches!(
            check_image(&image(4096, 4), 2048),
            Err(TextureLoadError::Unsupported { width: 4096, height: 4, max: 2048 })
        ));
        assert!(matches!(
            check_image(&image(0, 0), 2048),
            Err(TextureLoadError::Unsupported { .. })
        ));

        let mut short = image(4, 4);
        short.rgba.pop();
        assert!(matches!(
            check_image(&short, 2048),
            Err(TextureLoadError::Malformed { len: 63, .. })
        ));
    }

    #[test]
    fn placeholder_is_one_unmipmapped_texel() {
        let Some(f) = Fixture::new() else {
            return;
        };
        assert_eq!(f.slot.size(), (1, 1));
        assert_eq!(f.slot.policy(), SamplingPolicy::ClampLinear);
        assert_eq!(f.slot.texture.mip_level_count(), 1);
        assert_eq!(f.slot.texture.format(), TEXTURE_FORMAT);
    }

    #[test]
    fn power_of_two_image_gets_a_generated_mip_chain() {
        let Some(mut f) = Fixture::new() else {
            return;
        };
        f.replace(&image(256, 256)).unwrap();

        assert_eq!(f.slot.size(), (256, 256));
        assert_eq!(f.slot.policy(), SamplingPolicy::Mipmapped { mip_level_count: 9 });
        assert_eq!(f.slot.texture.mip_level_count(), 9);
        assert!(f
            .slot
            .texture
            .usage()
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
    }

    #[test]
    fn non_power_of_two_image_has_a_single_level() {
        let Some(mut f) = Fixture::new() else {
            return;
        };
        f.replace(&image(300, 200)).unwrap();

        assert_eq!(f.slot.size(), (300, 200));
        assert_eq!(f.slot.policy(), SamplingPolicy::ClampLinear);
        assert_eq!(f.slot.texture.mip_level_count(), 1);
        assert!(!f
            .slot
            .texture
            .usage()
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
    }

    #[test]
    fn oversized_and_empty_images_keep_the_current_texture() {
        let Some(mut f) = Fixture::new() else {
            return;
        };
        let max = f.device.limits().max_texture_dimension_2d;

        let too_wide = DecodedImage {
            width: max + 1,
            height: 1,
            rgba: Vec::new(),
        };
        assert!(matches!(
            f.replace(&too_wide),
            Err(TextureLoadError::Unsupported { .. })
        ));
        assert!(matches!(
            f.replace(&image(0, 0)),
            Err(TextureLoadError::Unsupported { .. })
        ));

        assert_eq!(f.slot.size(), (1, 1));
        assert_eq!(f.slot.texture.width(), 1);
    }

    #[test]
    fn device_accepts_textures_beyond_downlevel_limits() {
        let Some(mut f) = Fixture::new() else {
            return;
        };
        let max = f.device.limits().max_texture_dimension_2d;
        if max <= 2048 {
            eprintln!("adapter limited to {max} texels per side, skipping");
            return;
        }

        f.replace(&image(4096, 4)).unwrap();
        assert_eq!(f.slot.size(), (4096, 4));
        assert_eq!(f.slot.policy().mip_level_count(), 13);
    }
}
