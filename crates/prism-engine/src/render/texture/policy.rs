/// How a texture is sampled, decided by its dimensions.
///
/// Mipmaps and repeat wrapping are only used when both dimensions are powers
/// of two; any other size is sampled from its base level with clamp-to-edge
/// wrapping and linear filtering.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SamplingPolicy {
    /// Full mip chain, repeat wrapping.
    Mipmapped { mip_level_count: u32 },
    /// Base level only, clamp-to-edge wrapping, linear filtering.
    ClampLinear,
}

impl SamplingPolicy {
    pub fn for_size(width: u32, height: u32) -> Self {
        if width.is_power_of_two() && height.is_power_of_two() {
            SamplingPolicy::Mipmapped {
                mip_level_count: mip_level_count(width, height),
            }
        } else {
            SamplingPolicy::ClampLinear
        }
    }

    pub fn mip_level_count(&self) -> u32 {
        match self {
            SamplingPolicy::Mipmapped { mip_level_count } => *mip_level_count,
            SamplingPolicy::ClampLinear => 1,
        }
    }

    pub fn generates_mipmaps(&self) -> bool {
        self.mip_level_count() > 1
    }

    pub fn sampler_descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        match self {
            // Nearest within a level, linear between levels; linear magnification.
            SamplingPolicy::Mipmapped { .. } => wgpu::SamplerDescriptor {
                label: Some("prism mipmapped sampler"),
                address_mode_u: wgpu::AddressMode::Repeat,
                address_mode_v: wgpu::AddressMode::Repeat,
                address_mode_w: wgpu::AddressMode::Repeat,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::MipmapFilterMode::Linear,
                ..Default::default()
            },
            SamplingPolicy::ClampLinear => wgpu::SamplerDescriptor {
                label: Some("prism clamp-linear sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            },
        }
    }
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_gets_full_mip_chain() {
        let p = SamplingPolicy::for_size(256, 256);
        assert_eq!(p, SamplingPolicy::Mipmapped { mip_level_count: 9 });
        assert!(p.generates_mipmaps());

        let d = p.sampler_descriptor();
        assert_eq!(d.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(d.mipmap_filter, wgpu::MipmapFilterMode::Linear);
    }

    #[test]
    fn non_power_of_two_clamps_and_filters_linearly() {
        let p = SamplingPolicy::for_size(300, 200);
        assert_eq!(p, SamplingPolicy::ClampLinear);
        assert_eq!(p.mip_level_count(), 1);
        assert!(!p.generates_mipmaps());

        let d = p.sampler_descriptor();
        assert_eq!(d.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(d.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(d.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.mag_filter, wgpu::FilterMode::Linear);
    }

    #[test]
    fn one_non_power_of_two_side_is_enough_to_clamp() {
        assert_eq!(SamplingPolicy::for_size(256, 200), SamplingPolicy::ClampLinear);
        assert_eq!(SamplingPolicy::for_size(3, 512), SamplingPolicy::ClampLinear);
    }

    #[test]
    fn rectangular_power_of_two_uses_longest_side() {
        assert_eq!(
            SamplingPolicy::for_size(512, 8),
            SamplingPolicy::Mipmapped { mip_level_count: 10 }
        );
    }

    #[test]
    fn one_by_one_has_a_single_level() {
        let p = SamplingPolicy::for_size(1, 1);
        assert_eq!(p.mip_level_count(), 1);
        assert!(!p.generates_mipmaps());
    }

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(300, 200), 9);
        assert_eq!(mip_level_count(1024, 1024), 11);
    }
}
