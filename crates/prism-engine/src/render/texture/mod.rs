//! The cube's single texture: a placeholder that is always bindable, an
//! off-thread image loader, and the sampling policy applied on upload.

mod loader;
mod mipmap;
mod policy;
mod slot;

pub use loader::{load_image, DecodedImage, TextureLoadError, TextureLoader};
pub use mipmap::MipmapGenerator;
pub use policy::{mip_level_count, SamplingPolicy};
pub use slot::{texture_bind_group_layout, TextureSlot, PLACEHOLDER_TEXEL, TEXTURE_FORMAT};
