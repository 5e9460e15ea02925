//! Sprite texture slots
//!
//! Each entity kind owns one slot. A slot starts as a 1x1 placeholder
//! color and is swapped for decoded image pixels whenever the async load
//! completes; until then (or forever, if the load fails) the placeholder
//! is what gets drawn.

/// Entity kinds with a dedicated sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Block,
    Projectile,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 3] = [
        SpriteKind::Player,
        SpriteKind::Block,
        SpriteKind::Projectile,
    ];

    pub fn index(self) -> usize {
        match self {
            SpriteKind::Player => 0,
            SpriteKind::Block => 1,
            SpriteKind::Projectile => 2,
        }
    }

    /// Placeholder pixel shown until the sprite image arrives: opaque blue
    /// for the player, fully transparent for blocks and projectiles.
    pub fn placeholder_rgba(self) -> [u8; 4] {
        match self {
            SpriteKind::Player => [0, 0, 255, 255],
            SpriteKind::Block => [255, 0, 0, 0],
            SpriteKind::Projectile => [0, 255, 0, 0],
        }
    }

    fn label(self) -> &'static str {
        match self {
            SpriteKind::Player => "player-sprite",
            SpriteKind::Block => "block-sprite",
            SpriteKind::Projectile => "projectile-sprite",
        }
    }
}

/// A bound sprite texture
pub struct SpriteSlot {
    pub bind_group: wgpu::BindGroup,
}

impl SpriteSlot {
    /// Create a slot holding the kind's 1x1 placeholder color
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        kind: SpriteKind,
    ) -> Self {
        Self::from_rgba(device, queue, layout, sampler, kind, 1, 1, &kind.placeholder_rgba())
    }

    /// Create a slot from decoded RGBA pixels
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        kind: SpriteKind,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(kind.label()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(kind.label()),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self { bind_group }
    }
}
