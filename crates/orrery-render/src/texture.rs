//! Image decoding and GPU texture upload: 2D body/model textures, the 1x1
//! white fallback for untextured objects, and the six-face skybox cube.

use std::path::{Path, PathBuf};

/// GPU textures are always uploaded as sRGB RGBA8.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Errors that can occur while decoding or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported channel count {0}; expected 1, 3 or 4")]
    UnsupportedChannels(u8),

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("cube face {face} is {found:?}, expected {expected:?}")]
    CubeFaceSize {
        face: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
}

/// Decoded pixels with their native channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// 1 = luminance, 3 = RGB, 4 = RGBA.
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(TextureError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: pixels.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// Decode an image file, keeping luminance, RGB and RGBA layouts as-is.
    /// Two-channel and high bit depth images are widened to RGBA.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = (img.width(), img.height());
        let (channels, pixels) = match img {
            image::DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            image::DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other => (4, other.into_rgba8().into_raw()),
        };
        Self::new(width, height, channels, pixels)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Expand to tightly packed RGBA8.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            3 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
            _ => self
                .pixels
                .iter()
                .flat_map(|&l| [l, l, l, u8::MAX])
                .collect(),
        }
    }
}

/// A texture and its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
}

impl GpuTexture {
    /// Upload a 2D image.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
    ) -> Self {
        let (width, height) = image.dimensions();
        let texture = create_texture(device, label, width, height, 1);
        write_layer(queue, &texture, 0, width, height, &image.to_rgba8());
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            dimensions: (width, height),
        }
    }

    /// 1x1 opaque white, bound for untextured objects.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = ImageData {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![u8::MAX; 4],
        };
        Self::from_image(device, queue, "white-texture", &white)
    }

    /// Load and upload `path`, or `None` if there is no path or decoding fails.
    /// Failures are logged; they never abort startup.
    pub fn load_optional(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: Option<&Path>,
    ) -> Option<Self> {
        let path = path?;
        match ImageData::load(path) {
            Ok(image) => {
                log::info!(
                    "Loaded texture {} ({}x{}, {} channels)",
                    path.display(),
                    image.width,
                    image.height,
                    image.channels
                );
                Some(Self::from_image(device, queue, &path.display().to_string(), &image))
            }
            Err(e) => {
                log::warn!("Texture unavailable, drawing untextured: {e}");
                None
            }
        }
    }

    /// Upload six equally sized faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[ImageData; 6],
    ) -> Result<Self, TextureError> {
        let expected = faces[0].dimensions();
        if let Some((face, img)) = faces
            .iter()
            .enumerate()
            .find(|(_, img)| img.dimensions() != expected)
        {
            return Err(TextureError::CubeFaceSize {
                face,
                expected,
                found: img.dimensions(),
            });
        }

        let (width, height) = expected;
        let texture = create_texture(device, "skybox-cube", width, height, 6);
        for (layer, face) in faces.iter().enumerate() {
            write_layer(queue, &texture, layer as u32, width, height, &face.to_rgba8());
        }
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("skybox-cube-view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            dimensions: expected,
        })
    }
}

fn create_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    layers: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: layers,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    layer: u32,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Linear, repeating sampler shared by all 2D textures.
pub fn create_linear_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}
