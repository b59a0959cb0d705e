use gl::types::*;
use image::{GrayImage, Rgb, RgbImage};
use std::path::Path;

use crate::error::RenderError;

/// Horizontal/vertical addressing for a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Wrap {
    Repeat,
    /// Repeat across S, clamp on T. Used for equirectangular maps.
    RepeatClampV,
}

pub struct Texture {
    id: GLuint,
}

impl Texture {
    pub fn from_rgb(image: &RgbImage, wrap: Wrap) -> Result<Self, RenderError> {
        upload(image.width(), image.height(), gl::RGB, image.as_raw(), wrap)
    }

    /// Single-channel image, sampled as grey in every channel.
    pub fn from_gray(image: &GrayImage, wrap: Wrap) -> Result<Self, RenderError> {
        let texture = upload(image.width(), image.height(), gl::RED, image.as_raw(), wrap)?;
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, texture.id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_SWIZZLE_G, gl::RED as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_SWIZZLE_B, gl::RED as GLint);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        Ok(texture)
    }

    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

fn upload(width: u32, height: u32, format: GLenum, pixels: &[u8], wrap: Wrap) -> Result<Texture, RenderError> {
    let (w, h) = match (GLsizei::try_from(width), GLsizei::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(RenderError::TextureTooLarge { width, height }),
    };
    let (wrap_s, wrap_t) = match wrap {
        Wrap::Repeat => (gl::REPEAT, gl::REPEAT),
        Wrap::RepeatClampV => (gl::REPEAT, gl::CLAMP_TO_EDGE),
    };

    let mut id = 0;
    unsafe {
        gl::GenTextures(1, &mut id);
        gl::BindTexture(gl::TEXTURE_2D, id);
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            format as GLint,
            w,
            h,
            0,
            format,
            gl::UNSIGNED_BYTE,
            pixels.as_ptr() as *const _,
        );
        gl::GenerateMipmap(gl::TEXTURE_2D);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, wrap_s as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, wrap_t as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR_MIPMAP_LINEAR as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
        gl::BindTexture(gl::TEXTURE_2D, 0);
    }

    Ok(Texture { id })
}

/// Decode an image file, or fall back to a checker in `fallback` so the scene still renders.
pub fn load_rgb_or_placeholder(path: &Path, fallback: [u8; 3]) -> RgbImage {
    match image::open(path) {
        Ok(img) => {
            let rgb = img.to_rgb8();
            log::info!("loaded {} ({}x{})", path.display(), rgb.width(), rgb.height());
            rgb
        }
        Err(e) => {
            log::warn!("could not load {}: {e}; using placeholder", path.display());
            placeholder(fallback)
        }
    }
}

/// 8x8 checker of `color` and a lighter tint of it.
pub fn placeholder(color: [u8; 3]) -> RgbImage {
    let light = color.map(|c| c / 2 + 128);
    RgbImage::from_fn(8, 8, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb(color)
        } else {
            Rgb(light)
        }
    })
}
