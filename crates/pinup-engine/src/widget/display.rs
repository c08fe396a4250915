//! Ownership of the displayed texture and the replacement protocol.
//!
//! Replacement runs decode, upload, swap, resize, notify, in that order.
//! Anything failing before the swap leaves the current texture and the
//! window as they were.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::gfx::{ShaderProgram, Texture};
use crate::handlers::{ImageReplacer, ResetSubscriber};
use crate::picture::{self, Picture};
use crate::render::RenderCtx;
use crate::window::{WindowControl, fit_within};

use super::error::WidgetError;
use super::TEXTURE_UNIFORM;

/// Creates and releases textures for [`Display`].
pub trait TextureFactory {
    type Texture;

    fn create_texture(&mut self, picture: &Picture) -> Result<Self::Texture, WidgetError>;

    fn release_texture(&mut self, texture: Self::Texture);
}

/// Uploads to the GPU for the program's `texture0` binding.
pub struct GpuTextures<'a> {
    ctx: RenderCtx<'a>,
    program: &'a ShaderProgram,
    wrap: wgpu::AddressMode,
}

impl<'a> GpuTextures<'a> {
    pub fn new(ctx: RenderCtx<'a>, program: &'a ShaderProgram, wrap: wgpu::AddressMode) -> Self {
        Self { ctx, program, wrap }
    }
}

impl TextureFactory for GpuTextures<'_> {
    type Texture = Texture;

    fn create_texture(&mut self, picture: &Picture) -> Result<Texture, WidgetError> {
        let binding = self.program.texture_binding(TEXTURE_UNIFORM)?;
        Ok(Texture::create(&self.ctx, picture, self.wrap, &binding)?)
    }

    fn release_texture(&mut self, texture: Texture) {
        texture.release();
    }
}

pub struct Display<T> {
    current: Option<T>,
    subscribers: Vec<Rc<RefCell<dyn ResetSubscriber>>>,
}

impl<T> Default for Display<T> {
    fn default() -> Self {
        Self {
            current: None,
            subscribers: Vec::new(),
        }
    }
}

impl<T> Display<T> {
    pub fn subscribe(&mut self, subscriber: Rc<RefCell<dyn ResetSubscriber>>) {
        self.subscribers.push(subscriber);
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.current.as_mut()
    }

    pub fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }

    /// Makes `picture` the displayed image and sizes the window to it,
    /// shrunk to fit [`WindowControl::max_extent`].
    pub fn show<F>(
        &mut self,
        factory: &mut F,
        picture: &Picture,
        window: &mut dyn WindowControl,
    ) -> Result<(), WidgetError>
    where
        F: TextureFactory<Texture = T>,
    {
        let texture = factory.create_texture(picture)?;
        if let Some(old) = self.current.replace(texture) {
            factory.release_texture(old);
        }

        let width = i32::try_from(picture.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(picture.height()).unwrap_or(i32::MAX);
        let (width, height) = fit_within(width, height, window.max_extent());
        window.set_size(width, height);
        for subscriber in &self.subscribers {
            subscriber.borrow_mut().on_image_replaced(&*window);
        }
        Ok(())
    }

    pub fn replace_texture<F>(
        &mut self,
        factory: &mut F,
        path: &Path,
        window: &mut dyn WindowControl,
    ) -> Result<(), WidgetError>
    where
        F: TextureFactory<Texture = T>,
    {
        let picture = picture::open(path)?;
        self.show(factory, &picture, window)
    }

    pub fn set_default_texture<F>(
        &mut self,
        factory: &mut F,
        window: &mut dyn WindowControl,
    ) -> Result<(), WidgetError>
    where
        F: TextureFactory<Texture = T>,
    {
        let picture = picture::default_picture()?;
        self.show(factory, &picture, window)
    }

    /// Shows `path` if given and loadable, else the built-in image.
    pub fn load_initial<F>(
        &mut self,
        factory: &mut F,
        path: Option<&Path>,
        window: &mut dyn WindowControl,
    ) -> Result<(), WidgetError>
    where
        F: TextureFactory<Texture = T>,
    {
        if let Some(path) = path {
            match self.replace_texture(factory, path, window) {
                Ok(()) => {
                    log::info!("showing {}", path.display());
                    return Ok(());
                }
                Err(err) => {
                    log::warn!("could not load {}: {err}; using the default image", path.display())
                }
            }
        }
        self.set_default_texture(factory, window)
    }
}

/// A display paired with the factory that feeds it, as handlers see it.
pub struct DisplayUpdate<'a, F: TextureFactory> {
    pub display: &'a mut Display<F::Texture>,
    pub factory: &'a mut F,
}

impl<F: TextureFactory> ImageReplacer for DisplayUpdate<'_, F> {
    fn replace_image(&mut self, path: &Path, window: &mut dyn WindowControl) -> Result<(), WidgetError> {
        self.display.replace_texture(&mut *self.factory, path, window)
    }
}
