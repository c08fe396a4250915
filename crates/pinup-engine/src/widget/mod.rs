//! The image widget: one textured quad in a borderless window.

mod display;
mod error;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::core::{App, AppControl, FrameCtx};
use crate::gfx::{shaders, GfxError, Quad, QuadVertex, Shader, ShaderProgram, ShaderStage, Texture};
use crate::handlers::{CloseHandler, DragHandler, DropHandler, InputHandler, ScaleHandler};
use crate::input::{InputEvent, Key};
use crate::render::RenderCtx;
use crate::window::WindowControl;

pub use display::{Display, DisplayUpdate, GpuTextures, TextureFactory};
pub use error::WidgetError;

/// Sampler uniform the quad program reads the image from.
pub const TEXTURE_UNIFORM: &str = "texture0";

/// Unit the current texture is bound to while drawing.
pub const TEXTURE_UNIT: u32 = 0;

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub close_key: Key,
    pub wrap_mode: wgpu::AddressMode,
    /// Image shown at startup; the built-in image when `None` or unloadable.
    pub image: Option<PathBuf>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            close_key: Key::Escape,
            wrap_mode: wgpu::AddressMode::ClampToEdge,
            image: None,
        }
    }
}

/// Displayed texture plus the handlers that act on it.
pub struct WidgetState<T> {
    display: Display<T>,
    handlers: Vec<Box<dyn InputHandler>>,
    scale: Option<Rc<RefCell<ScaleHandler>>>,
}

impl<T> Default for WidgetState<T> {
    fn default() -> Self {
        Self {
            display: Display::default(),
            handlers: Vec::new(),
            scale: None,
        }
    }
}

impl<T> WidgetState<T> {
    pub fn display(&self) -> &Display<T> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<T> {
        &mut self.display
    }

    pub fn scale(&self) -> Option<&Rc<RefCell<ScaleHandler>>> {
        self.scale.as_ref()
    }

    /// Installs drag, close, drop and scale handlers; scale also follows image swaps.
    pub fn register_handlers(&mut self, close_key: Key, window: &dyn WindowControl) {
        let scale = Rc::new(RefCell::new(ScaleHandler::new(window)));
        self.handlers.clear();
        self.handlers.push(Box::new(DragHandler::default()));
        self.handlers.push(Box::new(CloseHandler::new(close_key)));
        self.handlers.push(Box::new(DropHandler));
        self.handlers.push(Box::new(Rc::clone(&scale)));
        self.display.subscribe(scale.clone());
        self.scale = Some(scale);
        log::debug!("registered {} input handlers", self.handlers.len());
    }

    /// Feeds `events` in order to every handler.
    pub fn dispatch<F>(&mut self, events: &[InputEvent], factory: &mut F, window: &mut dyn WindowControl)
    where
        F: TextureFactory<Texture = T>,
    {
        let mut images = DisplayUpdate {
            display: &mut self.display,
            factory,
        };
        for event in events {
            for handler in &mut self.handlers {
                handler.handle(event, window, &mut images);
            }
        }
    }
}

struct GpuResources {
    program: ShaderProgram,
    quad: Quad,
}

pub struct Widget {
    config: WidgetConfig,
    gpu: Option<GpuResources>,
    state: WidgetState<Texture>,
}

impl Widget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            gpu: None,
            state: WidgetState::default(),
        }
    }
}

fn build_program(ctx: &RenderCtx<'_>) -> Result<ShaderProgram, GfxError> {
    let vertex = Shader::compile(ctx, shaders::QUAD_VERT, ShaderStage::Vertex)?;
    let fragment = Shader::compile(ctx, shaders::QUAD_FRAG, ShaderStage::Fragment)?;
    ShaderProgram::link(ctx, vec![vertex, fragment], QuadVertex::layout())
}

fn draw_quad(
    program: &ShaderProgram,
    quad: &Quad,
    texture: Option<&mut Texture>,
    pass: &mut wgpu::RenderPass<'_>,
) -> Result<(), WidgetError> {
    let texture = texture.ok_or(WidgetError::NoImage)?;
    let location = program.uniform_location(TEXTURE_UNIFORM)?;

    program.use_program(pass);
    texture.bind(TEXTURE_UNIT);
    let bound = texture.set_uniform(pass, location);
    if bound.is_ok() {
        quad.draw(pass);
    }
    texture.unbind();
    Ok(bound?)
}

impl App for Widget {
    fn on_start(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<()> {
        let rctx = RenderCtx::new(&*ctx.gpu);
        let program = build_program(&rctx).context("building quad program")?;
        let quad = Quad::unit(&rctx);

        let mut factory = GpuTextures::new(rctx, &program, self.config.wrap_mode);
        self.state
            .display
            .load_initial(&mut factory, self.config.image.as_deref(), &mut ctx.window)
            .context("loading initial image")?;

        self.state.register_handlers(self.config.close_key, &ctx.window);
        self.gpu = Some(GpuResources { program, quad });
        log::info!("widget running at {:?}", ctx.window.size());
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(gpu) = self.gpu.as_ref() else {
            return Ok(AppControl::Exit);
        };

        if !ctx.input.is_empty() {
            let events: Vec<InputEvent> = ctx.input.drain().collect();
            let mut factory =
                GpuTextures::new(RenderCtx::new(&*ctx.gpu), &gpu.program, self.config.wrap_mode);
            self.state.dispatch(&events, &mut factory, &mut ctx.window);
        }
        if ctx.window.close_requested() {
            return Ok(AppControl::Exit);
        }

        let texture = self.state.display.current_mut();
        ctx.render(wgpu::Color::TRANSPARENT, |_, pass| {
            draw_quad(&gpu.program, &gpu.quad, texture, pass)
        })
        .context("drawing widget")
    }

    fn on_exit(&mut self) {
        if let Some(GpuResources { program, quad }) = self.gpu.take() {
            program.release();
            quad.release();
        }
        if let Some(texture) = self.state.display.take_current() {
            texture.release();
        }
        log::debug!("widget resources released");
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::handlers::testing::FakeWindow;
    use crate::input::{KeyState, MouseButton, MouseButtonState, MouseWheelDelta, PointerButtonEvent, PointerMoveEvent};
    use crate::picture::Picture;

    #[derive(Debug, PartialEq)]
    struct FakeTexture {
        id: u32,
        size: (u32, u32),
    }

    #[derive(Default)]
    struct FakeTextures {
        next_id: u32,
        released: Vec<u32>,
        reject: bool,
    }

    impl TextureFactory for FakeTextures {
        type Texture = FakeTexture;

        fn create_texture(&mut self, picture: &Picture) -> Result<FakeTexture, WidgetError> {
            if self.reject {
                return Err(GfxError::UnsupportedStride { width: picture.width(), stride: 0 }.into());
            }
            self.next_id += 1;
            Ok(FakeTexture { id: self.next_id, size: (picture.width(), picture.height()) })
        }

        fn release_texture(&mut self, texture: FakeTexture) {
            self.released.push(texture.id);
        }
    }

    fn wheel(y: f64) -> InputEvent {
        InputEvent::MouseWheel { delta: MouseWheelDelta::Pixel { x: 0.0, y } }
    }

    fn png(dir: &tempfile::TempDir, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.path().join(name);
        image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn started(window: &mut FakeWindow, factory: &mut FakeTextures) -> WidgetState<FakeTexture> {
        let mut state = WidgetState::default();
        state.display.load_initial(factory, None, window).unwrap();
        state.register_handlers(Key::Escape, window);
        state
    }

    #[test]
    fn scroll_then_drop_resets_scale() {
        let dir = tempfile::tempdir().unwrap();
        let small = png(&dir, "small.png", 200, 100);
        let mut window = FakeWindow::new((800, 800), (100, 100));
        let mut factory = FakeTextures::default();

        let mut state = started(&mut window, &mut factory);
        assert_eq!(window.size, (400, 400));
        let centre = window.center();
        {
            let scale = state.scale().unwrap().borrow();
            assert_eq!(scale.scale(), 1.0);
            assert_eq!(scale.lock(), 0);
        }

        state.dispatch(&[wheel(100.0)], &mut factory, &mut window);
        assert_eq!(window.size, (600, 600));
        assert_eq!(window.center(), centre);
        assert_eq!(state.scale().unwrap().borrow().scale(), 1.5);

        state.dispatch(&[InputEvent::FilesDropped(vec![small])], &mut factory, &mut window);
        assert_eq!(state.display().current(), Some(&FakeTexture { id: 2, size: (200, 100) }));
        assert_eq!(factory.released, vec![1]);
        assert_eq!(window.size, (200, 100));
        {
            let scale = state.scale().unwrap().borrow();
            assert_eq!(scale.scale(), 1.0);
            assert_eq!(scale.base(), (200, 100));
            assert_eq!(scale.lock(), 1);
            assert!(scale.suppressing());
        }

        state.dispatch(&[wheel(100.0)], &mut factory, &mut window);
        assert_eq!(window.size, (200, 100));
        state.dispatch(&[wheel(100.0)], &mut factory, &mut window);
        assert_eq!(window.size, (300, 150));
    }

    #[test]
    fn undecodable_drop_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not an image").unwrap();
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut factory = FakeTextures::default();
        let mut state = started(&mut window, &mut factory);
        let before = window.clone();

        state.dispatch(&[InputEvent::FilesDropped(vec![broken])], &mut factory, &mut window);

        assert_eq!(window, before);
        assert_eq!(state.display().current().map(|t| t.id), Some(1));
        assert!(factory.released.is_empty());
        assert_eq!(state.scale().unwrap().borrow().lock(), 0);
    }

    #[test]
    fn rejected_upload_keeps_current_texture() {
        let dir = tempfile::tempdir().unwrap();
        let other = png(&dir, "other.png", 50, 50);
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut factory = FakeTextures::default();
        let mut state = started(&mut window, &mut factory);

        factory.reject = true;
        let err = state
            .display_mut()
            .replace_texture(&mut factory, &other, &mut window)
            .unwrap_err();

        assert!(matches!(err, WidgetError::Gfx(GfxError::UnsupportedStride { .. })));
        assert_eq!(window.size, (400, 400));
        assert_eq!(state.display().current().map(|t| t.id), Some(1));
    }

    #[test]
    fn unloadable_startup_image_falls_back_to_default() {
        let mut window = FakeWindow::new((10, 10), (0, 0));
        let mut factory = FakeTextures::default();
        let mut display: Display<FakeTexture> = Display::default();

        display
            .load_initial(&mut factory, Some(Path::new("/definitely/missing.png")), &mut window)
            .unwrap();

        assert_eq!(display.current().map(|t| t.size), Some((400, 400)));
        assert_eq!(window.size, (400, 400));
    }

    #[test]
    fn startup_image_is_used_when_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = png(&dir, "start.png", 120, 80);
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut factory = FakeTextures::default();
        let mut display: Display<FakeTexture> = Display::default();

        display.load_initial(&mut factory, Some(&path), &mut window).unwrap();

        assert_eq!(window.size, (120, 80));
    }

    #[test]
    fn oversized_image_shrinks_window_to_limit() {
        let mut window = FakeWindow::new((400, 400), (0, 0));
        window.max_extent = 1000;
        let mut factory = FakeTextures::default();
        let mut state = started(&mut window, &mut factory);
        let huge = Picture::from_raw_parts(4000, 2000, 4000 * 4, Vec::new());

        state.display_mut().show(&mut factory, &huge, &mut window).unwrap();

        assert_eq!(window.size, (1000, 500));
        {
            let scale = state.scale().unwrap().borrow();
            assert_eq!(scale.base(), (1000, 500));
        }

        state.dispatch(&[wheel(100.0)], &mut factory, &mut window);
        state.dispatch(&[wheel(10_000.0)], &mut factory, &mut window);
        assert!(window.size.0 <= 1000 && window.size.1 <= 1000, "grew to {:?}", window.size);
    }

    #[test]
    fn escape_and_drag_reach_their_handlers() {
        let mut window = FakeWindow::new((400, 400), (0, 0));
        let mut factory = FakeTextures::default();
        let mut state = started(&mut window, &mut factory);

        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: Some((5.0, 5.0)),
        });
        let moved = InputEvent::PointerMoved(PointerMoveEvent { x: 25.0, y: 15.0 });
        let escape = InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            repeat: false,
        };
        state.dispatch(&[press, moved, escape], &mut factory, &mut window);

        assert_eq!(window.position, (20, 10));
        assert!(window.close_requested);
    }
}
