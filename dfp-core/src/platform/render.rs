//! Off-screen rendering probes
//!
//! The canvas signal draws a fixed scene and digests the RGBA readback; the
//! WebGL signal digests the GPU vendor/renderer pair from the debug renderer
//! extension. A missing 2D context, WebGL context or extension yields an
//! empty string, never an error.

use serde::{Deserialize, Serialize};

use crate::constants::render as scene;
use crate::hash::hash_string;

/// Minimal 2D drawing context
pub trait Canvas2d {
    fn set_text_baseline(&mut self, baseline: &str);
    fn set_font(&mut self, font: &str);
    fn set_fill_style(&mut self, style: &str);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// RGBA bytes of the given region, row-major
    fn get_image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8>;
}

/// Unmasked GPU strings from the debug renderer extension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRendererInfo {
    pub vendor: String,
    pub renderer: String,
}

pub trait WebGlContext {
    /// `None` when the debug renderer extension is unavailable
    fn debug_renderer_info(&self) -> Option<DebugRendererInfo>;
}

/// An off-screen surface that may offer a 2D and/or a WebGL context
pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn context_2d(&mut self) -> Option<&mut dyn Canvas2d>;
    fn webgl(&mut self) -> Option<&dyn WebGlContext>;
}

/// Digest of the fixed probe scene, empty without a 2D context
pub fn canvas_fingerprint(surface: &mut dyn RenderSurface) -> String {
    let (width, height) = (surface.width(), surface.height());
    let ctx = match surface.context_2d() {
        Some(ctx) => ctx,
        None => return String::new(),
    };

    ctx.set_text_baseline(scene::TEXT_BASELINE);
    ctx.set_font(scene::FONT);
    ctx.set_fill_style(scene::RECT_FILL);
    let (x, y, w, h) = scene::RECT;
    ctx.fill_rect(x, y, w, h);
    ctx.set_fill_style(scene::PRIMARY_TEXT_FILL);
    let (x, y) = scene::PRIMARY_TEXT_POS;
    ctx.fill_text(scene::TEXT, x, y);
    ctx.set_fill_style(scene::SHADOW_TEXT_FILL);
    let (x, y) = scene::SHADOW_TEXT_POS;
    ctx.fill_text(scene::TEXT, x, y);

    let pixels = ctx.get_image_data(0, 0, width, height);
    hash_string(&join_bytes(&pixels))
}

/// Digest of "<vendor>~<renderer>", empty without WebGL or the extension
pub fn webgl_fingerprint(surface: &mut dyn RenderSurface) -> String {
    let info = match surface.webgl().and_then(|gl| gl.debug_renderer_info()) {
        Some(info) => info,
        None => return String::new(),
    };
    hash_string(&format!(
        "{}{}{}",
        info.vendor,
        scene::WEBGL_SEPARATOR,
        info.renderer
    ))
}

/// Comma-separated decimal bytes, the textual form of a pixel buffer
fn join_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&b.to_string());
    }
    out
}

// ============================================================================
// Surfaces
// ============================================================================

/// Surface with no rendering contexts at all
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    width: u32,
    height: u32,
}

impl NullSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderSurface for NullSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn context_2d(&mut self) -> Option<&mut dyn Canvas2d> {
        None
    }

    fn webgl(&mut self) -> Option<&dyn WebGlContext> {
        None
    }
}

/// Canvas that ignores drawing and replays a captured readback
#[derive(Debug, Clone)]
struct ReplayCanvas {
    pixels: Vec<u8>,
}

impl Canvas2d for ReplayCanvas {
    fn set_text_baseline(&mut self, _baseline: &str) {}
    fn set_font(&mut self, _font: &str) {}
    fn set_fill_style(&mut self, _style: &str) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}

    fn get_image_data(&self, _x: u32, _y: u32, _width: u32, _height: u32) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl WebGlContext for DebugRendererInfo {
    fn debug_renderer_info(&self) -> Option<DebugRendererInfo> {
        Some(self.clone())
    }
}

/// Surface built from rendering results captured elsewhere
#[derive(Debug, Clone)]
pub struct RecordedSurface {
    width: u32,
    height: u32,
    canvas: Option<ReplayCanvas>,
    webgl: Option<DebugRendererInfo>,
}

impl RecordedSurface {
    pub fn new(
        width: u32,
        height: u32,
        pixels: Option<Vec<u8>>,
        webgl: Option<DebugRendererInfo>,
    ) -> Self {
        Self {
            width,
            height,
            canvas: pixels.map(|pixels| ReplayCanvas { pixels }),
            webgl,
        }
    }
}

impl RenderSurface for RecordedSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn context_2d(&mut self) -> Option<&mut dyn Canvas2d> {
        self.canvas.as_mut().map(|c| c as &mut dyn Canvas2d)
    }

    fn webgl(&mut self) -> Option<&dyn WebGlContext> {
        self.webgl.as_ref().map(|w| w as &dyn WebGlContext)
    }
}
