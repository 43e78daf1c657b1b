//! `Canvas` implementation over a 2D canvas context.

use crate::constants::LABEL_FONT_FAMILY;
use crate::dom;
use divot_core::canvas::{Canvas, Glow, Rect, Rgba, Stroke, TextAlign, TextStyle, Viewport};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSurface {
    /// `None` when the element cannot provide a 2D context.
    pub fn new(canvas: web::HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            viewport: Viewport::FALLBACK,
        })
    }

    fn set_dash(&self, dash: Option<[f32; 2]>) {
        let segments = js_sys::Array::new();
        if let Some([on, off]) = dash {
            segments.push(&JsValue::from_f64(on as f64));
            segments.push(&JsValue::from_f64(off as f64));
        }
        _ = self.ctx.set_line_dash(&segments);
    }
}

impl Canvas for CanvasSurface {
    fn container_size(&self) -> Viewport {
        self.canvas
            .parent_element()
            .map(|p| Viewport::new(p.client_width() as f32, p.client_height() as f32))
            .unwrap_or(Viewport::FALLBACK)
    }

    fn resize(&mut self, viewport: Viewport) {
        let dpr = dom::sync_canvas_backing_size(&self.canvas, viewport.width, viewport.height);
        // Draw in CSS pixels regardless of backing resolution
        _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.viewport = viewport;
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.viewport.width as f64,
            self.viewport.height as f64,
        );
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.set_dash(stroke.dash);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        self.ctx.stroke();
        if stroke.dash.is_some() {
            self.set_dash(None);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>) {
        if let Some(g) = glow {
            self.ctx.set_shadow_blur(g.blur as f64);
            self.ctx.set_shadow_color(&g.color.to_css());
        }
        self.ctx.begin_path();
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        if glow.is_some() {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle) {
        self.ctx
            .set_font(&format!("{}px {}", style.size_px, LABEL_FONT_FAMILY));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_fill_style_str(&style.color.to_css());
        _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}
