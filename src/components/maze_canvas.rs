use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement};
use yew::prelude::*;

use crate::config::TROPHY_IMAGE_SRC;
use crate::layout::{Area, Insets, Surface, parse_px};
use crate::util::{cerror, cwarn};

/// 2d canvas plus the trophy sprite drawn over the goal after a win.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    trophy: Option<HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = match canvas.get_context("2d").ok().flatten() {
            Some(c) => c.dyn_into::<CanvasRenderingContext2d>().ok()?,
            None => {
                cerror("canvas 2d context unavailable");
                return None;
            }
        };
        let trophy = match HtmlImageElement::new() {
            Ok(img) => {
                img.set_src(TROPHY_IMAGE_SRC);
                Some(img)
            }
            Err(e) => {
                cwarn(&format!("trophy image not created: {e:?}"));
                None
            }
        };
        Some(Self { canvas, ctx, trophy })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn trophy_ready(&self) -> bool {
        self.trophy
            .as_ref()
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }

    fn draw_trophy(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if let Some(img) = &self.trophy
            && let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)
        {
            cwarn(&format!("trophy draw failed: {e:?}"));
        }
    }
}

/// Content box of the canvas container: client size minus computed padding.
pub fn available_area(container: &HtmlElement) -> Area {
    let padding = web_sys::window()
        .and_then(|win| win.get_computed_style(container).ok().flatten())
        .map(|style| {
            let px = |prop: &str| style.get_property_value(prop).map(|v| parse_px(&v)).unwrap_or(0.0);
            Insets {
                left: px("padding-left"),
                right: px("padding-right"),
                top: px("padding-top"),
                bottom: px("padding-bottom"),
            }
        })
        .unwrap_or_default();
    Area::inside(container.client_width() as f64, container.client_height() as f64, padding)
}

#[derive(Properties, PartialEq, Clone)]
pub struct MazeCanvasProps {
    pub container_ref: NodeRef,
    pub canvas_ref: NodeRef,
}

#[function_component]
pub fn MazeCanvas(props: &MazeCanvasProps) -> Html {
    html! {
        <div ref={props.container_ref.clone()} id="canvas-container" style="flex:1; min-width:0; min-height:0; padding:12px; display:flex; align-items:center; justify-content:center;">
            <canvas ref={props.canvas_ref.clone()} id="gameCanvas" style="image-rendering:pixelated; border:1px solid #30363d;"></canvas>
        </div>
    }
}
