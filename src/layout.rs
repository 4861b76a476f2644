//! Responsive tile sizing and layered maze rendering.
//!
//! Rendering goes through the [`Surface`] trait so the same layer logic drives the
//! browser canvas and the recording surface used in tests.

use crate::config::{PLACEHOLDER_CANVAS_SIZE, TRAIL_MAX_ALPHA, TRAIL_MIN_ALPHA};
use crate::model::{Maze, Position};
use crate::util::{cdebug, cwarn};

pub const WALL_COLOR: &str = "black";
pub const GOAL_COLOR: &str = "green";
pub const PASSAGE_COLOR: &str = "white";
pub const SOLUTION_COLOR: &str = "rgba(50, 205, 50, 0.55)";

/// Drawing area left inside the container once its padding is removed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Area {
    pub fn inside(client_width: f64, client_height: f64, padding: Insets) -> Self {
        Self {
            width: client_width - padding.left - padding.right,
            height: client_height - padding.top - padding.bottom,
        }
    }
}

/// Parses a computed CSS length such as `"12px"`; anything unparsable counts as 0.
pub fn parse_px(value: &str) -> f64 {
    let v = value.trim();
    v.strip_suffix("px")
        .unwrap_or(v)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// No room to draw; the surface becomes a small placeholder.
    Degraded,
    Tiled { tile_size: u32, canvas_width: u32, canvas_height: u32 },
}

/// Square tiles sized so the whole grid fits inside the smaller side of the area.
pub fn compute_layout(area: Area, cols: u32, rows: u32) -> Layout {
    if !(area.width > 0.0 && area.height > 0.0) || cols == 0 || rows == 0 {
        return Layout::Degraded;
    }
    let max_side = area.width.min(area.height).floor().max(1.0);
    let tile_size = ((max_side / cols.max(rows) as f64).floor() as u32).max(1);
    Layout::Tiled {
        tile_size,
        canvas_width: tile_size * cols,
        canvas_height: tile_size * rows,
    }
}

/// Opacity of the trail cell at `index` (0 = newest).
pub fn trail_alpha(index: usize, max_trail_length: usize) -> f64 {
    let age_ratio = if max_trail_length > 1 {
        (index as f64 / (max_trail_length - 1) as f64).min(1.0)
    } else {
        1.0
    };
    if age_ratio >= 1.0 {
        return TRAIL_MIN_ALPHA;
    }
    let alpha = TRAIL_MAX_ALPHA - (TRAIL_MAX_ALPHA - TRAIL_MIN_ALPHA) * age_ratio;
    alpha.clamp(TRAIL_MIN_ALPHA, TRAIL_MAX_ALPHA)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const FALLBACK_PLAYER_RGB: Rgb = Rgb { r: 255, g: 0, b: 0 };

/// Player colours offered in the picker.
pub const PLAYER_COLORS: &[(&str, Rgb)] = &[
    ("red", Rgb { r: 255, g: 0, b: 0 }),
    ("blue", Rgb { r: 0, g: 0, b: 255 }),
    ("green", Rgb { r: 0, g: 128, b: 0 }),
    ("purple", Rgb { r: 128, g: 0, b: 128 }),
    ("orange", Rgb { r: 255, g: 165, b: 0 }),
    ("magenta", Rgb { r: 255, g: 0, b: 255 }),
    ("cyan", Rgb { r: 0, g: 255, b: 255 }),
];

impl Rgb {
    /// Understands `#rgb`, `#rrggbb`, `rgb()`/`rgba()` and the palette names.
    pub fn parse(css: &str) -> Option<Rgb> {
        let s = css.trim().to_ascii_lowercase();
        if let Some(inner) = s.strip_prefix("rgba(").or_else(|| s.strip_prefix("rgb(")) {
            let mut parts = inner.trim_end_matches(')').split(',').map(|p| p.trim().parse::<u8>());
            let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) = (parts.next(), parts.next(), parts.next()) else {
                return None;
            };
            return Some(Rgb { r, g, b });
        }
        if let Some(hex) = s.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return None,
            };
            let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
            return Some(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? });
        }
        PLAYER_COLORS.iter().find(|(name, _)| *name == s).map(|(_, rgb)| *rgb)
    }

    pub fn parse_or_fallback(css: &str) -> Rgb {
        Rgb::parse(css).unwrap_or_else(|| {
            cwarn(&format!("could not convert colour '{css}', defaulting to red"));
            FALLBACK_PLAYER_RGB
        })
    }

    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn css_alpha(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Minimal 2D drawing target.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    /// Whether the trophy artwork has finished loading.
    fn trophy_ready(&self) -> bool;
    fn draw_trophy(&mut self, x: f64, y: f64, w: f64, h: f64);
}

/// What a frame shows, borrowed from the session.
pub struct Scene<'a> {
    pub maze: &'a Maze,
    pub player_color: Rgb,
    pub won: bool,
}

/// Lays out and paints one frame. Returns the layout that was applied.
pub fn render<S: Surface>(surface: &mut S, area: Area, scene: &Scene<'_>) -> Layout {
    let grid = scene.maze.grid();
    let (cols, rows) = (grid.cols(), grid.rows());
    let layout = compute_layout(area, cols, rows);
    let Layout::Tiled { tile_size, canvas_width, canvas_height } = layout else {
        cwarn(&format!("no drawing space available. W:{}, H:{}", area.width, area.height));
        surface.resize(PLACEHOLDER_CANVAS_SIZE, PLACEHOLDER_CANVAS_SIZE);
        return layout;
    };
    if surface.size() != (canvas_width, canvas_height) {
        cdebug(&format!("canvas resize: {canvas_width}x{canvas_height} (tile: {tile_size}px)"));
        surface.resize(canvas_width, canvas_height);
    }
    surface.clear();

    let tile = tile_size as f64;
    let rect = |p: Position| (p.x as f64 * tile, p.y as f64 * tile);
    let player = scene.maze.player();
    let goal = scene.maze.goal();

    for y in 0..rows {
        for x in 0..cols {
            let p = Position::new(x, y);
            let color = if !grid.is_passage(p) {
                WALL_COLOR
            } else if p == goal {
                GOAL_COLOR
            } else {
                PASSAGE_COLOR
            };
            let (px, py) = rect(p);
            surface.fill_rect(px, py, tile, tile, color);
        }
    }

    for &p in scene.maze.solution() {
        if p == player || p == goal {
            continue;
        }
        let (px, py) = rect(p);
        surface.fill_rect(px, py, tile, tile, SOLUTION_COLOR);
    }

    let trail = scene.maze.trail();
    for (i, &p) in trail.iter().enumerate() {
        let color = scene.player_color.css_alpha(trail_alpha(i, trail.capacity()));
        let (px, py) = rect(p);
        surface.fill_rect(px, py, tile, tile, &color);
    }

    let (px, py) = rect(player);
    surface.fill_rect(px, py, tile, tile, &scene.player_color.css());

    if scene.won && surface.trophy_ready() {
        let (gx, gy) = rect(goal);
        surface.draw_trophy(gx, gy, tile, tile);
    }
    layout
}
