//! Canvas2D renderer.
//!
//! Paints a projected `Scene` onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Connectors go first so boxes cover their
//! ends; labels and selection outlines go last.

use iac_core::DomainType;
use iac_render::{EdgeShape, NodeShape, Scene};
use web_sys::CanvasRenderingContext2d;

/// Theme-dependent colors for the canvas renderer.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub edge: &'static str,
    pub edge_label_bg: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            grid: "rgba(0, 0, 0, 0.05)",
            text: "#1C1C1E",
            subtext: "#6E6E73",
            edge: "#6B7080",
            edge_label_bg: "rgba(245, 245, 247, 0.9)",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            grid: "rgba(255, 255, 255, 0.04)",
            text: "#F2F2F7",
            subtext: "#98989D",
            edge: "#8E8E93",
            edge_label_bg: "rgba(28, 28, 30, 0.9)",
        }
    }
}

const SELECTED: &str = "#4FC3F7";
const PENDING: &str = "#FF9F0A";
const CORNER_RADIUS: f64 = 8.0;

/// Fill color for a component box, by network zone.
pub fn domain_fill(domain: DomainType) -> &'static str {
    match domain {
        DomainType::Public => "#FFE5E5",
        DomainType::Web => "#E5F0FF",
        DomainType::Application => "#E8F8E8",
        DomainType::Data => "#FFF4E0",
    }
}

/// Render the whole scene to a Canvas2D context.
pub fn render_scene(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);
    draw_grid(ctx, canvas_width, canvas_height, theme);

    for edge in &scene.edges {
        draw_edge(ctx, edge, theme);
    }
    for node in &scene.nodes {
        draw_node(ctx, node, theme);
    }
    if scene.connect_mode {
        draw_connect_banner(ctx, canvas_width, theme);
    }
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeShape, theme: &CanvasTheme) {
    let r = node.rect;
    let (x, y, w, h) = (r.x0, r.y0, r.width(), r.height());

    ctx.save();
    rounded_rect_path(ctx, x, y, w, h, CORNER_RADIUS);
    ctx.set_fill_style_str(domain_fill(node.domain));
    ctx.fill();
    ctx.set_stroke_style_str("#86868B");
    ctx.set_line_width(1.0);
    ctx.stroke();

    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(theme.text);
    ctx.set_font("600 13px Inter, sans-serif");
    let _ = ctx.fill_text(&node.name, x + w / 2.0, y + h / 2.0 - 8.0);
    ctx.set_fill_style_str(theme.subtext);
    ctx.set_font("400 11px Inter, sans-serif");
    let caption = if node.technology.is_empty() {
        node.kind.clone()
    } else {
        format!("{} · {}", node.kind, node.technology)
    };
    let _ = ctx.fill_text(&caption, x + w / 2.0, y + h / 2.0 + 9.0);

    if node.pending_source {
        // Dashed outline marks the first pick of a connect gesture.
        ctx.set_stroke_style_str(PENDING);
        ctx.set_line_width(2.0);
        let _ = ctx.set_line_dash(&js_sys::Array::of2(&4.0.into(), &3.0.into()));
        rounded_rect_path(ctx, x - 3.0, y - 3.0, w + 6.0, h + 6.0, CORNER_RADIUS + 2.0);
        ctx.stroke();
        let _ = ctx.set_line_dash(&js_sys::Array::new());
    } else if node.selected {
        ctx.set_stroke_style_str(SELECTED);
        ctx.set_line_width(2.0);
        rounded_rect_path(ctx, x - 1.0, y - 1.0, w + 2.0, h + 2.0, CORNER_RADIUS);
        ctx.stroke();
    }
    ctx.restore();
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &EdgeShape, theme: &CanvasTheme) {
    let (p0, p1) = (edge.line.p0, edge.line.p1);

    ctx.save();
    let color = if edge.selected { SELECTED } else { theme.edge };
    ctx.set_stroke_style_str(color);
    ctx.set_fill_style_str(color);
    ctx.set_line_width(if edge.selected { 2.5 } else { 1.5 });
    ctx.begin_path();
    ctx.move_to(p0.x, p0.y);
    ctx.line_to(p1.x, p1.y);
    ctx.stroke();
    draw_arrowhead(ctx, p0.x, p0.y, p1.x, p1.y);

    if !edge.label.is_empty() {
        ctx.set_font("400 11px Inter, sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let width = ctx
            .measure_text(&edge.label)
            .map_or(edge.label.len() as f64 * 6.0, |m| m.width());
        ctx.set_fill_style_str(theme.edge_label_bg);
        ctx.fill_rect(
            edge.label_at.x - width / 2.0 - 3.0,
            edge.label_at.y - 8.0,
            width + 6.0,
            16.0,
        );
        ctx.set_fill_style_str(theme.subtext);
        let _ = ctx.fill_text(&edge.label, edge.label_at.x, edge.label_at.y);
    }
    ctx.restore();
}

/// Arrowhead at the midpoint, pointing toward the destination. The ends of
/// the line sit under the boxes.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    let angle = (y2 - y1).atan2(x2 - x1);
    let (tx, ty) = (x1 + (x2 - x1) * 0.75, y1 + (y2 - y1) * 0.75);
    let size = 8.0;
    ctx.begin_path();
    ctx.move_to(tx, ty);
    ctx.line_to(
        tx - size * (angle - 0.4).cos(),
        ty - size * (angle - 0.4).sin(),
    );
    ctx.line_to(
        tx - size * (angle + 0.4).cos(),
        ty - size * (angle + 0.4).sin(),
    );
    ctx.close_path();
    ctx.fill();
}

fn draw_connect_banner(ctx: &CanvasRenderingContext2d, width: f64, theme: &CanvasTheme) {
    ctx.save();
    ctx.set_fill_style_str("rgba(255, 159, 10, 0.15)");
    ctx.fill_rect(0.0, 0.0, width, 24.0);
    ctx.set_fill_style_str(theme.text);
    ctx.set_font("500 12px Inter, sans-serif");
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("Connect mode: pick source, then destination (Esc to cancel)", 8.0, 12.0);
    ctx.restore();
}

fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &CanvasTheme) {
    ctx.set_fill_style_str(theme.grid);
    let spacing = 20.0;
    let mut x = 0.0;
    while x < width {
        let mut y = 0.0;
        while y < height {
            ctx.fill_rect(x, y, 1.0, 1.0);
            y += spacing;
        }
        x += spacing;
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
