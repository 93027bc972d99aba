//! Replays display lists onto a `CanvasRenderingContext2d`.

use std::f64::consts::TAU;

use saboteur_client::render::{DrawCmd, Paint};
use saboteur_core::geometry::Point;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn set_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Result<(), JsValue> {
    let (gradient, stops): (CanvasGradient, _) = match paint {
        Paint::Solid(color) => {
            ctx.set_fill_style_str(&color.to_css());
            return Ok(());
        }
        Paint::Linear { from, to, stops } => {
            (ctx.create_linear_gradient(from.x, from.y, to.x, to.y), stops)
        }
        Paint::Radial {
            center,
            inner,
            outer,
            stops,
        } => (
            ctx.create_radial_gradient(center.x, center.y, *inner, center.x, center.y, *outer)?,
            stops,
        ),
    };
    for (offset, color) in stops {
        gradient.add_color_stop(*offset as f32, &color.to_css())?;
    }
    ctx.set_fill_style_canvas_gradient(&gradient);
    Ok(())
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.begin_path();
    let mut points = points.iter();
    if let Some(first) = points.next() {
        ctx.move_to(first.x, first.y);
    }
    for p in points {
        ctx.line_to(p.x, p.y);
    }
}

/// Execute `cmds` in order.
pub fn paint(ctx: &CanvasRenderingContext2d, cmds: &[DrawCmd]) -> Result<(), JsValue> {
    for cmd in cmds {
        match cmd {
            DrawCmd::Save => ctx.save(),
            DrawCmd::Restore => ctx.restore(),
            DrawCmd::SetAlpha(alpha) => ctx.set_global_alpha(*alpha),
            DrawCmd::SetShadow(Some(shadow)) => {
                ctx.set_shadow_color(&shadow.color.to_css());
                ctx.set_shadow_blur(shadow.blur);
                ctx.set_shadow_offset_x(shadow.offset_x);
                ctx.set_shadow_offset_y(shadow.offset_y);
            }
            DrawCmd::SetShadow(None) => {
                ctx.set_shadow_blur(0.0);
                ctx.set_shadow_offset_x(0.0);
                ctx.set_shadow_offset_y(0.0);
            }
            DrawCmd::ClearRect(r) => ctx.clear_rect(r.x, r.y, r.width, r.height),
            DrawCmd::FillRect { rect, paint } => {
                set_fill(ctx, paint)?;
                ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
            }
            DrawCmd::StrokeRect { rect, color, width } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width);
                ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
            }
            DrawCmd::FillPolygon { points, paint } => {
                set_fill(ctx, paint)?;
                trace(ctx, points);
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::StrokePath {
                points,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width);
                trace(ctx, points);
                ctx.stroke();
            }
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCmd::Text {
                text,
                at,
                font,
                color,
            } => {
                ctx.set_font(font);
                ctx.set_text_align("center");
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(text, at.x, at.y)?;
            }
        }
    }
    Ok(())
}
