//! Canvas 2D backend
//!
//! Replays draw commands onto a `CanvasRenderingContext2d`. Canvas calls that
//! can fail are ignored; a dropped frame is harmless.

use web_sys::CanvasRenderingContext2d;

use super::draw::{DrawCmd, css};

const CARD_W: f64 = 96.0;
const CARD_H: f64 = 144.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// CSS pixel size of the canvas
    pub size: (f64, f64),
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64, dpr: f64) -> Self {
        let _ = ctx.scale(dpr, dpr);
        Self {
            ctx,
            size: (width, height),
        }
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.size.0, self.size.1);
    }

    /// Paint one frame
    pub fn render(&self, cmds: &[DrawCmd]) {
        self.clear();
        for cmd in cmds {
            self.ctx.save();
            self.draw(cmd);
            self.ctx.restore();
        }
    }

    fn draw(&self, cmd: &DrawCmd) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Polygon {
                points,
                color,
                glow,
            } => {
                let Some(first) = points.first() else { return };
                ctx.set_fill_style_str(&css(*color));
                if *glow > 0.0 {
                    ctx.set_shadow_color(&css([color[0], color[1], color[2], 1.0]));
                    ctx.set_shadow_blur(f64::from(*glow));
                }
                ctx.begin_path();
                ctx.move_to(f64::from(first.x), f64::from(first.y));
                for p in &points[1..] {
                    ctx.line_to(f64::from(p.x), f64::from(p.y));
                }
                ctx.close_path();
                ctx.fill();
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.begin_path();
                let _ = ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(radius.max(0.0)),
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            DrawCmd::RadialGlow {
                center,
                radius,
                gradient_radius,
                stops,
            } => {
                let (x, y) = (f64::from(center.x), f64::from(center.y));
                let Ok(gradient) =
                    ctx.create_radial_gradient(x, y, 0.0, x, y, f64::from(*gradient_radius))
                else {
                    return;
                };
                for (offset, color) in stops {
                    let _ = gradient.add_color_stop(*offset, &css(*color));
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                let _ = ctx.arc(x, y, f64::from(*radius), 0.0, std::f64::consts::TAU);
                ctx.fill();
            }
            DrawCmd::Ring {
                center,
                radius,
                width,
                color,
                glow,
            } => {
                ctx.set_stroke_style_str(&css(*color));
                ctx.set_line_width(f64::from(*width));
                ctx.set_shadow_color(&css(*color));
                ctx.set_shadow_blur(f64::from(*glow));
                ctx.begin_path();
                let _ = ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.stroke();
            }
            DrawCmd::Glyph {
                center,
                glyph,
                size,
                color,
                glow,
            } => {
                ctx.set_font(&format!("bold {}px serif", size));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&css(*color));
                ctx.set_shadow_color(&css(*color));
                ctx.set_shadow_blur(f64::from(*glow));
                let _ = ctx.fill_text(
                    &glyph.to_string(),
                    f64::from(center.x),
                    f64::from(center.y),
                );
            }
            DrawCmd::Card {
                center,
                scale,
                opacity,
                flipped,
                highlight,
            } => self.draw_card(
                f64::from(center.x),
                f64::from(center.y),
                f64::from(*scale),
                f64::from(*opacity),
                *flipped,
                *highlight,
            ),
        }
    }

    fn draw_card(&self, x: f64, y: f64, scale: f64, opacity: f64, flipped: bool, highlight: bool) {
        let ctx = &self.ctx;
        let _ = ctx.translate(x, y);
        let _ = ctx.scale(scale, scale);
        ctx.set_global_alpha(opacity.clamp(0.0, 1.0));

        if highlight {
            // Amber aura behind the chosen card
            ctx.set_shadow_color("rgba(245, 158, 11, 0.8)");
            ctx.set_shadow_blur(25.0);
        } else {
            ctx.set_shadow_color("rgba(139, 92, 246, 0.3)");
            ctx.set_shadow_blur(20.0);
        }

        let face = if flipped { "#2a1f45" } else { "#16213e" };
        ctx.set_fill_style_str(face);
        ctx.fill_rect(-CARD_W / 2.0, -CARD_H / 2.0, CARD_W, CARD_H);

        ctx.set_shadow_blur(0.0);
        ctx.set_stroke_style_str("rgba(139, 92, 246, 0.5)");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(-CARD_W / 2.0, -CARD_H / 2.0, CARD_W, CARD_H);
        ctx.set_stroke_style_str("rgba(139, 92, 246, 0.3)");
        ctx.set_line_width(1.0);
        ctx.stroke_rect(-CARD_W / 2.0 + 8.0, -CARD_H / 2.0 + 8.0, CARD_W - 16.0, CARD_H - 16.0);

        // Diamond with the sigil rune
        ctx.set_stroke_style_str("rgba(167, 139, 250, 0.5)");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, -22.0);
        ctx.line_to(22.0, 0.0);
        ctx.line_to(0.0, 22.0);
        ctx.line_to(-22.0, 0.0);
        ctx.close_path();
        ctx.stroke();

        ctx.set_font("24px serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str("rgba(167, 139, 250, 1.0)");
        let _ = ctx.fill_text(if flipped { "✦" } else { "ᛟ" }, 0.0, 0.0);
    }
}
