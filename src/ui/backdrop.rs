use eframe::egui::{Color32, Mesh, Painter, Rect, Shape, pos2};

use crate::background::{BackgroundFrame, Rgba};

pub fn to_color32(color: Rgba) -> Color32 {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

/// Paints one background frame across `rect`, which is the whole viewport.
pub fn paint_background(painter: &Painter, rect: Rect, frame: &BackgroundFrame<'_>) {
    match frame {
        BackgroundFrame::Flat(color) => {
            painter.rect_filled(rect, 0.0, to_color32(*color));
        }
        BackgroundFrame::Gradient { start, end } => {
            painter.add(diagonal_gradient(rect, to_color32(*start), to_color32(*end)));
        }
        BackgroundFrame::Particles { base, particles } => {
            painter.rect_filled(rect, 0.0, to_color32(*base));
            for particle in particles.iter() {
                painter.circle_filled(
                    pos2(rect.left() + particle.x, rect.top() + particle.y),
                    particle.radius,
                    to_color32(particle.color()),
                );
            }
        }
    }
}

// Top-left corner carries `start`, bottom-right `end`, the other two the
// midpoint, which approximates a linear gradient along the diagonal.
fn diagonal_gradient(rect: Rect, start: Color32, end: Color32) -> Shape {
    let middle = start.lerp_to_gamma(end, 0.5);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), start);
    mesh.colored_vertex(rect.right_top(), middle);
    mesh.colored_vertex(rect.right_bottom(), end);
    mesh.colored_vertex(rect.left_bottom(), middle);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    Shape::mesh(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BASE_FILL;

    #[test]
    fn alpha_is_scaled_to_a_byte() {
        let color = to_color32(Rgba {
            r: 10,
            g: 18,
            b: 48,
            a: 1.0,
        });
        assert_eq!(color, Color32::from_rgb(10, 18, 48));
        assert_eq!(to_color32(BASE_FILL).a(), 255);
    }

    #[test]
    fn gradient_mesh_covers_the_rect() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 50.0));
        let Shape::Mesh(mesh) = diagonal_gradient(rect, Color32::BLACK, Color32::WHITE) else {
            panic!("expected a mesh");
        };
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }
}
