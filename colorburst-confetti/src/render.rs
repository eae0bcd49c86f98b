use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_polygon_mut, Blend};
use imageproc::point::Point;
use palette::Srgb;

pub fn clear(canvas: &mut RgbaImage) {
    for pixel in canvas.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 0]);
    }
}

pub fn fill_polygon(canvas: &mut Blend<RgbaImage>, points: &[(f64, f64)], color: Srgb<u8>, opacity: f64) {
    if opacity <= 0.0 {
        return;
    }

    let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let point = Point::new(x.floor() as i32, y.floor() as i32);
        if poly.last() != Some(&point) {
            poly.push(point);
        }
    }
    // imageproc wants an open outline
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 || !overlaps(&poly, canvas.0.dimensions()) {
        return;
    }

    let alpha = (opacity.min(1.0) * 255.0).round() as u8;
    draw_polygon_mut(canvas, &poly, Rgba([color.red, color.green, color.blue, alpha]));
}

fn overlaps(poly: &[Point<i32>], (width, height): (u32, u32)) -> bool {
    let min_x = poly.iter().map(|p| p.x).min().unwrap_or(0);
    let max_x = poly.iter().map(|p| p.x).max().unwrap_or(-1);
    let min_y = poly.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = poly.iter().map(|p| p.y).max().unwrap_or(-1);
    max_x >= 0 && max_y >= 0 && i64::from(min_x) < i64::from(width) && i64::from(min_y) < i64::from(height)
}
