use super::*;
use crate::foundation::core::{Quad, Rect};
use kurbo::{PathEl, Shape};

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn parses_absolute_and_relative_lines() {
    let p = parse_svg_path("M10,10 l10 0 V30 h-10 z").unwrap();
    let els = p.elements();
    assert_eq!(els[0], PathEl::MoveTo(Point::new(10.0, 10.0)));
    assert_eq!(els[1], PathEl::LineTo(Point::new(20.0, 10.0)));
    assert_eq!(els[2], PathEl::LineTo(Point::new(20.0, 30.0)));
    assert_eq!(els[3], PathEl::LineTo(Point::new(10.0, 30.0)));
    assert_eq!(els[4], PathEl::ClosePath);
}

#[test]
fn implicit_lineto_after_move_and_compact_numbers() {
    let p = parse_svg_path("M0 0 10-5.5.5 20").unwrap();
    let els = p.elements();
    assert_eq!(els.len(), 3);
    assert_eq!(els[1], PathEl::LineTo(Point::new(10.0, -5.5)));
    assert_eq!(els[2], PathEl::LineTo(Point::new(0.5, 20.0)));
}

#[test]
fn relative_cubic_offsets_every_point() {
    let p = parse_svg_path("M10 10 c0 10 10 10 10 0").unwrap();
    assert_eq!(
        p.elements()[1],
        PathEl::CurveTo(
            Point::new(10.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 10.0)
        )
    );
}

#[test]
fn subpaths_survive_for_even_odd_holes() {
    let p = parse_svg_path("M0 0 H100 V100 H0 Z M25 25 H75 V75 H25 Z").unwrap();
    let moves = p
        .elements()
        .iter()
        .filter(|e| matches!(e, PathEl::MoveTo(_)))
        .count();
    let closes = p
        .elements()
        .iter()
        .filter(|e| matches!(e, PathEl::ClosePath))
        .count();
    assert_eq!((moves, closes), (2, 2));
}

#[test]
fn unsupported_command_is_rejected() {
    assert!(parse_svg_path("M0 0 S1 1 2 2").is_err());
    assert!(parse_svg_path("10 10").is_err());
}

#[test]
fn half_circle_arc_polyline() {
    let from = Point::new(0.0, 50.0);
    let to = Point::new(100.0, 50.0);
    let pts = arc_to_polyline(from, 50.0, 50.0, 0.0, false, true, to, ARC_SEGMENTS);
    assert_eq!(pts.len(), ARC_SEGMENTS + 1);
    assert_eq!(pts[0], from);
    assert_eq!(pts[ARC_SEGMENTS], to);
    let center = Point::new(50.0, 50.0);
    for p in &pts {
        assert!(((*p - center).hypot() - 50.0).abs() < 1e-9);
    }
    // Left to right with the sweep flag set passes over the top (y grows downwards).
    assert!(close(pts[ARC_SEGMENTS / 2], Point::new(50.0, 0.0)));

    let other = arc_to_polyline(from, 50.0, 50.0, 0.0, false, false, to, ARC_SEGMENTS);
    assert!(close(other[ARC_SEGMENTS / 2], Point::new(50.0, 100.0)));
}

#[test]
fn small_radii_are_scaled_up() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(10.0, 0.0);
    let pts = arc_to_polyline(from, 1.0, 1.0, 0.0, false, true, to, 40);
    let mid = pts[20];
    assert!(close(mid, Point::new(5.0, -5.0)));
}

#[test]
fn large_arc_flag_takes_the_long_way() {
    let from = Point::new(0.0, 0.0);
    let to = Point::new(10.0, 0.0);
    let short = arc_to_polyline(from, 10.0, 10.0, 0.0, false, true, to, 40);
    let long = arc_to_polyline(from, 10.0, 10.0, 0.0, true, true, to, 40);
    let span = |pts: &[Point]| {
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        ys.iter().cloned().fold(f64::MIN, f64::max) - ys.iter().cloned().fold(f64::MAX, f64::min)
    };
    assert!(span(&long) > span(&short));
}

#[test]
fn rotated_arc_follows_the_rotated_ellipse() {
    // Major axis (rx = 20) turned onto the y axis, spanning exactly (0,0)..(0,40).
    let from = Point::new(0.0, 0.0);
    let to = Point::new(0.0, 40.0);
    let pts = arc_to_polyline(from, 20.0, 10.0, 90.0, false, true, to, ARC_SEGMENTS);
    let center = Point::new(0.0, 20.0);
    for p in &pts {
        let d = *p - center;
        let (u, v) = (d.y, -d.x);
        assert!((u * u / 400.0 + v * v / 100.0 - 1.0).abs() < 1e-9, "{p:?}");
    }
    let mid = pts[ARC_SEGMENTS / 2];
    assert!((mid.x.abs() - 10.0).abs() < 1e-9 && (mid.y - 20.0).abs() < 1e-9);
}

#[test]
fn zero_radius_arc_is_a_straight_segment() {
    let from = Point::new(3.0, 4.0);
    let to = Point::new(9.0, 1.0);
    assert_eq!(arc_to_polyline(from, 0.0, 5.0, 0.0, false, true, to, 40), vec![from, to]);
}

#[test]
fn arc_command_emits_segments() {
    let p = parse_svg_path("M0 50 A50 50 0 0 1 100 50").unwrap();
    assert_eq!(p.elements().len(), 1 + ARC_SEGMENTS);
    let p = parse_svg_path("M0 50 a50 50 0 01100 0").unwrap();
    assert_eq!(p.elements().last(), Some(&PathEl::LineTo(Point::new(100.0, 50.0))));
}

#[test]
fn warp_maps_unit_square_into_column() {
    let src = Quad::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    let dst = Quad::from_rect(Rect::new(200.0, 100.0, 250.0, 150.0));
    let t = PerspectiveTransform::between(&src, &dst);
    let path = parse_svg_path("M0 0 H100 V100 H0 Z").unwrap();
    let warped = warp_path(&path, &t);
    let bb = warped.bounding_box();
    assert!((bb.x0 - 200.0).abs() < 1e-9 && (bb.x1 - 250.0).abs() < 1e-9);
    assert!((bb.y0 - 100.0).abs() < 1e-9 && (bb.y1 - 150.0).abs() < 1e-9);
    assert_eq!(warped.elements().len(), path.elements().len());
}
