use super::*;
use crate::foundation::core::Rect;

fn square(size: f64) -> Quad {
    Quad::from_rect(Rect::new(0.0, 0.0, size, size))
}

fn trapezoid() -> Quad {
    Quad::new(
        Point::new(30.0, 10.0),
        Point::new(70.0, 10.0),
        Point::new(120.0, 90.0),
        Point::new(-20.0, 90.0),
    )
}

fn assert_close(a: Point, b: Point, tol: f64) {
    assert!(
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol,
        "{a:?} != {b:?}"
    );
}

#[test]
fn corners_map_exactly() {
    let pairs = [
        (square(100.0), trapezoid()),
        (trapezoid(), square(1.0)),
        (
            square(100.0),
            Quad::new(
                Point::new(5.0, 3.0),
                Point::new(250.0, 40.0),
                Point::new(230.0, 180.0),
                Point::new(12.0, 200.0),
            ),
        ),
    ];
    for (src, dst) in pairs {
        let t = PerspectiveTransform::between(&src, &dst);
        assert!(!t.is_degenerate());
        for k in 0..4 {
            assert_close(t.transform(src.0[k]), dst.0[k], 1e-9);
            assert_close(t.inverse_transform(dst.0[k]), src.0[k], 1e-9);
        }
    }
}

#[test]
fn interior_round_trip() {
    let t = PerspectiveTransform::between(&square(100.0), &trapezoid());
    for (x, y) in [(1.0, 1.0), (50.0, 50.0), (25.0, 80.0), (99.0, 3.5)] {
        let p = Point::new(x, y);
        assert_close(t.inverse_transform(t.transform(p)), p, 1e-9);
    }
}

#[test]
fn trapezoid_is_not_bilinear() {
    // The source centre maps to the intersection of the destination diagonals.
    let dst = Quad::new(
        Point::new(40.0, 0.0),
        Point::new(60.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
    );
    let t = PerspectiveTransform::between(&square(100.0), &dst);
    let mid = t.transform(Point::new(50.0, 50.0));
    assert!((mid.x - 50.0).abs() < 1e-9);
    assert!((mid.y - 100.0 / 6.0).abs() < 1e-9, "got {mid:?}");
}

#[test]
fn affine_case_matches_scale() {
    let dst = Quad::from_rect(Rect::new(0.0, 0.0, 100.0, 50.0));
    let t = PerspectiveTransform::between(&square(100.0), &dst);
    assert_close(t.transform(Point::new(50.0, 50.0)), Point::new(50.0, 25.0), 1e-9);
    assert_close(
        t.inverse_transform(Point::new(50.0, 25.0)),
        Point::new(50.0, 50.0),
        1e-9,
    );
}

#[test]
fn degenerate_input_falls_back_to_identity() {
    let p = Point::new(3.0, 4.0);
    let collapsed = Quad([p; 4]);
    let t = PerspectiveTransform::between(&collapsed, &square(10.0));
    assert!(t.is_degenerate());
    assert_eq!(t.transform(Point::new(7.0, 8.0)), Point::new(7.0, 8.0));

    let nan = Quad([Point::new(f64::NAN, 0.0); 4]);
    assert!(PerspectiveTransform::between(&square(1.0), &nan).is_degenerate());
}

#[test]
fn collinear_corners_do_not_panic() {
    let line = Quad::new(
        Point::new(0.0, 0.0),
        Point::new(50.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(0.0, 100.0),
    );
    let t = PerspectiveTransform::between(&square(100.0), &line);
    let _ = t.transform(Point::new(10.0, 10.0));
    let _ = t.inverse_transform(Point::new(10.0, 10.0));
}
