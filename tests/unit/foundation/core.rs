use super::*;

fn unit_square() -> Quad {
    Quad::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
}

#[test]
fn quad_rejects_wrong_point_count() {
    let err = serde_json::from_str::<Quad>(r#"[{"x":0,"y":0},{"x":1,"y":0},{"x":1,"y":1}]"#)
        .unwrap_err();
    assert!(err.to_string().contains("exactly 4 points"));

    let q: Quad = serde_json::from_str(
        r#"[{"x":0,"y":0},{"x":1,"y":0},{"x":1,"y":1},{"x":0,"y":1}]"#,
    )
    .unwrap();
    assert_eq!(q.br(), Point::new(1.0, 1.0));
}

#[test]
fn quad_serializes_as_point_array() {
    let v = serde_json::to_value(unit_square()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 4);
    assert_eq!(v[2]["x"], 100.0);
}

#[test]
fn columns_tile_the_quad() {
    let q = unit_square();
    let c0 = q.column(0, 4);
    let c3 = q.column(3, 4);
    assert_eq!(c0.tl(), Point::new(0.0, 0.0));
    assert_eq!(c0.tr(), Point::new(25.0, 0.0));
    assert_eq!(c3.br(), Point::new(100.0, 100.0));
    assert_eq!(c3.bl(), Point::new(75.0, 100.0));
}

#[test]
fn contains_uses_exact_outline() {
    let q = Quad::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(60.0, 50.0),
        Point::new(40.0, 50.0),
    );
    assert!(q.contains(Point::new(50.0, 25.0)));
    assert!(!q.contains(Point::new(5.0, 45.0)));
    assert!(!q.contains(Point::new(150.0, 10.0)));
}

#[test]
fn lerp_hits_endpoints() {
    let a = unit_square();
    let b = Quad::from_rect(Rect::new(10.0, 20.0, 30.0, 40.0));
    assert_eq!(a.lerp(&b, 0.0), a);
    assert_eq!(a.lerp(&b, 1.0), b);
    assert_eq!(a.lerp(&b, 0.5).tl(), Point::new(5.0, 10.0));
}

#[test]
fn bounds_and_centroid() {
    let q = unit_square();
    assert_eq!(q.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(q.centroid(), Point::new(50.0, 50.0));
}

#[test]
fn parse_hex_variants() {
    assert_eq!(Rgba8::parse_hex("#1a1a1a").unwrap(), Rgba8::opaque(26, 26, 26));
    assert_eq!(Rgba8::parse_hex("fff").unwrap(), Rgba8::WHITE);
    assert_eq!(
        Rgba8::parse_hex("#FF000080").unwrap(),
        Rgba8 {
            r: 255,
            g: 0,
            b: 0,
            a: 128
        }
    );
    assert!(Rgba8::parse_hex("#12345").is_err());
    assert!(Rgba8::parse_hex("#gggggg").is_err());
}

#[test]
fn with_opacity_scales_alpha_only() {
    let c = Rgba8::opaque(200, 100, 0).with_opacity(0.5);
    assert_eq!(c, Rgba8 { r: 200, g: 100, b: 0, a: 128 });
    assert_eq!(c.with_opacity(0.0).a, 0);
}

#[test]
fn box_region_contains_is_inclusive() {
    let b = BoxRegion {
        x: 10.0,
        y: 10.0,
        width: 20.0,
        height: 5.0,
    };
    assert!(b.contains(Point::new(10.0, 15.0)));
    assert!(!b.contains(Point::new(31.0, 12.0)));
    assert!(b.validate("hitbox").is_ok());
}
