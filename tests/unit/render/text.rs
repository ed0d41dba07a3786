use super::*;
use crate::foundation::core::{Point, Rect};

#[test]
fn keeps_letters_and_digits_only() {
    assert_eq!(drawable_chars("Item 4!"), vec!['I', 'T', 'E', 'M', '4']);
    assert!(drawable_chars("  -- ").is_empty());
    assert!(drawable_chars("é").is_empty());
}

#[test]
fn columns_follow_the_skewed_edges() {
    let q = Quad::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 20.0),
        Point::new(100.0, 120.0),
        Point::new(0.0, 100.0),
    );
    let cols = layout_columns(&q, "a b");
    assert_eq!(cols.len(), 2);
    assert_eq!(cols[0].0, 'A');
    assert_eq!(cols[1].0, 'B');
    assert_eq!(cols[0].1.tr(), Point::new(50.0, 10.0));
    assert_eq!(cols[1].1.bl(), Point::new(50.0, 110.0));
    assert_eq!(cols[1].1.br(), Point::new(100.0, 120.0));
}

#[test]
fn single_char_fills_the_quad() {
    let q = Quad::from_rect(Rect::new(0.0, 0.0, 40.0, 10.0));
    let cols = layout_columns(&q, "x");
    assert_eq!(cols, vec![('X', q)]);
}
