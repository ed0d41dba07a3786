use super::*;
use crate::foundation::core::{Point, Rect};

fn square(x: f64) -> Quad {
    Quad::from_rect(Rect::new(x, 0.0, x + 10.0, 10.0))
}

#[test]
fn tween_hits_end_exactly_and_clamps_time() {
    let mut t = Tween::new(0.0_f64, 10.0, 1.0, Ease::Linear);
    t.advance(0.25);
    assert!((t.value() - 2.5).abs() < 1e-12);
    t.advance(5.0);
    assert!(t.is_finished());
    assert_eq!(t.value(), 10.0);
}

#[test]
fn zero_duration_tween_is_immediately_finished() {
    let t = Tween::new(1.0_f64, 3.0, 0.0, Ease::InOutQuad);
    assert!(t.is_finished());
    assert_eq!(t.value(), 3.0);
}

#[test]
fn delayed_fade_in_holds_zero_then_ramps() {
    let r = OpacityRamp::fade_in_delayed(0.3);
    assert_eq!(r.at(0.0), 0.0);
    assert_eq!(r.at(0.3), 0.0);
    assert!((r.at(0.65) - 0.5).abs() < 1e-12);
    assert_eq!(r.at(1.0), 1.0);

    let out = OpacityRamp::fade_out();
    assert!((out.at(0.25) - 0.75).abs() < 1e-12);
}

#[test]
fn registry_reports_settle_actions_once() {
    let mut reg: TweenRegistry<&'static str> = TweenRegistry::new();
    let ticket = reg.install(
        "e1",
        ElementTask::morph(square(0.0), square(100.0), 1.0, Ease::Linear).on_settle("docked"),
    );
    assert!(reg.is_running(ticket));

    let step = reg.advance(0.5);
    assert!(step.settled.is_empty());
    let (id, sample) = &step.samples[0];
    assert_eq!(id, "e1");
    let pts = sample.points.expect("geometry sample");
    assert_eq!(pts.tl(), Point::new(50.0, 0.0));

    let step = reg.advance(0.5);
    assert_eq!(step.settled, vec!["docked"]);
    assert_eq!(step.samples[0].1.points, Some(square(100.0)));
    assert!(!reg.is_running(ticket));
    assert!(reg.is_idle());

    assert!(reg.advance(1.0).settled.is_empty());
}

#[test]
fn installing_again_supersedes_without_settling() {
    let mut reg: TweenRegistry<u32> = TweenRegistry::new();
    let first = reg.install(
        "e1",
        ElementTask::morph(square(0.0), square(100.0), 1.0, Ease::Linear).on_settle(1),
    );
    reg.advance(0.5);
    let second = reg.install(
        "e1",
        ElementTask::morph(square(50.0), square(0.0), 0.5, Ease::Linear).on_settle(2),
    );
    assert!(!reg.is_running(first));
    assert!(reg.is_running(second));
    assert_eq!(reg.len(), 1);

    let step = reg.advance(1.0);
    assert_eq!(step.settled, vec![2]);
}

#[test]
fn settle_order_follows_installation_order() {
    let mut reg: TweenRegistry<&'static str> = TweenRegistry::new();
    reg.install("zeta", ElementTask::fade(OpacityRamp::fade_out(), 0.2).on_settle("zeta"));
    reg.install("alpha", ElementTask::fade(OpacityRamp::fade_out(), 0.2).on_settle("alpha"));
    let step = reg.advance(1.0);
    assert_eq!(step.settled, vec!["zeta", "alpha"]);
    assert_eq!(step.samples[0].1.opacity, Some(0.0));
}
