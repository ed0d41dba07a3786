use super::*;
use crate::foundation::core::Rect;
use crate::graph::model::ElementContent;

fn rect_container(id: &str, bundle: &str, y: f64) -> Container {
    Container::new(id, bundle, id).with_points(Quad::from_rect(Rect::new(0.0, y, 100.0, y + 40.0)))
}

fn sample_graph() -> ContainerGraph {
    let bundles = vec![
        Bundle {
            id: "b1".into(),
            name: "One".into(),
        },
        Bundle {
            id: "b2".into(),
            name: "Two".into(),
        },
    ];
    let mut above = rect_container("c0", "b1", 0.0);
    above.above_teleport_container_id = Some("c2".into());
    above.below_teleport_container_id = Some("top".into());
    let containers = vec![
        rect_container("top", "b1", -50.0).with_role(TeleportRole::Top),
        above,
        rect_container("c1", "b1", 50.0),
        rect_container("btn", "b1", 300.0).with_role(TeleportRole::Button),
        rect_container("c2", "b1", 100.0),
        rect_container("bottom", "b1", 150.0).with_role(TeleportRole::Bottom),
        rect_container("x0", "b2", 500.0),
    ];
    ContainerGraph::new(bundles, containers)
}

fn element(id: &str, container: &str, role: ElementRole) -> ContentElement {
    ContentElement {
        id: id.into(),
        bundle_id: "b1".into(),
        container_id: container.into(),
        role,
        home_container_id: None,
        content: ElementContent {
            item_index: None,
            text: id.into(),
            color: "#000000".into(),
            font_color: "#ffffff".into(),
            image_url: None,
        },
        points: Quad::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        opacity: 1.0,
    }
}

#[test]
fn normal_containers_skip_roles_and_other_bundles() {
    let g = sample_graph();
    let ids: Vec<&str> = g.normal_containers("b1").iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c0", "c1", "c2"]);
    assert_eq!(g.ring_index("c2"), Some(2));
    assert_eq!(g.ring_index("btn"), None);
}

#[test]
fn ring_neighbor_wraps_at_both_ends() {
    let g = sample_graph();
    let step = |id: &str, d| g.ring_neighbor(id, d).unwrap();
    assert_eq!(
        step("c0", Direction::Up),
        RingStep {
            target: "c2".into(),
            wrapped: true
        }
    );
    assert_eq!(
        step("c1", Direction::Up),
        RingStep {
            target: "c0".into(),
            wrapped: false
        }
    );
    assert_eq!(
        step("c2", Direction::Down),
        RingStep {
            target: "c0".into(),
            wrapped: true
        }
    );
    assert!(g.ring_neighbor("top", Direction::Down).is_none());
}

#[test]
fn single_container_ring_wraps_onto_itself() {
    let g = sample_graph();
    assert_eq!(
        g.ring_neighbor("x0", Direction::Down).unwrap(),
        RingStep {
            target: "x0".into(),
            wrapped: true
        }
    );
}

#[test]
fn teleport_lookup_by_role() {
    let g = sample_graph();
    assert_eq!(g.teleport_container("b1", TeleportRole::Top).unwrap().id, "top");
    assert_eq!(g.teleport_container("b1", TeleportRole::Button).unwrap().id, "btn");
    assert!(g.teleport_container("b2", TeleportRole::Top).is_none());
}

#[test]
fn explicit_override_ignores_staging_targets() {
    let g = sample_graph();
    assert_eq!(
        g.explicit_teleport_target("c0", Direction::Up).unwrap().id,
        "c2"
    );
    assert!(g.explicit_teleport_target("c0", Direction::Down).is_none());
    assert!(g.explicit_teleport_target("c1", Direction::Up).is_none());
}

#[test]
fn container_hit_testing() {
    let g = sample_graph();
    assert_eq!(g.container_at(Point::new(50.0, 310.0)).unwrap().id, "btn");
    assert!(g.container_at(Point::new(500.0, 500.0)).is_none());
}

#[test]
fn dock_table_tracks_authoritative_elements() {
    let mut g = sample_graph();
    g.set_elements(vec![
        element("p0", "c0", ElementRole::Primary),
        element("p1", "c1", ElementRole::Primary),
        element("queued", "top", ElementRole::Primary),
        element("dup", "bottom", ElementRole::Duplicate),
    ]);
    assert_eq!(g.docked_id("c0"), Some("p0"));
    assert_eq!(g.docked_id("bottom"), Some("dup"));
    assert_eq!(g.docked_id("top"), None);

    g.settle("p0", "c1");
    assert_eq!(g.docked_id("c0"), None);
    assert_eq!(g.docked_id("c1"), Some("p0"));
    g.settle("p1", "c2");
    assert_eq!(g.docked("c2").unwrap().id, "p1");
    assert_eq!(g.docked_id("c1"), Some("p0"));
}

#[test]
fn teleport_snaps_geometry() {
    let mut g = sample_graph();
    g.set_elements(vec![element("p0", "c0", ElementRole::Primary)]);
    g.teleport("p0", "c2");
    let e = g.element("p0").unwrap();
    assert_eq!(e.container_id, "c2");
    assert_eq!(e.points, g.container("c2").unwrap().points);
    g.set_opacity("p0", 3.0);
    assert_eq!(g.element("p0").unwrap().opacity, 1.0);
}

#[test]
fn role_change_moves_dock_authority() {
    let mut g = sample_graph();
    g.set_elements(vec![
        element("p", "c2", ElementRole::Primary),
        element("d", "bottom", ElementRole::Duplicate),
    ]);
    g.settle("p", "bottom");
    assert_eq!(g.docked_id("c2"), None);
    assert_eq!(g.docked_id("bottom"), Some("d"));

    g.set_role("p", ElementRole::Duplicate);
    assert_eq!(g.docked_id("bottom"), Some("p"));
    g.settle("d", "c2");
    g.set_role("d", ElementRole::Primary);
    assert_eq!(g.docked_id("c2"), Some("d"));
}

#[test]
fn visible_in_ignores_hidden_and_duplicates() {
    let mut g = sample_graph();
    let mut hidden = element("h", "c1", ElementRole::Primary);
    hidden.opacity = 0.0;
    g.set_elements(vec![
        hidden,
        element("dup", "c1", ElementRole::Duplicate),
        element("v", "c1", ElementRole::Primary),
    ]);
    assert_eq!(g.visible_in("c1").map(|e| e.id.as_str()), Some("v"));
    g.set_opacity("v", 0.0);
    assert!(g.visible_in("c1").is_none());
}
