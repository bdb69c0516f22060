use super::*;

// =============================================================
// Helpers
// =============================================================

const RADII: HandleRadii = HandleRadii { resize_px: 10.0, delete_px: 12.0 };

fn geometry() -> DisplayGeometry {
    DisplayGeometry { width: 800.0, height: 400.0, aspect_ratio: 2.0 }
}

fn placement(x_ratio: f64, y_ratio: f64, size_ratio: f64) -> Placement {
    Placement {
        x_ratio,
        y_ratio,
        size_ratio,
        scale: 1.0,
        monke_number: "1".into(),
        monke_image_no_bg: "/monkes/gen3/1.png".into(),
    }
}

/// Build a store directly from placements. Sizes are ratios of the 400px short edge.
fn store_of(placements: &[Placement]) -> PlacementStore {
    let mut store = PlacementStore::new();
    let resolver = crate::asset::AssetResolver::new("monkes", crate::asset::Generation::Gen3);
    for (i, p) in placements.iter().enumerate() {
        store.add_placement(p.x_ratio, p.y_ratio, "1", &geometry(), 100.0, &resolver);
        store.resize_placement(i, p.size_ratio);
    }
    store
}

// =============================================================
// ScreenSquare
// =============================================================

#[test]
fn square_projects_center_and_size() {
    let sq = ScreenSquare::of(&placement(0.5, 0.5, 0.25), &geometry());
    assert_eq!(sq.center, Point::new(400.0, 200.0));
    assert_eq!(sq.size, 100.0);
    assert_eq!(sq.top_right(), Point::new(450.0, 150.0));
    assert_eq!(sq.bottom_right(), Point::new(450.0, 250.0));
}

#[test]
fn square_containment_is_inclusive() {
    let sq = ScreenSquare::of(&placement(0.5, 0.5, 0.25), &geometry());
    assert!(sq.contains(Point::new(350.0, 150.0)));
    assert!(sq.contains(Point::new(450.0, 250.0)));
    assert!(!sq.contains(Point::new(450.1, 200.0)));
    assert!(!sq.contains(Point::new(400.0, 149.9)));
}

// =============================================================
// hit_body
// =============================================================

#[test]
fn center_click_hits_placement() {
    let store = store_of(&[placement(0.25, 0.25, 0.1), placement(0.75, 0.75, 0.1)]);
    for (i, p) in store.placements().iter().enumerate() {
        let center = geometry().ratio_to_screen(Point::new(p.x_ratio, p.y_ratio));
        assert_eq!(hit_body(center, &store, &geometry()), Some(i));
    }
}

#[test]
fn overlapping_bodies_prefer_later_sequence() {
    let store = store_of(&[placement(0.5, 0.5, 0.3), placement(0.5, 0.5, 0.2)]);
    assert_eq!(hit_body(Point::new(400.0, 200.0), &store, &geometry()), Some(1));
    // Outside the smaller one but inside the larger one.
    assert_eq!(hit_body(Point::new(455.0, 200.0), &store, &geometry()), Some(0));
}

#[test]
fn empty_space_misses() {
    let store = store_of(&[placement(0.5, 0.5, 0.1)]);
    assert_eq!(hit_body(Point::new(10.0, 10.0), &store, &geometry()), None);
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn affordances_only_on_selected() {
    let mut store = store_of(&[placement(0.5, 0.5, 0.25)]);
    let corner = Point::new(450.0, 250.0);
    assert_eq!(hit_test(corner, &store, &geometry(), RADII), Some(Hit { index: 0, part: HitPart::Body }));

    store.select_placement(Some(0));
    assert_eq!(hit_test(corner, &store, &geometry(), RADII), Some(Hit { index: 0, part: HitPart::ResizeHandle }));
    assert_eq!(
        hit_test(Point::new(455.0, 145.0), &store, &geometry(), RADII),
        Some(Hit { index: 0, part: HitPart::DeleteButton })
    );
}

#[test]
fn resize_handle_extends_outside_square() {
    let mut store = store_of(&[placement(0.5, 0.5, 0.25)]);
    store.select_placement(Some(0));
    let outside = Point::new(457.0, 257.0);
    assert_eq!(hit_test(outside, &store, &geometry(), RADII), Some(Hit { index: 0, part: HitPart::ResizeHandle }));
}

#[test]
fn selected_body_wins_over_later_overlap() {
    let mut store = store_of(&[placement(0.5, 0.5, 0.2), placement(0.5, 0.5, 0.2)]);
    store.select_placement(Some(0));
    assert_eq!(
        hit_test(Point::new(400.0, 200.0), &store, &geometry(), RADII),
        Some(Hit { index: 0, part: HitPart::Body })
    );
}

#[test]
fn not_ready_geometry_never_hits() {
    let store = store_of(&[placement(0.5, 0.5, 0.2)]);
    assert_eq!(hit_test(Point::new(0.0, 0.0), &store, &DisplayGeometry::default(), RADII), None);
}

#[test]
fn hit_part_variants_distinct() {
    assert_ne!(HitPart::Body, HitPart::ResizeHandle);
    assert_ne!(HitPart::Body, HitPart::DeleteButton);
    assert_ne!(HitPart::ResizeHandle, HitPart::DeleteButton);
}
