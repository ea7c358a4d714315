use graylab::{find_nearest_region, find_similar_region, Grid, Point};

fn patterned(width: usize, height: usize) -> Grid {
    let mut samples = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            samples.push((((col * 13) ^ (row * 7) ^ (col * row)) & 0xFF) as u16);
        }
    }
    Grid::new(width, height, 255, samples).unwrap()
}

#[test]
fn cutout_template_is_located_exactly() {
    let target = patterned(40, 32);
    let at = Point { row: 11, col: 23 };
    let template = target.cutout(at, 8, 10).unwrap();

    let sad = find_nearest_region(&target, &template).unwrap();
    assert_eq!(sad.at, at);
    assert_eq!(sad.distance, 0);

    let ncc = find_similar_region(&target, &template).unwrap();
    assert_eq!(ncc.at, at);
    assert!((ncc.score - 1.0).abs() < 1e-9);
}

#[test]
fn noisy_template_still_matches_its_origin() {
    let target = patterned(32, 32);
    let at = Point { row: 4, col: 9 };
    let mut template = target.cutout(at, 6, 6).unwrap();

    // Perturb a few template pixels by +-2; the placement must survive.
    let bump = [(0usize, 0usize, 2i32), (2, 3, -2), (5, 5, 1), (3, 1, -1)];
    for &(row, col, delta) in &bump {
        let value = (template.get(row, col) as i32 + delta).clamp(0, 255) as u16;
        template.set(row, col, value);
    }

    let sad = find_nearest_region(&target, &template).unwrap();
    assert_eq!(sad.at, at);
    assert!(sad.distance <= 6);

    let ncc = find_similar_region(&target, &template).unwrap();
    assert_eq!(ncc.at, at);
    assert!(ncc.score > 0.99);
}

#[test]
fn template_equal_to_target_matches_at_origin() {
    let target = patterned(12, 12);
    let template = target.clone();

    let sad = find_nearest_region(&target, &template).unwrap();
    assert_eq!(sad.at, Point { row: 0, col: 0 });
    assert_eq!(sad.distance, 0);

    let ncc = find_similar_region(&target, &template).unwrap();
    assert_eq!(ncc.at, Point { row: 0, col: 0 });
    assert!((ncc.score - 1.0).abs() < 1e-9);
}

#[test]
fn found_region_can_be_marked_and_cut_out() {
    let target = patterned(24, 24);
    let at = Point { row: 6, col: 3 };
    let template = target.cutout(at, 5, 5).unwrap();

    let hit = find_nearest_region(&target, &template).unwrap();
    let recovered = target.cutout(hit.at, 5, 5).unwrap();
    assert_eq!(recovered.samples(), template.samples());

    let mut annotated = target.clone();
    annotated.mark_window(template.height(), template.width(), hit.at);
    assert_eq!(annotated.get(6, 3), 255);
    assert_eq!(annotated.get(11, 8), 255);
}
