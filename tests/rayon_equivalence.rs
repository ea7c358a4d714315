#![cfg(feature = "rayon")]

use graylab::{
    find_nearest_region, find_nearest_region_par, find_similar_region, find_similar_region_par,
    Grid, Point,
};
use rand::prelude::*;

fn random_grid(rng: &mut impl Rng, width: usize, height: usize) -> Grid {
    let samples: Vec<u16> = (0..width * height)
        .map(|_| rng.random_range(0..=255))
        .collect();
    Grid::new(width, height, 255, samples).unwrap()
}

#[test]
fn parallel_sad_matches_sequential_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x5ad);
    for _ in 0..5 {
        let target = random_grid(&mut rng, 48, 40);
        let template = random_grid(&mut rng, 7, 9);

        let seq = find_nearest_region(&target, &template).unwrap();
        let par = find_nearest_region_par(&target, &template).unwrap();
        assert_eq!(seq, par);
    }
}

#[test]
fn parallel_ncc_matches_sequential_on_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0xacc);
    for _ in 0..5 {
        let target = random_grid(&mut rng, 48, 40);
        let template = random_grid(&mut rng, 7, 9);

        let seq = find_similar_region(&target, &template).unwrap();
        let par = find_similar_region_par(&target, &template).unwrap();
        assert_eq!(seq.at, par.at);
        assert!((seq.score - par.score).abs() < 1e-12);
    }
}

#[test]
fn parallel_variants_preserve_the_sequential_tie_break() {
    // A constant target ties every placement; both variants must keep the
    // first placement in row-major order.
    let target = Grid::filled(16, 16, 255, 10).unwrap();
    let template = Grid::filled(3, 3, 255, 12).unwrap();

    let seq = find_nearest_region(&target, &template).unwrap();
    let par = find_nearest_region_par(&target, &template).unwrap();
    assert_eq!(seq.at, Point { row: 0, col: 0 });
    assert_eq!(seq, par);
}
