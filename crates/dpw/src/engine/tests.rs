use super::*;
use crate::cache::{CacheCfg, QuantizedCache};
use crate::geom::AreaMethod;
use crate::notch::NotchKind;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn standard_params() -> Params {
    Params {
        die_size_x_um: 1000.0,
        die_size_y_um: 2000.0,
        scribe_lane_x_um: 50.0,
        scribe_lane_y_um: 50.0,
        wafer_diameter_mm: 200.0,
        edge_exclusion_mm: 3.0,
        yield_percentage: 80.0,
        validation_method: ValidationPolicy::Corner,
        notch_type: NotchKind::None,
        notch_depth_mm: 1.0,
    }
}

/// Full grid, no pre-filter, no cache, exact area.
fn brute_force() -> DieCalculator {
    DieCalculator::new(EngineCfg {
        use_symmetry: false,
        use_prefilter: false,
        use_cache: false,
        ..EngineCfg::default()
    })
}

fn total(calc: &DieCalculator, p: &Params) -> usize {
    calc.calculate_params(p).unwrap().total_dies
}

#[test]
fn standard_scenario_produces_consistent_counts() {
    let res = DieCalculator::default()
        .calculate_params(&standard_params())
        .unwrap();
    assert!(res.total_dies > 0);
    assert_eq!(
        res.yield_dies,
        (res.total_dies as f64 * 0.8).floor() as usize
    );
    assert!(res.wafer_utilization > 0.0 && res.wafer_utilization <= 100.0);
    assert_eq!(res.die_positions.len(), res.stats.candidates);
    assert_eq!(res.valid_positions().count(), res.total_dies);
    assert_eq!(res.invalid_count() + res.total_dies, res.die_positions.len());
    assert_eq!(res.policy, ValidationPolicy::Corner);
    assert!((res.params.pitch_x_mm - 1.05).abs() < 1e-12);
    assert!((res.params.pitch_y_mm - 2.05).abs() < 1e-12);
    assert_eq!(res.params.effective_radius_mm, 97.0);
    assert_eq!(res.params.notch_area_mm2, 0.0);
    assert_eq!(res.params.to_params(), standard_params());
}

#[test]
fn standard_scenario_is_close_to_the_gross_die_estimate() {
    // Gross estimate πR²/A − πD/√(2A) on the pitch cell.
    let res = DieCalculator::default()
        .calculate_params(&standard_params())
        .unwrap();
    let (r, a) = (97.0_f64, 1.05 * 2.05);
    let estimate = std::f64::consts::PI * r * r / a - std::f64::consts::PI * 2.0 * r / (2.0 * a).sqrt();
    let rel = (res.total_dies as f64 - estimate).abs() / estimate;
    assert!(rel < 0.05, "total {} estimate {estimate}", res.total_dies);
}

#[test]
fn positions_are_in_canonical_order_with_lattice_centers() {
    let res = DieCalculator::default()
        .calculate_params(&standard_params())
        .unwrap();
    let first = res.die_positions[0];
    assert_eq!((first.col, first.row), (-94, -49));
    let keys: Vec<_> = res.die_positions.iter().map(|p| (p.col, p.row)).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    for p in res.die_positions.iter().step_by(97) {
        assert_eq!(p.center_x, p.col as f64 * res.params.pitch_x_mm);
        assert_eq!(p.center_y, p.row as f64 * res.params.pitch_y_mm);
        assert!((p.distance_from_center - p.center().norm()).abs() < 1e-12);
        if !p.is_valid {
            assert_eq!(p.area_ratio, 0.0);
        }
    }
}

#[test]
fn optimized_run_equals_full_grid_scan_for_every_policy() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..12 {
        let p = Params {
            die_size_x_um: rng.gen_range(800.0..6000.0),
            die_size_y_um: rng.gen_range(800.0..6000.0),
            scribe_lane_x_um: rng.gen_range(0.0..120.0),
            scribe_lane_y_um: rng.gen_range(0.0..120.0),
            wafer_diameter_mm: rng.gen_range(50.0..150.0),
            edge_exclusion_mm: rng.gen_range(0.0..6.0),
            ..standard_params()
        };
        let fast = DieCalculator::default().compare(&p);
        let slow = brute_force().compare(&p);
        assert_eq!(fast.len(), 4);
        for policy in ValidationPolicy::ALL {
            let (a, b) = (&fast[&policy], &slow[&policy]);
            assert_eq!(a.total_dies, b.total_dies, "{policy} {p:?}");
            assert_eq!(a.die_positions, b.die_positions, "{policy} {p:?}");
            assert_eq!(a.wafer_utilization, b.wafer_utilization);
        }
    }
}

#[test]
fn optimized_run_does_less_work() {
    let p = standard_params();
    let fast = DieCalculator::default().calculate_params(&p).unwrap();
    let slow = brute_force().calculate_params(&p).unwrap();
    assert_eq!(slow.stats.evaluated, slow.stats.candidates);
    assert_eq!(slow.stats.prefiltered, 0);
    assert_eq!(slow.stats.cache_hits + slow.stats.cache_misses, 0);
    let quadrant = Lattice::covering(vector(1.05, 2.05), 97.0).quadrant_count();
    assert_eq!(fast.stats.evaluated + fast.stats.prefiltered, quadrant);
    assert!(fast.stats.prefiltered > 0);
    assert!(fast.stats.cache_hits > 0);
}

fn vector(x: f64, y: f64) -> nalgebra::Vector2<f64> {
    nalgebra::Vector2::new(x, y)
}

#[test]
fn reference_strip_area_agrees_with_exact_area() {
    let p = Params {
        validation_method: ValidationPolicy::Area,
        ..standard_params()
    };
    let exact = DieCalculator::default().calculate_params(&p).unwrap();
    let strips = DieCalculator::reference().calculate_params(&p).unwrap();
    assert_eq!(strips.params.engine.area_method, AreaMethod::reference());
    let diff = exact.total_dies.abs_diff(strips.total_dies);
    assert!(diff <= 4, "exact {} strips {}", exact.total_dies, strips.total_dies);
    for (a, b) in exact.die_positions.iter().zip(&strips.die_positions) {
        assert!((a.area_ratio - b.area_ratio).abs() < 2e-2);
    }
}

#[test]
fn notch_never_increases_the_count() {
    for policy in ValidationPolicy::ALL {
        let base = Params {
            validation_method: policy,
            edge_exclusion_mm: 0.0,
            ..standard_params()
        };
        let none = total(&DieCalculator::default(), &base);
        for kind in [NotchKind::V90, NotchKind::Flat] {
            let notched = Params {
                notch_type: kind,
                notch_depth_mm: 1.0,
                ..base.clone()
            };
            let res = DieCalculator::default().calculate_params(&notched).unwrap();
            assert!(res.total_dies <= none, "{policy} {kind}");
            assert!(res.params.notch_area_mm2 > 0.0);
        }
    }
}

#[test]
fn notch_removes_dies_at_the_bottom_rim() {
    // No edge exclusion: corner dies reach the rim where the notch sits.
    let base = Params {
        edge_exclusion_mm: 0.0,
        validation_method: ValidationPolicy::Center,
        ..standard_params()
    };
    let flat = Params {
        notch_type: NotchKind::Flat,
        notch_depth_mm: 2.0,
        ..base.clone()
    };
    let a = DieCalculator::default().calculate_params(&base).unwrap();
    let b = DieCalculator::default().calculate_params(&flat).unwrap();
    assert!(b.total_dies < a.total_dies);
    // Only positions in the bottom band change.
    for (x, y) in a.die_positions.iter().zip(&b.die_positions) {
        if x.is_valid != y.is_valid {
            assert!(y.center_y < -90.0, "changed at {:?}", y.center());
        }
    }
}

#[test]
fn zero_depth_notch_is_inert() {
    let base = standard_params();
    let zero = Params {
        notch_type: NotchKind::V90,
        notch_depth_mm: 0.0,
        ..base.clone()
    };
    let a = DieCalculator::default().calculate_params(&base).unwrap();
    let b = DieCalculator::default().calculate_params(&zero).unwrap();
    assert_eq!(a.die_positions, b.die_positions);
}

#[test]
fn die_larger_than_wafer_places_nothing() {
    let p = Params {
        die_size_x_um: 300_000.0,
        die_size_y_um: 300_000.0,
        ..standard_params()
    };
    for (policy, res) in DieCalculator::default().compare(&p) {
        assert_eq!(res.total_dies, 0, "{policy}");
        assert_eq!(res.yield_dies, 0);
        assert_eq!(res.wafer_utilization, 0.0);
        assert!(!res.die_positions.is_empty());
        assert_eq!(res.valid_positions().count(), 0);
    }
}

#[test]
fn area_policy_can_exceed_full_utilization_with_oversized_dies() {
    // A 19 mm die on a 20 mm wafer: the center die is ~85% covered and
    // counts, yet its nominal area exceeds the wafer's.
    let p = Params {
        die_size_x_um: 19_000.0,
        die_size_y_um: 19_000.0,
        scribe_lane_x_um: 0.0,
        scribe_lane_y_um: 0.0,
        wafer_diameter_mm: 20.0,
        edge_exclusion_mm: 0.0,
        yield_percentage: 100.0,
        validation_method: ValidationPolicy::Area,
        ..standard_params()
    };
    let res = DieCalculator::default().calculate_params(&p).unwrap();
    assert_eq!(res.total_dies, 1);
    assert!(res.wafer_utilization > 100.0, "{}", res.wafer_utilization);
    let center = res.valid_positions().next().unwrap();
    assert_eq!((center.col, center.row), (0, 0));
    assert!(center.area_ratio > 0.8 && center.area_ratio < 0.9);
}

#[test]
fn invalid_parameters_are_all_reported() {
    let p = Params {
        die_size_x_um: -1.0,
        wafer_diameter_mm: 0.0,
        yield_percentage: 101.0,
        ..standard_params()
    };
    let err = DieCalculator::default().calculate_params(&p).unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
    assert_eq!(
        fields,
        vec!["die_size_x_um", "wafer_diameter_mm", "yield_percentage"]
    );
}

#[test]
fn yield_is_checked_on_the_spec_entry_point() {
    let (die, wafer) = standard_params().validate().unwrap();
    let err = DieCalculator::default()
        .calculate(&die, &wafer, ValidationPolicy::Center, -5.0)
        .unwrap_err();
    assert_eq!(err.violations()[0].field, "yield_percentage");
}

#[test]
fn candidate_ceiling_fails_before_scanning() {
    let calc = DieCalculator::new(EngineCfg {
        max_candidates: 1000,
        ..EngineCfg::default()
    });
    match calc.calculate_params(&standard_params()) {
        Err(DpwError::TooManyCandidates { count, limit }) => {
            assert_eq!(limit, 1000);
            assert_eq!(count, 189 * 99);
        }
        other => panic!("expected ceiling error, got {other:?}"),
    }
}

#[test]
fn compare_runs_every_policy_in_order_and_skips_failures() {
    let res = DieCalculator::default().compare(&standard_params());
    let keys: Vec<_> = res.keys().copied().collect();
    assert_eq!(keys, ValidationPolicy::ALL.to_vec());
    for (policy, r) in &res {
        assert_eq!(r.policy, *policy);
    }
    let bad = Params {
        die_size_x_um: 0.0,
        ..standard_params()
    };
    assert!(DieCalculator::default().compare(&bad).is_empty());
}

#[test]
fn compare_methods_runs_only_the_listed_policies() {
    let calc = DieCalculator::default();
    let p = standard_params();
    let res = calc.compare_methods(
        &p,
        &[ValidationPolicy::Strict, ValidationPolicy::Center, ValidationPolicy::Strict],
    );
    let keys: Vec<_> = res.keys().copied().collect();
    assert_eq!(keys, vec![ValidationPolicy::Center, ValidationPolicy::Strict]);
    let all = calc.compare(&p);
    for (policy, r) in &res {
        assert_eq!(r.die_positions, all[policy].die_positions);
    }
    assert!(calc.compare_methods(&p, &[]).is_empty());
}

#[test]
fn supplied_cache_is_used_and_does_not_change_results() {
    let (die, wafer) = standard_params().validate().unwrap();
    let calc = DieCalculator::new(EngineCfg {
        use_cache: false,
        ..EngineCfg::default()
    });
    let plain = calc
        .calculate(&die, &wafer, ValidationPolicy::Strict, 100.0)
        .unwrap();
    let mut cache = QuantizedCache::new(CacheCfg {
        capacity: 1 << 20,
        ..CacheCfg::default()
    });
    let cached = calc
        .calculate_with_cache(&die, &wafer, ValidationPolicy::Strict, 100.0, &mut cache)
        .unwrap();
    assert_eq!(plain.die_positions, cached.die_positions);
    // Unbounded cache: every mirror image after the first is a hit.
    assert_eq!(cached.stats.cache_misses as usize, cache.len());
    assert!(cached.stats.cache().hit_rate() > 0.7);
}

#[test]
fn sub_micrometre_pitch_keeps_distances_exact() {
    // Pitch 8e-7 mm is below the default cache quantum.
    let p = Params {
        die_size_x_um: 0.0008,
        die_size_y_um: 0.0008,
        scribe_lane_x_um: 0.0,
        scribe_lane_y_um: 0.0,
        wafer_diameter_mm: 0.0002,
        edge_exclusion_mm: 0.0,
        notch_depth_mm: 0.0,
        ..standard_params()
    };
    let fast = DieCalculator::default().calculate_params(&p).unwrap();
    let slow = brute_force().calculate_params(&p).unwrap();
    assert!(fast.stats.candidates > 60_000);
    assert!(fast.stats.cache_hits > 0);
    for (a, b) in fast.die_positions.iter().zip(&slow.die_positions) {
        assert_eq!(a.distance_from_center, a.center().norm(), "{a:?}");
        assert_eq!(a, b);
    }
    assert_eq!(fast.die_positions.len(), slow.die_positions.len());
}

#[test]
fn calculator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DieCalculator>();
    assert_send_sync::<CalculationResult>();
}

fn arb_params() -> impl Strategy<Value = Params> {
    (
        1000.0..8000.0f64,
        1000.0..8000.0f64,
        0.0..200.0f64,
        0.0..200.0f64,
        40.0..150.0f64,
        0.0..8.0f64,
        0.0..=100.0f64,
    )
        .prop_map(|(dx, dy, sx, sy, d, e, y)| Params {
            die_size_x_um: dx,
            die_size_y_um: dy,
            scribe_lane_x_um: sx,
            scribe_lane_y_um: sy,
            wafer_diameter_mm: d,
            edge_exclusion_mm: e,
            yield_percentage: y,
            ..Params::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_yield_is_floor_of_scaled_total(p in arb_params()) {
        let res = DieCalculator::default().calculate_params(&p).unwrap();
        prop_assert!(res.yield_dies <= res.total_dies);
        prop_assert_eq!(
            res.yield_dies,
            (res.total_dies as f64 * p.yield_percentage / 100.0).floor() as usize
        );
        prop_assert_eq!(res.valid_positions().count(), res.total_dies);
        prop_assert!(res.wafer_utilization >= 0.0 && res.wafer_utilization <= 100.0);
    }

    #[test]
    fn prop_policies_nest(p in arb_params()) {
        let res = DieCalculator::default().compare(&p);
        let t = |k: ValidationPolicy| res[&k].total_dies;
        prop_assert!(t(ValidationPolicy::Strict) <= t(ValidationPolicy::Corner));
        prop_assert!(t(ValidationPolicy::Corner) <= t(ValidationPolicy::Center));
    }

    #[test]
    fn prop_more_edge_exclusion_never_adds_dies(p in arb_params(), extra in 0.0..10.0f64) {
        let calc = DieCalculator::default();
        for policy in ValidationPolicy::ALL {
            let a = Params { validation_method: policy, ..p.clone() };
            let b = Params { edge_exclusion_mm: p.edge_exclusion_mm + extra, ..a.clone() };
            prop_assert!(total(&calc, &b) <= total(&calc, &a), "{}", policy);
        }
    }

    // Cell (i, j) of the larger pitch is the image of cell (i, j) of the
    // smaller one under an axis scaling >= 1, so it is never closer to the
    // center, and its in-wafer fraction is never larger.
    #[test]
    fn prop_doubling_die_size_never_adds_dies(p in arb_params()) {
        let calc = DieCalculator::default();
        for policy in ValidationPolicy::ALL {
            let small = Params { validation_method: policy, ..p.clone() };
            let big = Params {
                die_size_x_um: 2.0 * p.die_size_x_um,
                die_size_y_um: 2.0 * p.die_size_y_um,
                ..small.clone()
            };
            prop_assert!(total(&calc, &big) <= total(&calc, &small), "{}", policy);
        }
    }

    #[test]
    fn prop_notch_never_adds_dies(p in arb_params(), depth in 0.0..3.0f64, flat in any::<bool>()) {
        let kind = if flat { NotchKind::Flat } else { NotchKind::V90 };
        let notched = Params { notch_type: kind, notch_depth_mm: depth, ..p.clone() };
        let calc = DieCalculator::default();
        prop_assert!(total(&calc, &notched) <= total(&calc, &p));
    }
}
