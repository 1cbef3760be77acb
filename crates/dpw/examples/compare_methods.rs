//! Compare the four validation policies on a 200 mm wafer, with and without a
//! V-notch.
//!
//! Run: `cargo run -p dpw --example compare_methods`

use std::time::Instant;

use dpw::api::{suggestions, DieCalculator, NotchKind, Params};

fn main() -> dpw::Result<()> {
    let base = Params {
        die_size_x_um: 1000.0,
        die_size_y_um: 2000.0,
        scribe_lane_x_um: 50.0,
        scribe_lane_y_um: 50.0,
        yield_percentage: 85.0,
        ..Params::default()
    };
    let calc = DieCalculator::default();

    for notch in [NotchKind::None, NotchKind::V90] {
        let p = Params {
            notch_type: notch,
            ..base.clone()
        };
        p.validate()?;
        let t0 = Instant::now();
        let results = calc.compare(&p);
        println!(
            "notch={notch} ({:.1} ms for {} policies)",
            t0.elapsed().as_secs_f64() * 1e3,
            results.len()
        );
        for (policy, r) in &results {
            println!(
                "  {policy:<7} total={:>6} yield={:>6} util={:>6.2}% evaluated={}",
                r.total_dies, r.yield_dies, r.wafer_utilization, r.stats.evaluated
            );
        }
    }

    let single = calc.calculate_params(&base)?;
    for hint in suggestions(&single) {
        println!("hint: {hint}");
    }
    Ok(())
}
