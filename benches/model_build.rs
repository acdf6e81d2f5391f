use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use eos_sched::catalog::Catalog;
use eos_sched::config::ModelConfig;
use eos_sched::models::{
    DownlinkWindow, GroundStation, GroundStationId, RechargeWindow, Satellite, SatelliteId,
    SlotInterval, SlotLabel, Target, TargetId, VisibilityWindow,
};
use eos_sched::solver::ModelBuilder;

fn slot(i: usize) -> String {
    format!("S{:03}", i)
}

fn sat_id(s: usize) -> SatelliteId {
    SatelliteId::from(format!("SAT{:02}", s))
}

/// Dense synthetic fleet: every satellite sees every target once, passes
/// rotate over three stations, and every fifth slot recharges.
fn synthetic_catalog(num_satellites: usize, num_targets: usize, num_slots: usize) -> Catalog {
    let mut catalog = Catalog::new();
    for s in 0..num_satellites {
        catalog
            .add_satellite(Satellite {
                id: sat_id(s),
                orbit: if s % 2 == 0 { "LEO" } else { "SSO" }.to_string(),
                memory_capacity_gb: 64.0,
                max_obs_per_day: 8,
            })
            .unwrap();
    }
    for g in 0..3 {
        catalog
            .add_ground_station(GroundStation {
                id: GroundStationId::from(format!("GS{}", g)),
                location: "(0.0, 0.0)".to_string(),
                max_data_rate_gb: 10.0,
            })
            .unwrap();
    }
    for t in 0..num_targets {
        catalog
            .add_target(Target {
                id: TargetId::from(format!("TGT{:03}", t)),
                latitude_deg: (t % 90) as f64,
                longitude_deg: (t % 180) as f64,
                urgency: (t % 9 + 1) as f64,
                importance: (t * 3 % 9 + 1) as f64,
            })
            .unwrap();
    }
    for s in 0..num_satellites {
        for t in 0..num_targets {
            let k = slot((s + t) % num_slots);
            catalog.add_visibility_window(VisibilityWindow {
                satellite: sat_id(s),
                target: TargetId::from(format!("TGT{:03}", t)),
                interval: SlotInterval::new(k.clone(), k),
                duration_min: 10.0,
            });
        }
        for g in 0..3 {
            let k = slot((s * 7 + g * 3) % num_slots);
            catalog.add_downlink_window(DownlinkWindow {
                satellite: sat_id(s),
                station: GroundStationId::from(format!("GS{}", g)),
                interval: SlotInterval::new(k.clone(), k),
                duration_min: 10.0,
                max_data_gb: 12.0,
            });
        }
        for k in (0..num_slots).step_by(5) {
            catalog.add_recharge_window(RechargeWindow {
                satellite: sat_id(s),
                slot: SlotLabel::from(slot(k)),
            });
        }
    }
    catalog
}

fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    let config = ModelConfig::default();

    for (sats, targets, slots) in [(2, 10, 8), (6, 40, 16), (12, 80, 24)] {
        let catalog = synthetic_catalog(sats, targets, slots);
        let label = format!("{}x{}x{}", sats, targets, slots);
        group.bench_with_input(BenchmarkId::new("build", label), &catalog, |b, catalog| {
            b.iter(|| ModelBuilder::new(black_box(catalog), &config).build().unwrap());
        });
    }

    group.finish();
}

fn bench_model_outputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_outputs");
    let config = ModelConfig::default();
    let catalog = synthetic_catalog(6, 40, 16);
    let model = ModelBuilder::new(&catalog, &config).build().unwrap();

    group.bench_function("fingerprint", |b| {
        b.iter(|| black_box(&model).fingerprint());
    });
    group.bench_function("render_lp", |b| {
        b.iter(|| black_box(&model).render_lp());
    });

    group.finish();
}

criterion_group!(benches, bench_model_build, bench_model_outputs);
criterion_main!(benches);
