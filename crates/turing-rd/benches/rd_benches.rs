use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rhizome_turing_rd::stencil::laplacian_into;
use rhizome_turing_rd::{
    Config, GridState, Integrator, Preset, ReactionParams, SeedPlan, Simulation,
};

// ============================================================================
// Stencil
// ============================================================================

fn bench_laplacian(c: &mut Criterion) {
    let mut group = c.benchmark_group("laplacian");

    for size in [64, 256, 512] {
        let field: Vec<f32> = (0..size * size).map(|i| (i % 97) as f32 / 97.0).collect();
        let mut out = vec![0.0; size * size];

        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| {
                laplacian_into(black_box(&field), &mut out, size, size);
                black_box(&out);
            })
        });
    }

    group.finish();
}

// ============================================================================
// Integration
// ============================================================================

fn bench_step(c: &mut Criterion) {
    let mut grid = GridState::new(256, 256).unwrap();
    rhizome_turing_rd::seed_initial(&mut grid, 10, 8, 42);
    let mut integrator = Integrator::new(&grid);
    let params = ReactionParams::default();

    c.bench_function("step_256x256", |b| {
        b.iter(|| black_box(integrator.step(&params, &mut grid)))
    });
}

fn bench_frame(c: &mut Criterion) {
    let config = Config::from_preset(Preset::Coral);
    let mut sim = Simulation::new(config, SeedPlan::default()).unwrap();

    c.bench_function("frame_400x400_8_steps", |b| {
        b.iter(|| black_box(sim.run_frame()))
    });
}

criterion_group!(benches, bench_laplacian, bench_step, bench_frame);
criterion_main!(benches);
