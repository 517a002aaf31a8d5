use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxtrace_math::{Aabb3, Point3, Vec3};
use voxtrace_raytrace::{AnyHitDecision, ClosestHitDecision, PrimitiveScene, Ray, Tracer};

fn voxel_column(n: usize) -> PrimitiveScene {
    let mut scene = PrimitiveScene::new();
    for i in 0..n {
        let z = 2.0 + i as f32 * 1.5;
        scene
            .add_voxel(Aabb3::cube(Point3::new(0.0, 0.0, z), 0.5))
            .expect("valid voxel");
    }
    scene
}

fn rays(n: usize) -> Vec<Ray> {
    (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 - 0.5;
            Ray::new(Point3::new(a * 0.8, -a * 0.8, 0.0), Vec3::z())
        })
        .collect()
}

fn bench_policies(c: &mut Criterion) {
    let scene = voxel_column(64);
    let tracer = Tracer::<usize>::new().with_any_hit_handler(|_, _, seen: &mut usize| {
        *seen += 1;
        if *seen % 3 == 0 {
            AnyHitDecision::IgnoreAndContinue
        } else {
            AnyHitDecision::CommitAndContinue
        }
    });
    let originals = rays(256);

    let mut group = c.benchmark_group("trace_ray");
    for (name, policy) in [
        ("commit_and_continue", AnyHitDecision::CommitAndContinue),
        ("commit_and_return", AnyHitDecision::CommitAndReturn),
        ("defer_to_handler", AnyHitDecision::DeferToHandler),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut seen = 0usize;
                for original in &originals {
                    let mut ray = *original;
                    tracer.trace_ray(
                        black_box(&scene),
                        &mut ray,
                        policy,
                        ClosestHitDecision::ReturnOnly,
                        &mut seen,
                    );
                    black_box(ray.max_t);
                }
            })
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let scene = voxel_column(64);
    let tracer = Tracer::<()>::new();
    let originals = rays(4096);

    c.bench_function("trace_rays_parallel", |b| {
        b.iter(|| {
            let mut batch = originals.clone();
            let mut payloads = vec![(); batch.len()];
            let stats = tracer.trace_rays(
                black_box(&scene),
                &mut batch,
                AnyHitDecision::CommitAndContinue,
                ClosestHitDecision::ReturnOnly,
                &mut payloads,
            )
            .unwrap();
            black_box(stats);
        })
    });
}

criterion_group!(benches, bench_policies, bench_batch);
criterion_main!(benches);
