/// Benchmark suite for the rasterization pipeline
/// Covers the full mesh pass plus the hot-path primitives it is built from.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3, Vec4};
use raster_engine::rendering::clipping::{clip_triangle, ClipVertex, Frustum};
use raster_engine::{
    Camera, DepthBuffer, DirectionalLight, EdgePrecision, Framebuffer, Mesh, Rasterizer, Texture,
};

fn bench_render_cube(c: &mut Criterion) {
    c.bench_function("render_cube_textured", |b| {
        let mut mesh = Mesh::cube();
        mesh.add_rotation(Vec3::new(0.5, 0.8, 0.0));
        let texture = Texture::checkerboard(64, 64, 8, 0xFFE8E8E8, 0xFF505058);
        let camera = Camera::new(Vec3::new(0.0, 0.0, -4.0), 1280.0 / 720.0);
        let light = DirectionalLight::default();
        let rasterizer = Rasterizer::new();

        let mut framebuffer = Framebuffer::new(1280, 720);
        let mut depth_buffer = DepthBuffer::new(1280, 720);

        b.iter(|| {
            framebuffer.clear(0xFF181820);
            depth_buffer.clear();
            rasterizer.render_mesh(
                black_box(&mesh),
                &texture,
                &camera,
                &light,
                &mut framebuffer,
                &mut depth_buffer,
            );
        });
    });
}

fn bench_fill_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_triangle");

    for size in [32usize, 128, 512] {
        let extent = size + 16;
        let s = size as f32;
        let vertices = [
            Vec4::new(8.0, 8.0, 0.5, 2.0),
            Vec4::new(8.0 + s, 8.0, 0.5, 2.0),
            Vec4::new(8.0, 8.0 + s, 0.5, 2.0),
        ];
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let intensities = [1.0f32, 0.8, 0.6];
        let texture = Texture::checkerboard(64, 64, 8, 0xFFFFFFFF, 0xFF404040);

        for (label, precision) in [
            ("float", EdgePrecision::Float),
            ("fixed", EdgePrecision::Fixed),
        ] {
            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                let mut rasterizer = Rasterizer::new();
                rasterizer.precision = precision;
                let mut framebuffer = Framebuffer::new(extent, extent);
                let mut depth_buffer = DepthBuffer::new(extent, extent);

                b.iter(|| {
                    depth_buffer.clear();
                    rasterizer.draw_textured_triangle(
                        &mut framebuffer,
                        &mut depth_buffer,
                        black_box(&vertices),
                        &uvs,
                        &intensities,
                        &texture,
                    );
                });
            });
        }
    }

    group.finish();
}

fn bench_clip_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip_triangle");
    let frustum = Frustum::perspective(60f32.to_radians(), 16.0 / 9.0, 0.2, 110.0);

    let fully_inside = [
        ClipVertex::new(Vec3::new(-1.0, -1.0, 10.0), Vec2::new(0.0, 0.0), 1.0),
        ClipVertex::new(Vec3::new(1.0, -1.0, 10.0), Vec2::new(1.0, 0.0), 1.0),
        ClipVertex::new(Vec3::new(0.0, 1.0, 10.0), Vec2::new(0.5, 1.0), 1.0),
    ];
    // Crosses the near plane and one side plane; produces a fan.
    let straddling = [
        ClipVertex::new(Vec3::new(-6.0, -1.0, 0.05), Vec2::new(0.0, 0.0), 1.0),
        ClipVertex::new(Vec3::new(4.0, -1.0, 8.0), Vec2::new(1.0, 0.0), 1.0),
        ClipVertex::new(Vec3::new(0.0, 2.0, 4.0), Vec2::new(0.5, 1.0), 1.0),
    ];

    group.bench_function("fully_inside", |b| {
        b.iter(|| clip_triangle(black_box(&frustum), black_box(&fully_inside)));
    });
    group.bench_function("straddling", |b| {
        b.iter(|| clip_triangle(black_box(&frustum), black_box(&straddling)));
    });

    group.finish();
}

fn bench_framebuffer_clear(c: &mut Criterion) {
    c.bench_function("framebuffer_clear", |b| {
        let mut framebuffer = Framebuffer::new(1280, 720);

        b.iter(|| {
            framebuffer.clear(black_box(0xFF181820));
        });
    });
}

fn bench_framebuffer_set_pixel(c: &mut Criterion) {
    c.bench_function("framebuffer_set_pixel", |b| {
        let mut framebuffer = Framebuffer::new(1280, 720);
        let color = 0xFF00FF00;

        b.iter(|| {
            black_box(framebuffer.set_pixel(100, 100, color));
        });
    });
}

fn bench_framebuffer_set_pixel_unchecked(c: &mut Criterion) {
    c.bench_function("framebuffer_set_pixel_unchecked", |b| {
        let mut framebuffer = Framebuffer::new(1280, 720);
        let color = 0xFF00FF00;

        b.iter(|| unsafe {
            black_box(framebuffer.set_pixel_unchecked(100, 100, color));
        });
    });
}

fn bench_depth_clear(c: &mut Criterion) {
    c.bench_function("depth_clear", |b| {
        let mut depth_buffer = DepthBuffer::new(1280, 720);

        b.iter(|| {
            depth_buffer.clear();
        });
    });
}

criterion_group!(
    benches,
    bench_render_cube,
    bench_fill_triangle,
    bench_clip_triangle,
    bench_framebuffer_clear,
    bench_framebuffer_set_pixel,
    bench_framebuffer_set_pixel_unchecked,
    bench_depth_clear
);
criterion_main!(benches);
