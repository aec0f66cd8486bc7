use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use octree_quant::OctreeQuantizer;

fn gradient(size: u32) -> image::RgbImage {
	image::RgbImage::from_fn(size, size, |x, y| {
		image::Rgb([
			(x * 255 / size) as u8,
			(y * 255 / size) as u8,
			((x ^ y) & 0xff) as u8,
		])
	})
}

fn octree_palette(c: &mut Criterion) {
	let img = gradient(256);
	let mut group = c.benchmark_group("octree_palette");
	group
		.sample_size(30)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));

	for &k in [16usize, 64, 256].iter() {
		group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
			b.iter(|| {
				let mut q = OctreeQuantizer::new();
				q.add_image(&img).unwrap();
				q.make_palette(k).unwrap()
			})
		});
	}
}

fn octree_remap(c: &mut Criterion) {
	let img = gradient(256);
	let mut q = OctreeQuantizer::new();
	q.add_image(&img).unwrap();
	let palette = q.make_palette(256).unwrap();
	c.bench_function("octree_remap", |b| b.iter(|| q.remap_image(&img, &palette).unwrap()));
}

criterion_group!(benches, octree_palette, octree_remap);
criterion_main!(benches);
