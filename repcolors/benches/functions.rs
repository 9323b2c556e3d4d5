use criterion::{
	black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion,
	SamplingMode,
};
use image::{Rgb, RgbImage};
use repcolors::{ColorCounts, ColorVector, Kmeans};
use std::time::Duration;

/// A deterministic image with smooth gradients and a few flat blocks of color
#[allow(clippy::cast_possible_truncation)]
fn test_image(width: u32, height: u32) -> RgbImage {
	RgbImage::from_fn(width, height, |x, y| {
		if (x / 32 + y / 32) % 5 == 0 {
			Rgb([220, 40, 60])
		} else {
			Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, ((x + y) % 256) as u8])
		}
	})
}

fn create_group<'a>(c: &'a mut Criterion, name: &'a str) -> BenchmarkGroup<'a, WallTime> {
	let mut group = c.benchmark_group(name);
	group
		.sample_size(30)
		.noise_threshold(0.05)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));
	group
}

fn preprocessing(c: &mut Criterion) {
	let mut group = create_group(c, "preprocessing");

	for (width, height) in [(160, 90), (480, 270)] {
		let image = test_image(width, height);
		group.bench_with_input(BenchmarkId::from_parameter(format!("{width}x{height}")), &image, |b, image| {
			b.iter(|| ColorCounts::from_rgb_image(black_box(image)).color_vectors());
		});
	}
}

fn kmeans(c: &mut Criterion) {
	let mut group = create_group(c, "kmeans");

	let points = ColorCounts::from_rgb_image(&test_image(160, 90)).color_vectors();

	fn bench(name: &str, group: &mut BenchmarkGroup<WallTime>, points: &[ColorVector], k: usize, convergence: f64) {
		group.bench_with_input(BenchmarkId::from_parameter(name), points, |b, points| {
			b.iter(|| {
				Kmeans::new(black_box(k))
					.with_convergence_threshold(black_box(convergence))
					.with_seed(black_box(0))
					.fit(points)
			});
		});
	}

	group.measurement_time(Duration::from_secs(2));
	bench("default", &mut group, &points, 5, 10.0);
	bench("low k", &mut group, &points, 3, 10.0);
	bench("high convergence", &mut group, &points, 5, 20.0);

	group.measurement_time(Duration::from_secs(4));
	bench("high k", &mut group, &points, 16, 10.0);
	bench("low convergence", &mut group, &points, 5, 1.0);
}

fn recolor(c: &mut Criterion) {
	let mut group = create_group(c, "recolor");

	let image = test_image(160, 90);
	let points = ColorCounts::from_rgb_image(&image).color_vectors();
	let classifier = Kmeans::new(5)
		.with_seed(0)
		.fit(&points)
		.expect("enough points for 5 clusters")
		.classifier();

	group.bench_function("160x90", |b| {
		b.iter(|| repcolors::recolor(black_box(&image), &classifier));
	});
}

criterion_group!(benches, preprocessing, kmeans, recolor);
criterion_main!(benches);
