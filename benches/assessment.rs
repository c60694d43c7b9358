use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fit_style::{
    assess_garment, detect_stretch, recommend_size, Axis, BodyProfile, BodyShape, Category, DominantColorDetector,
    FitOptions, GarmentRecord, Season, SizeChartEntry,
};
use image::{DynamicImage, Rgba, RgbaImage};

fn sample_garment() -> GarmentRecord {
    let mut garment = GarmentRecord::new(Category::UpperBody);
    garment.material = Some("95% cotton, 5% elastane".to_string());
    garment.primary_color = Some("navy".to_string());
    garment.size_chart = ["XS", "S", "M", "L", "XL", "XXL"]
        .iter()
        .enumerate()
        .map(|(i, size)| {
            let step = i as f64 * 2.0;
            SizeChartEntry::new(*size)
                .with(Axis::Chest, 32.0 + step)
                .with(Axis::Waist, 26.0 + step)
                .with(Axis::Shoulder, 15.5 + i as f64 * 0.5)
                .with(Axis::Sleeve, 31.0 + i as f64 * 0.5)
        })
        .collect();
    garment
}

fn sample_profile() -> BodyProfile {
    BodyProfile {
        chest_in: Some(37.0),
        waist_in: Some(31.5),
        shoulder_in: Some(17.0),
        body_shape: BodyShape::Rectangle,
        season: Some(Season::Summer),
        ..Default::default()
    }
}

fn benchmark_sizing(c: &mut Criterion) {
    let profile = sample_profile();
    let garment = sample_garment();
    let options = FitOptions::default();

    c.bench_function("recommend_size", |b| {
        b.iter(|| recommend_size(black_box(&profile), black_box(&garment), &options))
    });

    c.bench_function("assess_garment", |b| {
        b.iter(|| assess_garment(black_box(&profile), None, black_box(&garment), &options))
    });

    c.bench_function("detect_stretch", |b| {
        b.iter(|| detect_stretch(black_box("Shell: 62% polyester, 33% viscose, 5% elastane; lining 100% cotton")))
    });
}

fn benchmark_dominant_color(c: &mut Criterion) {
    let img = RgbaImage::from_fn(800, 1000, |x, y| {
        let inside = (150..650).contains(&x) && (120..900).contains(&y);
        if inside {
            Rgba([(20 + x % 7) as u8, 40, (120 + y % 11) as u8, 255])
        } else {
            Rgba([250, 250, 250, 255])
        }
    });
    let image = DynamicImage::ImageRgba8(img);
    let detector = DominantColorDetector::default();

    c.bench_function("detect_in_image_800x1000", |b| {
        b.iter(|| detector.detect_in_image(black_box(&image)))
    });
}

criterion_group!(benches, benchmark_sizing, benchmark_dominant_color);
criterion_main!(benches);
