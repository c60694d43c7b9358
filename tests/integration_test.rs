//! Integration tests for the complete garment assessment pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Profile and size chart normalization
//! - Size recommendation properties (shared axes, monotonicity, idempotence)
//! - Color, body-shape and fabric verdicts
//! - Dominant color detection from image files, with and without a cache

use std::path::Path;

use fit_style::color::ColorFamily;
use fit_style::measurement::{cm_to_inches, parse_height};
use fit_style::sizing::size_labels;
use fit_style::suitability::{ColorVerdict, ComfortVerdict};
use fit_style::{
    assess_garment, assess_garment_with_image, evaluate_suitability, normalize_size_chart, recommend_size, Axis,
    BodyProfile, BodyShape, Category, ChartUnit, ColorProfile, DetectorConfig, DominantColorCache,
    DominantColorDetector, FitOptions, GarmentRecord, ImageSource, RawBodyProfile, Risk, SizeChartEntry, Status,
    StretchSpec, Verdict,
};
use image::{DynamicImage, Rgba, RgbaImage};
use serde_json::json;

fn chest_only_chart() -> Vec<SizeChartEntry> {
    [("S", 34.0), ("M", 36.0), ("L", 38.0), ("XL", 40.0)]
        .into_iter()
        .map(|(size, chest)| SizeChartEntry::new(size).with(Axis::Chest, chest))
        .collect()
}

fn top_with(chart: Vec<SizeChartEntry>) -> GarmentRecord {
    let mut garment = GarmentRecord::new(Category::UpperBody);
    garment.size_chart = chart;
    garment
}

/// Write a garment-on-background PNG and return its path.
fn write_garment_png(dir: &Path, name: &str, background: [u8; 4], garment: [u8; 4]) -> std::path::PathBuf {
    let img = RgbaImage::from_fn(96, 96, |x, y| {
        let inside = (20..76).contains(&x) && (16..84).contains(&y);
        Rgba(if inside { garment } else { background })
    });
    let path = dir.join(name);
    DynamicImage::ImageRgba8(img).save(&path).unwrap();
    path
}

// ============================================================================
// Measurement Normalization
// ============================================================================

#[test]
fn test_unit_conversion() {
    assert!((cm_to_inches(86.0) - 33.86).abs() < 0.01);
    assert_eq!(parse_height("5.4"), Some(64.0));
}

#[test]
fn test_raw_profile_feeds_recommendation() {
    let raw: RawBodyProfile = serde_json::from_value(json!({
        "height": "5'6\"",
        "waist": "71.12",
        "hipsIn": 38,
        "chest": 0
    }))
    .unwrap();
    let profile = raw.normalize();
    assert_eq!(profile.chest_in, None);
    assert!((profile.waist_in.unwrap() - 28.0).abs() < 1e-9);

    let mut garment = GarmentRecord::new(Category::LowerBody);
    garment.size_chart = normalize_size_chart(
        &json!({"waist": {"S": 27, "M": 29}, "hips": {"S": 37, "M": 39}}),
        ChartUnit::Inches,
    );
    let result = recommend_size(&profile, &garment, &FitOptions::default());
    assert_eq!(result.recommended_size.as_deref(), Some("M"));
}

// ============================================================================
// Size Chart Normalization
// ============================================================================

#[test]
fn test_size_label_round_trip() {
    let list = json!([
        {"size": "XS", "measurements": {"chest": 32}},
        {"size": "S", "measurements": {"chest": 34}},
        {"size": "M", "chest": "36"},
        {"size": "L", "measurements": {"bust": "38-40"}}
    ]);
    let chart = normalize_size_chart(&list, ChartUnit::Inches);
    assert_eq!(size_labels(&chart), vec!["XS", "S", "M", "L"]);
    assert_eq!(chart[3].get(Axis::Chest), Some(39.0));

    let by_axis = json!({"waist": {"32": 32, "30": 30, "34": 34}});
    let chart = normalize_size_chart(&by_axis, ChartUnit::Inches);
    assert_eq!(size_labels(&chart), vec!["32", "30", "34"]);
}

// ============================================================================
// Size Recommendation
// ============================================================================

#[test]
fn test_waist_hips_scenario() {
    let profile = BodyProfile {
        waist_in: Some(28.0),
        hips_in: Some(38.0),
        chest_in: Some(34.0),
        ..Default::default()
    };
    let mut garment = GarmentRecord::new(Category::LowerBody);
    garment.size_chart = normalize_size_chart(
        &json!([
            {"size": "S", "measurements": {"waist": 27, "hips": 37}},
            {"size": "M", "measurements": {"waist": 29, "hips": 39}}
        ]),
        ChartUnit::Inches,
    );

    let result = recommend_size(&profile, &garment, &FitOptions::default());
    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.recommended_size.as_deref(), Some("M"));
    assert_eq!(result.risk, Some(Risk::Low));
    assert!(result.insights.len() <= 5);
}

#[test]
fn test_no_body_measurements() {
    let garment = top_with(chest_only_chart());
    let result = recommend_size(&BodyProfile::default(), &garment, &FitOptions::default());

    assert_eq!(result.status, Status::InsufficientData);
    assert!(result.missing.missing_body);
    assert!(!result.missing.missing_garment);
    assert!(result.recommended_size.is_none());
}

#[test]
fn test_shared_axis_always_ok() {
    let options = FitOptions::default();
    let axes = [Axis::Chest, Axis::Waist, Axis::Hips, Axis::Shoulder, Axis::Inseam];
    for (i, axis) in axes.iter().enumerate() {
        for body in [20.0, 31.5, 44.0, 70.0] {
            let mut profile = BodyProfile::default();
            match axis {
                Axis::Chest => profile.chest_in = Some(body),
                Axis::Waist => profile.waist_in = Some(body),
                Axis::Hips => profile.hips_in = Some(body),
                Axis::Shoulder => profile.shoulder_in = Some(body),
                _ => profile.inseam_in = Some(body),
            }
            let chart = vec![
                SizeChartEntry::new("A").with(*axis, 30.0 + i as f64),
                SizeChartEntry::new("B").with(Axis::Rise, 11.0),
            ];
            for category in [Category::UpperBody, Category::LowerBody, Category::Dresses] {
                let mut garment = GarmentRecord::new(category);
                garment.size_chart = chart.clone();
                let result = recommend_size(&profile, &garment, &options);
                assert_eq!(result.status, Status::Ok, "{axis} {body} {category:?}");
                assert!((0.0..=1.0).contains(&result.confidence));
            }
        }
    }
}

#[test]
fn test_monotone_in_chest() {
    let garment = top_with(chest_only_chart());
    let options = FitOptions::default();
    let order = size_labels(&garment.size_chart);

    let mut previous = 0;
    for step in 0..=48 {
        let chest = 28.0 + step as f64 * 0.5;
        let profile = BodyProfile {
            chest_in: Some(chest),
            ..Default::default()
        };
        let result = recommend_size(&profile, &garment, &options);
        let size = result.recommended_size.unwrap();
        let index = order.iter().position(|s| *s == size).unwrap();
        assert!(index >= previous, "chest {chest} flipped down to {size}");
        previous = index;
    }
}

/// Walk one body axis upward and return the chart index picked at each step.
fn picks_along(garment: &GarmentRecord, base: &BodyProfile, axis: Axis, from: f64, to: f64) -> Vec<(f64, usize)> {
    let order = size_labels(&garment.size_chart);
    let mut picks = Vec::new();
    let mut value = from;
    while value <= to {
        let mut profile = base.clone();
        match axis {
            Axis::Chest => profile.chest_in = Some(value),
            Axis::Waist => profile.waist_in = Some(value),
            _ => profile.hips_in = Some(value),
        }
        let size = recommend_size(&profile, garment, &FitOptions::default())
            .recommended_size
            .unwrap();
        picks.push((value, order.iter().position(|s| *s == size).unwrap()));
        value += 0.5;
    }
    picks
}

fn assert_never_smaller(picks: &[(f64, usize)], context: &str) {
    for pair in picks.windows(2) {
        assert!(
            pair[1].1 >= pair[0].1,
            "{context}: {} -> {} moved from index {} to {}",
            pair[0].0,
            pair[1].0,
            pair[0].1,
            pair[1].1
        );
    }
}

#[test]
fn test_monotone_on_multi_axis_chart() {
    // Chest passes S while S is too small at the waist: M must hold
    let two_sizes = top_with(vec![
        SizeChartEntry::new("S").with(Axis::Chest, 36.0).with(Axis::Waist, 29.0),
        SizeChartEntry::new("M").with(Axis::Chest, 38.0).with(Axis::Waist, 31.0),
    ]);
    let waist_30 = BodyProfile {
        waist_in: Some(30.0),
        ..Default::default()
    };
    let picks = picks_along(&two_sizes, &waist_30, Axis::Chest, 28.0, 44.0);
    assert!(picks.iter().all(|(_, index)| *index == 1));

    let tops = top_with(
        [("S", 36.0, 29.0), ("M", 38.0, 31.0), ("L", 40.0, 33.0), ("XL", 42.0, 35.0)]
            .into_iter()
            .map(|(size, chest, waist)| SizeChartEntry::new(size).with(Axis::Chest, chest).with(Axis::Waist, waist))
            .collect(),
    );
    for waist in [24.0, 27.0, 30.0, 33.0, 36.0] {
        let base = BodyProfile {
            waist_in: Some(waist),
            ..Default::default()
        };
        let picks = picks_along(&tops, &base, Axis::Chest, 28.0, 48.0);
        assert_never_smaller(&picks, &format!("tops, waist {waist}"));
    }

    let mut jeans = GarmentRecord::new(Category::LowerBody);
    jeans.size_chart = normalize_size_chart(
        &json!({"waist": {"28": 28, "30": 30, "32": 32, "34": 34}, "hips": {"28": 37, "30": 39, "32": 41, "34": 43}}),
        ChartUnit::Inches,
    );
    for waist in [26.0, 28.0, 29.5, 31.0, 33.0, 36.0] {
        let base = BodyProfile {
            waist_in: Some(waist),
            ..Default::default()
        };
        let picks = picks_along(&jeans, &base, Axis::Hips, 32.0, 48.0);
        assert_never_smaller(&picks, &format!("jeans hips, waist {waist}"));
    }
    for hips in [34.0, 38.0, 40.0, 44.0] {
        let base = BodyProfile {
            hips_in: Some(hips),
            ..Default::default()
        };
        let picks = picks_along(&jeans, &base, Axis::Waist, 24.0, 38.0);
        assert_never_smaller(&picks, &format!("jeans waist, hips {hips}"));
    }
}

#[test]
fn test_recommendation_is_idempotent() {
    let profile = BodyProfile {
        chest_in: Some(37.0),
        waist_in: Some(31.0),
        shoulder_in: Some(17.5),
        ..Default::default()
    };
    let mut garment = GarmentRecord::new(Category::UpperBody);
    garment.size_chart = normalize_size_chart(
        &json!({
            "M": {"chest": 38, "waist": 33, "shoulder": 17},
            "L": {"chest": 40, "waist": 35, "shoulder": 18}
        }),
        ChartUnit::Inches,
    );
    let options = FitOptions::default();

    let first = recommend_size(&profile, &garment, &options);
    let second = recommend_size(&profile, &garment, &options);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_stretch_widens_negative_ease() {
    let profile = BodyProfile {
        waist_in: Some(30.0),
        ..Default::default()
    };
    let mut garment = GarmentRecord::new(Category::LowerBody);
    garment.size_chart = vec![SizeChartEntry::new("M").with(Axis::Waist, 29.0)];

    garment.fabric_stretch = Some(StretchSpec::Flag(true));
    let stretchy = recommend_size(&profile, &garment, &FitOptions::default());
    assert!(stretchy.scores[0].comparisons[0].passes);
    assert_eq!(stretchy.risk, Some(Risk::Low));

    garment.fabric_stretch = Some(StretchSpec::Flag(false));
    let rigid = recommend_size(&profile, &garment, &FitOptions::default());
    assert!(!rigid.scores[0].comparisons[0].passes);
    assert_eq!(rigid.risk, Some(Risk::High));
}

// ============================================================================
// Suitability
// ============================================================================

#[test]
fn test_avoid_color_is_risky() {
    let profile = ColorProfile {
        best_colors: vec!["navy".into(), "emerald".into(), "cream".into(), "burgundy".into()],
        avoid_colors: vec!["mustard".into()],
        ..Default::default()
    };
    let mut garment = top_with(chest_only_chart());
    garment.primary_color = Some("Mustard Yellow".into());

    let report = evaluate_suitability(&profile, BodyShape::Hourglass, &garment, None);
    assert_eq!(report.color.verdict, Some(Verdict::Color(ColorVerdict::Risky)));
    assert!(!report.color.reasons.is_empty());
    assert!(report.color.alternatives.len() <= 3);
    assert!(!report.color.alternatives.contains(&"mustard".to_string()));
}

#[test]
fn test_full_assessment() {
    let profile = BodyProfile {
        waist_in: Some(30.0),
        hips_in: Some(40.0),
        body_shape: BodyShape::Pear,
        undertone: Some(fit_style::Undertone::Warm),
        ..Default::default()
    };
    let mut garment = GarmentRecord::new(Category::LowerBody);
    garment.fit_type = fit_style::FitType::Snug;
    garment.material = Some("100% cotton denim".into());
    garment.color_hex = Some("#B7410E".into());
    garment.size_chart = normalize_size_chart(
        &json!({"waist": {"28": 72, "30": 77, "32": 82}, "hips": {"28": 97, "30": 102, "32": 107}}),
        ChartUnit::Centimeters,
    );

    let assessment = assess_garment(&profile, None, &garment, &FitOptions::default());
    assert_eq!(assessment.fit.status, Status::Ok);
    assert_eq!(assessment.color.verdict, Some(Verdict::Color(ColorVerdict::Great)));
    assert_eq!(
        assessment.body.verdict,
        Some(Verdict::BodyShape(fit_style::suitability::ShapeVerdict::Risky))
    );
    assert_eq!(
        assessment.fabric.result.verdict,
        Some(Verdict::Fabric(ComfortVerdict::Risky))
    );
}

// ============================================================================
// Dominant Color Detection
// ============================================================================

#[tokio::test]
async fn test_detect_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_garment_png(dir.path(), "navy.png", [255, 255, 255, 255], [0, 0, 128, 255]);

    let detector = DominantColorDetector::default();
    let color = detector.detect(&ImageSource::Path(path)).await.unwrap();
    assert_eq!(color.family, ColorFamily::Navy);
    assert!(color.confidence > 0.5);
}

#[tokio::test]
async fn test_detect_cached_and_invalidate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_garment_png(dir.path(), "teal.png", [240, 240, 240, 255], [0, 128, 128, 255]);
    let source = ImageSource::Path(path);

    let detector = DominantColorDetector::default();
    let cache = DominantColorCache::new();
    let first = detector.detect_cached(&source, &cache).await;
    let second = detector.detect_cached(&source, &cache).await;
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);

    assert!(cache.invalidate(&source.key()));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_unreachable_image_degrades() {
    let config = DetectorConfig {
        fetch_timeout_ms: 500,
        ..Default::default()
    };
    let detector = DominantColorDetector::new(config);
    let cache = DominantColorCache::new();
    let source = ImageSource::from_reference("http://127.0.0.1:9/shirt.png");

    assert!(detector.detect_cached(&source, &cache).await.is_none());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_stalled_image_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let detector = DominantColorDetector::new(DetectorConfig {
        fetch_timeout_ms: 300,
        ..Default::default()
    });
    let cache = DominantColorCache::new();
    let source = ImageSource::from_reference(&format!("http://{addr}/shirt.png"));

    let started = std::time::Instant::now();
    assert!(detector.detect_cached(&source, &cache).await.is_none());
    let elapsed = started.elapsed();
    assert!(elapsed >= std::time::Duration::from_millis(250), "gave up after {elapsed:?}");
    assert!(elapsed < std::time::Duration::from_secs(3), "took {elapsed:?}");
    assert!(cache.is_empty());
    server.abort();
}

#[tokio::test]
async fn test_assessment_uses_photo_when_catalog_color_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_garment_png(dir.path(), "red.png", [255, 255, 255, 255], [220, 20, 60, 255]);

    let profile = BodyProfile {
        chest_in: Some(35.0),
        season: Some(fit_style::Season::Winter),
        ..Default::default()
    };
    let mut garment = top_with(chest_only_chart());
    garment.image = Some(path.display().to_string());

    let detector = DominantColorDetector::default();
    let assessment =
        assess_garment_with_image(&profile, None, &garment, &FitOptions::default(), &detector, None).await;
    let detected = assessment.detected_color.unwrap();
    assert_eq!(detected.family, ColorFamily::Red);
    assert_eq!(assessment.color.verdict, Some(Verdict::Color(ColorVerdict::Great)));

    // Catalog color present: the photo is not consulted
    garment.color_hex = Some("#000080".into());
    let assessment =
        assess_garment_with_image(&profile, None, &garment, &FitOptions::default(), &detector, None).await;
    assert!(assessment.detected_color.is_none());
}
