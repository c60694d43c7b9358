//! Dominant garment color extraction
//!
//! Extracts a representative color from a garment photo with:
//! - Downsampling to a small fixed budget of samples
//! - Removal of transparent, near-white and border-background samples
//! - Deterministic k-means in Lab (farthest-point seeding, no randomness)
//! - Confidence from cluster mass share and tightness
//!
//! A manual mode returns one pixel verbatim for user-picked coordinates.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use palette::Lab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::cache::DominantColorCache;
use crate::color::naming::{nearest_named, ColorFamily};
use crate::color::ColorConverter;
use crate::config::DetectorConfig;
use crate::constants::detector;
use crate::image_loader::{load_image, ImageSource};
use crate::{EngineError, Result};

/// Representative color of a garment image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantColor {
    /// Measured color, "#RRGGBB"
    pub hex: String,
    /// Nearest palette name
    pub name: String,
    pub family: ColorFamily,
    pub rgb: [u8; 3],
    /// 0.0 = guess, 1.0 = certain
    pub confidence: f32,
}

impl DominantColor {
    fn from_rgb(rgb: [u8; 3], confidence: f32) -> Self {
        let named = nearest_named(rgb);
        Self {
            hex: ColorConverter::new().rgb_to_hex(rgb),
            name: named.name.to_string(),
            family: named.family,
            rgb,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    rgb: [u8; 3],
    lab: Lab,
}

#[derive(Debug, Clone)]
struct Cluster {
    center: Lab,
    members: Vec<usize>,
}

/// Dominant color detector
pub struct DominantColorDetector {
    config: DetectorConfig,
    converter: ColorConverter,
    client: reqwest::Client,
}

impl Default for DominantColorDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl DominantColorDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Share an HTTP client with the rest of the application.
    pub fn with_client(config: DetectorConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            converter: ColorConverter::new(),
            client,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Dominant color of a decoded image.
    ///
    /// Returns `None` only when the image has no opaque pixels.
    pub fn detect_in_image(&self, image: &DynamicImage) -> Option<DominantColor> {
        let sampled = self.downsample(image);
        let opaque = self.opaque_samples(&sampled);
        if opaque.is_empty() {
            debug!("no opaque samples in garment image");
            return None;
        }

        let border = self.uniform_border(&sampled);
        let garment: Vec<Sample> = opaque
            .iter()
            .copied()
            .filter(|s| !self.is_near_white(s.lab))
            .filter(|s| {
                border.map_or(true, |b| self.converter.delta_e(s.lab, b) >= self.config.background_delta_e)
            })
            .collect();

        // White garment on white background: cluster everything, trust it less
        let (samples, fallback) = if garment.is_empty() {
            debug!(samples = opaque.len(), "every sample looked like background");
            (opaque, true)
        } else {
            (garment, false)
        };

        let clusters = self.cluster(&samples);
        let winner = clusters
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.members.len().cmp(&b.members.len()).then(ib.cmp(ia)))
            .map(|(_, c)| c)?;

        let rgb = mean_rgb(&samples, &winner.members);
        let mass_share = winner.members.len() as f32 / samples.len() as f32;
        let spread = self.mean_delta_e(&samples, winner);
        let tightness = 1.0 - (spread / detector::TIGHTNESS_SCALE_DELTA_E).clamp(0.0, 1.0);

        let mut confidence = detector::MASS_WEIGHT * mass_share + detector::TIGHTNESS_WEIGHT * tightness;
        if fallback {
            confidence = confidence.min(detector::FALLBACK_CONFIDENCE_CAP);
        }

        let color = DominantColor::from_rgb(rgb, confidence);
        debug!(
            hex = %color.hex,
            name = %color.name,
            mass_share,
            tightness,
            confidence = color.confidence,
            "dominant color"
        );
        Some(color)
    }

    /// Fetch, decode and analyze an image. Degrades to `None` on any failure.
    pub async fn detect(&self, source: &ImageSource) -> Option<DominantColor> {
        match self.load(source).await {
            Ok(image) => {
                let color = self.detect_in_image(&image);
                if color.is_none() {
                    warn!(reference = %source.key(), "garment image has no opaque pixels");
                }
                color
            }
            Err(e) => {
                warn!(reference = %source.key(), error = %e, "dominant color unavailable");
                None
            }
        }
    }

    /// [`detect`](Self::detect) memoized by image reference.
    pub async fn detect_cached(
        &self,
        source: &ImageSource,
        cache: &DominantColorCache,
    ) -> Option<DominantColor> {
        cache.get_or_detect(&source.key(), || self.detect(source)).await
    }

    /// Color of one user-picked pixel in natural-image coordinates.
    pub async fn pick_pixel_at(&self, source: &ImageSource, x: u32, y: u32) -> Option<DominantColor> {
        match self.load(source).await {
            Ok(image) => pick_pixel(&image, x, y),
            Err(e) => {
                warn!(reference = %source.key(), error = %e, "picked pixel unavailable");
                None
            }
        }
    }

    async fn load(&self, source: &ImageSource) -> Result<DynamicImage> {
        let limit = self.config.fetch_timeout();
        tokio::time::timeout(limit, load_image(source, &self.client))
            .await
            .map_err(|_| EngineError::FetchTimeout {
                reference: source.key(),
                limit,
            })?
    }

    fn downsample(&self, image: &DynamicImage) -> RgbaImage {
        let max_side = self.config.sample_dimension.max(1);
        if image.width() <= max_side && image.height() <= max_side {
            image.to_rgba8()
        } else {
            image.resize(max_side, max_side, FilterType::Triangle).to_rgba8()
        }
    }

    fn opaque_samples(&self, image: &RgbaImage) -> Vec<Sample> {
        image
            .pixels()
            .filter(|p| p.0[3] >= self.config.min_alpha)
            .map(|p| self.sample([p.0[0], p.0[1], p.0[2]]))
            .collect()
    }

    fn sample(&self, rgb: [u8; 3]) -> Sample {
        Sample {
            rgb,
            lab: self.converter.rgb_to_lab(rgb),
        }
    }

    fn is_near_white(&self, lab: Lab) -> bool {
        lab.l > self.config.white_min_lightness && self.converter.chroma(lab) < self.config.white_max_chroma
    }

    /// Median border color, when the border is close to one flat color.
    fn uniform_border(&self, image: &RgbaImage) -> Option<Lab> {
        let (w, h) = image.dimensions();
        if w < 3 || h < 3 {
            return None;
        }

        let border: Vec<Lab> = image
            .enumerate_pixels()
            .filter(|(x, y, p)| (*x == 0 || *y == 0 || *x == w - 1 || *y == h - 1) && p.0[3] >= self.config.min_alpha)
            .map(|(_, _, p)| self.converter.rgb_to_lab([p.0[0], p.0[1], p.0[2]]))
            .collect();
        if border.is_empty() {
            return None;
        }

        let median = Lab::new(
            median(border.iter().map(|c| c.l).collect()),
            median(border.iter().map(|c| c.a).collect()),
            median(border.iter().map(|c| c.b).collect()),
        );
        let spread = border.iter().map(|c| self.converter.delta_e(*c, median)).sum::<f32>() / border.len() as f32;

        (spread < detector::BORDER_UNIFORMITY_DELTA_E).then_some(median)
    }

    /// Deterministic k-means over Lab samples.
    fn cluster(&self, samples: &[Sample]) -> Vec<Cluster> {
        let mut centers = self.seed_centers(samples);
        let mut assignment = vec![0usize; samples.len()];

        for iteration in 0..self.config.max_iterations.max(1) {
            for (slot, sample) in assignment.iter_mut().zip(samples) {
                *slot = self.nearest_center(&centers, sample.lab);
            }

            let mut shift = 0.0f32;
            for (index, center) in centers.iter_mut().enumerate() {
                let members: Vec<Lab> = assignment
                    .iter()
                    .zip(samples)
                    .filter(|(slot, _)| **slot == index)
                    .map(|(_, s)| s.lab)
                    .collect();
                if members.is_empty() {
                    continue;
                }
                let updated = mean_lab(&members);
                shift = shift.max(self.converter.delta_e(*center, updated));
                *center = updated;
            }

            if shift < detector::CONVERGENCE_DELTA_E {
                debug!(iterations = iteration + 1, "k-means converged");
                break;
            }
        }

        for (slot, sample) in assignment.iter_mut().zip(samples) {
            *slot = self.nearest_center(&centers, sample.lab);
        }

        centers
            .into_iter()
            .enumerate()
            .map(|(index, center)| Cluster {
                center,
                members: assignment
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| **slot == index)
                    .map(|(i, _)| i)
                    .collect(),
            })
            .collect()
    }

    /// First seed is the median-lightness sample; each next seed is the
    /// sample farthest from every seed chosen so far.
    fn seed_centers(&self, samples: &[Sample]) -> Vec<Lab> {
        let mut by_lightness: Vec<usize> = (0..samples.len()).collect();
        by_lightness.sort_by(|a, b| samples[*a].lab.l.total_cmp(&samples[*b].lab.l));
        let Some(&first) = by_lightness.get(by_lightness.len() / 2) else {
            return Vec::new();
        };

        let mut centers = vec![samples[first].lab];
        while centers.len() < self.config.cluster_count.max(1) {
            let farthest = samples
                .iter()
                .map(|s| {
                    centers
                        .iter()
                        .map(|c| self.converter.delta_e(s.lab, *c))
                        .fold(f32::INFINITY, f32::min)
                })
                .enumerate()
                .fold((0usize, 0.0f32), |best, (i, d)| if d > best.1 { (i, d) } else { best });

            // Every remaining sample coincides with a seed
            if farthest.1 <= f32::EPSILON {
                break;
            }
            centers.push(samples[farthest.0].lab);
        }
        centers
    }

    fn nearest_center(&self, centers: &[Lab], lab: Lab) -> usize {
        centers
            .iter()
            .enumerate()
            .fold((0usize, f32::INFINITY), |best, (i, c)| {
                let d = self.converter.delta_e(lab, *c);
                if d < best.1 {
                    (i, d)
                } else {
                    best
                }
            })
            .0
    }

    fn mean_delta_e(&self, samples: &[Sample], cluster: &Cluster) -> f32 {
        if cluster.members.is_empty() {
            return 0.0;
        }
        let total: f32 = cluster
            .members
            .iter()
            .map(|&i| self.converter.delta_e(samples[i].lab, cluster.center))
            .sum();
        total / cluster.members.len() as f32
    }
}

/// Exact color of one pixel; `None` outside the image.
pub fn pick_pixel(image: &DynamicImage, x: u32, y: u32) -> Option<DominantColor> {
    if x >= image.width() || y >= image.height() {
        return None;
    }
    let [r, g, b, _] = image.get_pixel(x, y).0;
    Some(DominantColor::from_rgb([r, g, b], 1.0))
}

fn median(mut values: Vec<f32>) -> f32 {
    values.sort_by(f32::total_cmp);
    values.get(values.len() / 2).copied().unwrap_or(0.0)
}

fn mean_lab(colors: &[Lab]) -> Lab {
    let n = colors.len().max(1) as f32;
    let (l, a, b) = colors
        .iter()
        .fold((0.0, 0.0, 0.0), |(l, a, b), c| (l + c.l, a + c.a, b + c.b));
    Lab::new(l / n, a / n, b / n)
}

fn mean_rgb(samples: &[Sample], members: &[usize]) -> [u8; 3] {
    let n = members.len().max(1) as u64;
    let mut sums = [0u64; 3];
    for &i in members {
        for (sum, channel) in sums.iter_mut().zip(samples[i].rgb) {
            *sum += u64::from(channel);
        }
    }
    sums.map(|sum| ((sum + n / 2) / n) as u8)
}
