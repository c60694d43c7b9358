//! Size recommendation
//!
//! Chart normalization, tolerance bands, per-size scoring and the final
//! selection of recommended and backup sizes.

pub mod chart;
pub mod scorer;
pub mod selector;
pub mod tolerance;

pub use chart::{chart_axes, normalize_size_chart, size_labels, Axis, ChartUnit, SizeChartEntry};
pub use scorer::{AxisComparison, FitScorer, SizeScore};
pub use selector::{recommend_size, FitResult, MissingData, Risk};
pub use tolerance::{band_for, ToleranceBand};
