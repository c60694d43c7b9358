//! Command-line interface for fit_style
//!
//! Reads a JSON request with a profile and a garment, prints the full
//! assessment as JSON to stdout and a short summary to stderr.
//!
//! ```json
//! {
//!   "profile": {"waist": "71", "hipsIn": 38, "bodyShape": "pear", "season": "autumn"},
//!   "colorProfile": {"bestColors": ["rust", "olive"]},
//!   "garment": {"category": "lower_body", "fitType": "snug", "material": "98% cotton, 2% elastane"},
//!   "sizeChart": {"waist": {"S": 70, "M": 75}, "hips": {"S": 95, "M": 100}},
//!   "chartUnit": "centimeters"
//! }
//! ```

use fit_style::{
    assess_garment_with_image, ChartUnit, ColorProfile, DominantColorCache, DominantColorDetector, EngineConfig,
    GarmentAssessment, GarmentRecord, RawBodyProfile,
};
use serde::Deserialize;
use serde_json::Value;
use std::{env, fs, path::Path, process};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    profile: RawBodyProfile,
    #[serde(default)]
    color_profile: Option<ColorProfile>,
    garment: GarmentRecord,
    /// Raw chart in any accepted shape; replaces `garment.sizeChart`
    #[serde(default)]
    size_chart: Option<Value>,
    #[serde(default)]
    chart_unit: ChartUnit,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fit_style=info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut request_path = None;
    let mut use_image = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config needs a file path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--no-image" => use_image = false,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if request_path.is_none() {
                    request_path = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple request files provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(request_path) = request_path else {
        print_help(&args[0]);
        process::exit(1);
    };

    let config = match config_path {
        Some(path) => match EngineConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Configuration failed: {}", error);
                if error.is_recoverable() {
                    eprintln!("Suggestion: {}", error.user_message());
                }
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let request = match read_request(Path::new(&request_path)) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    let mut garment = request.garment;
    if let Some(raw) = &request.size_chart {
        garment = garment.with_raw_size_chart(raw, request.chart_unit);
    }
    if !use_image {
        garment.image = None;
    }

    let profile = request.profile.normalize();
    let detector = DominantColorDetector::new(config.detector.clone());
    let cache = DominantColorCache::new();
    let assessment = assess_garment_with_image(
        &profile,
        request.color_profile.as_ref(),
        &garment,
        &config.fit,
        &detector,
        Some(&cache),
    )
    .await;

    print_assessment(&assessment);
}

fn read_request(path: &Path) -> Result<Request, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid request '{}': {}", path.display(), e))
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <request.json>", program_name);
    eprintln!();
    eprintln!("Recommend a size and rate color, body-shape and fabric suitability.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    Engine configuration (JSON, partial allowed)");
    eprintln!("  --no-image       Never fetch the garment photo");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=fit_style=debug for detailed logs.");
}

fn print_assessment(assessment: &GarmentAssessment) {
    match serde_json::to_string_pretty(assessment) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing assessment: {}", e);
            process::exit(1);
        }
    }

    let verdict = |result: &fit_style::SuitabilityResult| match &result.verdict {
        Some(verdict) => format!("{:?}", verdict),
        None => format!("insufficient data {:?}", result.missing),
    };

    eprintln!();
    eprintln!("Assessment Summary:");
    match &assessment.fit.recommended_size {
        Some(size) => eprintln!(
            "  Size: {} (backup {}, risk {}, confidence {:.0}%)",
            size,
            assessment.fit.backup_size.as_deref().unwrap_or("none"),
            assessment.fit.risk.map(|r| r.as_str()).unwrap_or("unknown"),
            assessment.fit.confidence * 100.0
        ),
        None => eprintln!("  Size: insufficient data"),
    }
    eprintln!("  Color: {}", verdict(&assessment.color));
    eprintln!("  Body shape: {}", verdict(&assessment.body));
    eprintln!("  Fabric: {}", verdict(&assessment.fabric.result));
    if let Some(detected) = &assessment.detected_color {
        eprintln!(
            "  Photo color: {} {} ({:.0}% confidence)",
            detected.name,
            detected.hex,
            detected.confidence * 100.0
        );
    }
}
