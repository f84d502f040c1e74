use std::{error::Error, path::PathBuf, time::Instant};

use clap::{Parser, ValueEnum};
use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use orb_extractor::orb_core::{LappingArea, OrbConfig};
use orb_extractor::{gray_view, BruteForceMatcher, Extraction, ExtractorBuilder, Interpolation, KeypointClass};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InterpolationArg {
    Nearest,
    Linear,
    Cubic,
    Area,
}

impl From<InterpolationArg> for Interpolation {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Nearest => Interpolation::Nearest,
            InterpolationArg::Linear => Interpolation::Linear,
            InterpolationArg::Cubic => Interpolation::Cubic,
            InterpolationArg::Area => Interpolation::Area,
        }
    }
}

/// Extract ORB keypoints and descriptors from a grayscale image.
#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-scale ORB feature extraction")]
struct Args {
    /// Input image; colour images are converted to grayscale
    image: PathBuf,

    /// Mask image of the same size; keypoints are kept where it is non-zero
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Stereo overlap column range in pixels
    #[arg(long, num_args = 2, value_names = ["X0", "X1"], allow_negative_numbers = true)]
    lapping: Option<Vec<i32>>,

    /// JSON or TOML configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    features: Option<usize>,

    #[arg(long)]
    levels: Option<usize>,

    #[arg(long)]
    scale_factor: Option<f32>,

    /// Initial FAST threshold
    #[arg(long)]
    ini_th: Option<u8>,

    /// Fallback FAST threshold for low-texture tiles
    #[arg(long)]
    min_th: Option<u8>,

    #[arg(long, value_enum)]
    interpolation: Option<InterpolationArg>,

    /// Report angle -1 instead of computing orientation
    #[arg(long)]
    no_orientation: bool,

    #[arg(long)]
    threads: Option<usize>,

    /// Write the image with keypoints drawn on it
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write keypoints and descriptors as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Second image to match against with cross-checked Hamming matching
    #[arg(long = "match")]
    match_image: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct KeypointRecord {
    x: f32,
    y: f32,
    size: f32,
    angle: f32,
    response: f32,
    octave: usize,
    class: i32,
    descriptor: String,
}

#[derive(Debug, Serialize)]
struct MatchSummary {
    image: String,
    keypoints: usize,
    matches: usize,
    mean_distance: f32,
}

#[derive(Debug, Serialize)]
struct Report {
    image: String,
    width: u32,
    height: u32,
    config: OrbConfig,
    levels_used: usize,
    overlap_keypoints: usize,
    keypoints: Vec<KeypointRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matching: Option<MatchSummary>,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    log::info!("{}", config.summary());
    let extractor = ExtractorBuilder::from_config(config.clone()).build()?;

    let img = load_gray(&args.image)?;
    let mask = args.mask.as_deref().map(load_gray).transpose()?;
    let lapping = match args.lapping.as_deref() {
        Some([x0, x1]) => LappingArea::new(*x0, *x1),
        _ => LappingArea::NONE,
    };

    let start = Instant::now();
    let mask_view = mask.as_ref().map(gray_view).transpose()?;
    let extraction = extractor.extract(gray_view(&img)?, mask_view, lapping)?;
    let elapsed = start.elapsed();

    println!(
        "{}: {} keypoints ({} in overlap) over {} levels in {:.2?}",
        args.image.display(),
        extraction.len(),
        extraction.overlap_count(),
        extraction.levels_used,
        elapsed
    );

    let matching = match &args.match_image {
        Some(path) => Some(match_against(&extractor, &extraction, path)?),
        None => None,
    };
    if let Some(summary) = &matching {
        println!(
            "{}: {} keypoints, {} cross-checked matches, mean distance {:.1}",
            summary.image, summary.keypoints, summary.matches, summary.mean_distance
        );
    }

    if let Some(path) = &args.output {
        draw_keypoints(&img, &extraction).save(path)?;
        println!("Saved keypoint image as {}", path.display());
    }

    if let Some(path) = &args.json {
        let report = Report {
            image: args.image.display().to_string(),
            width: img.width(),
            height: img.height(),
            config,
            levels_used: extraction.levels_used,
            overlap_keypoints: extraction.overlap_count(),
            keypoints: keypoint_records(&extraction),
            matching,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("Saved report as {}", path.display());
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(args: &Args) -> Result<OrbConfig, Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => OrbConfig::load(path)?,
        None => OrbConfig::default(),
    };

    let mut builder = ExtractorBuilder::from_config(base.clone());
    if let Some(n) = args.features {
        builder = builder.features(n);
    }
    if let Some(n) = args.levels {
        builder = builder.levels(n);
    }
    if let Some(s) = args.scale_factor {
        builder = builder.scale_factor(s);
    }
    if args.ini_th.is_some() || args.min_th.is_some() {
        builder = builder.fast_thresholds(
            args.ini_th.unwrap_or(base.ini_th_fast),
            args.min_th.unwrap_or(base.min_th_fast),
        );
    }
    if let Some(mode) = args.interpolation {
        builder = builder.interpolation(mode.into());
    }
    if args.no_orientation {
        builder = builder.orientation(false);
    }
    if let Some(n) = args.threads {
        builder = builder.threads(n);
    }

    let config = builder.to_config();
    config.validate()?;
    Ok(config)
}

fn load_gray(path: &std::path::Path) -> Result<GrayImage, Box<dyn Error>> {
    Ok(image::open(path)?.to_luma8())
}

fn match_against(
    extractor: &orb_extractor::OrbExtractor,
    extraction: &Extraction,
    path: &std::path::Path,
) -> Result<MatchSummary, Box<dyn Error>> {
    let other = load_gray(path)?;
    let other_extraction = extractor.extract_image(gray_view(&other)?)?;
    let matches = BruteForceMatcher::new(true).match_descriptors(&extraction.descriptors, &other_extraction.descriptors);

    let mean_distance = if matches.is_empty() {
        0.0
    } else {
        matches.iter().map(|m| m.distance as f32).sum::<f32>() / matches.len() as f32
    };
    Ok(MatchSummary {
        image: path.display().to_string(),
        keypoints: other_extraction.len(),
        matches: matches.len(),
        mean_distance,
    })
}

fn keypoint_records(extraction: &Extraction) -> Vec<KeypointRecord> {
    extraction
        .keypoints
        .iter()
        .zip(&extraction.descriptors)
        .map(|(kp, d)| KeypointRecord {
            x: kp.x,
            y: kp.y,
            size: kp.size,
            angle: kp.angle,
            response: kp.response,
            octave: kp.octave,
            class: kp.class.id(),
            descriptor: d.iter().map(|b| format!("{:02x}", b)).collect(),
        })
        .collect()
}

fn draw_keypoints(img: &GrayImage, extraction: &Extraction) -> RgbaImage {
    let mut output: RgbaImage = image::DynamicImage::ImageLuma8(img.clone()).into_rgba8();

    for kp in &extraction.keypoints {
        let color = match kp.class {
            KeypointClass::Mono => Rgba([255, 0, 0, 255]),
            KeypointClass::OverlapLeft => Rgba([0, 200, 0, 255]),
            KeypointClass::OverlapRight => Rgba([0, 80, 255, 255]),
        };
        let radius = (kp.size * 0.5).round().max(1.0);
        draw_hollow_circle_mut(&mut output, (kp.x.round() as i32, kp.y.round() as i32), radius as i32, color);

        if kp.has_orientation() {
            let (sin, cos) = kp.angle.to_radians().sin_cos();
            draw_line_segment_mut(
                &mut output,
                (kp.x, kp.y),
                (kp.x + radius * cos, kp.y + radius * sin),
                color,
            );
        }
    }
    output
}
