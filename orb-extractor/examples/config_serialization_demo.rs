use orb_extractor::orb_core::OrbConfig;
use orb_extractor::{gray_view, ExtractorBuilder, Interpolation};
use image::ImageReader;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔧 ORB Configuration Serialization Demo");
    println!("========================================\n");

    let img = ImageReader::open("lenna.png")?.decode()?.to_luma8();
    println!("📷 Image dimensions: {}x{}", img.width(), img.height());

    // Demo 1: Create configurations
    println!("\n📋 Demo 1: Creating Configurations");
    let tracking = ExtractorBuilder::new().features(500).levels(4).to_config();
    let mapping = ExtractorBuilder::new()
        .features(2000)
        .fast_thresholds(15, 5)
        .interpolation(Interpolation::Area)
        .to_config();
    println!("   • {}", tracking.summary());
    println!("   • {}", mapping.summary());

    // Demo 2: JSON and TOML
    println!("\n📄 Demo 2: Serialization");
    let json = tracking.to_json()?;
    println!("   Tracking config JSON:\n{}", json);
    println!("   Mapping config TOML:\n{}", mapping.to_toml()?);

    tracking.save("tracking_config.json")?;
    mapping.save("mapping_config.toml")?;
    println!("   ✅ Saved tracking_config.json and mapping_config.toml");

    // Demo 3: Load, validate and run
    println!("\n🔍 Demo 3: Loading and Extraction");
    for path in ["tracking_config.json", "mapping_config.toml"] {
        let loaded = OrbConfig::load(path)?;
        let extractor = ExtractorBuilder::from_config(loaded).build()?;

        let start = Instant::now();
        let extraction = extractor.extract_image(gray_view(&img)?)?;
        println!(
            "   • {}: {} keypoints over {} levels in {:.2?}",
            path,
            extraction.len(),
            extraction.levels_used,
            start.elapsed()
        );
    }

    // Demo 4: Invalid configurations are rejected on load
    println!("\n🚫 Demo 4: Validation");
    match OrbConfig::from_json(r#"{ "scale_factor": 0.8 }"#) {
        Ok(_) => println!("   unexpected: invalid config accepted"),
        Err(e) => println!("   rejected: {}", e),
    }

    std::fs::remove_file("tracking_config.json")?;
    std::fs::remove_file("mapping_config.toml")?;
    Ok(())
}
