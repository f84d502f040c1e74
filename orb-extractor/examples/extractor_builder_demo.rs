use orb_extractor::orb_core::LappingArea;
use orb_extractor::{gray_view, BruteForceMatcher, ExtractorBuilder, Interpolation};
use image::ImageReader;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏗️  ORB Extractor Builder Demo");
    println!("==============================\n");

    let img = ImageReader::open("lenna.png")?.decode()?.to_luma8();
    let view = gray_view(&img)?;
    println!("📷 Processing image: {}x{}", img.width(), img.height());

    // Demo 1: Interpolation modes
    println!("\n⚡ Demo 1: Pyramid Interpolation");
    for mode in [Interpolation::Nearest, Interpolation::Linear, Interpolation::Cubic, Interpolation::Area] {
        let extractor = ExtractorBuilder::new().interpolation(mode).build()?;
        let start = Instant::now();
        let extraction = extractor.extract_image(view)?;
        println!("   • {:?}: {} keypoints in {:.2?}", mode, extraction.len(), start.elapsed());
    }

    // Demo 2: Thread scaling
    println!("\n🧵 Demo 2: Thread Scaling");
    for threads in [1, 2, 4, 8] {
        let extractor = ExtractorBuilder::new().threads(threads).build()?;
        let start = Instant::now();
        let extraction = extractor.extract_image(view)?;
        println!("   • {} threads: {} keypoints in {:.2?}", threads, extraction.len(), start.elapsed());
    }

    // Demo 3: Lapping area
    println!("\n🔀 Demo 3: Stereo Lapping Area");
    let extractor = ExtractorBuilder::new().features(1500).build()?;
    let x0 = img.width() as i32 / 3;
    let x1 = 2 * img.width() as i32 / 3;
    let mut extraction = extractor.extract(view, None, LappingArea::new(x0, x1))?;
    let mono = extraction.partition_by_overlap();
    println!("   • overlap [{}, {}): {} mono keypoints, {} in overlap", x0, x1, mono, extraction.len() - mono);

    // Demo 4: Orientation and matching
    println!("\n🧭 Demo 4: Orientation Invariance");
    let oriented = ExtractorBuilder::new().build()?;
    let flipped = image::imageops::rotate180(&img);
    let a = oriented.extract_image(view)?;
    let b = oriented.extract_image(gray_view(&flipped)?)?;
    let matches = BruteForceMatcher::new(true)
        .with_max_distance(64)
        .match_descriptors(&a.descriptors, &b.descriptors);
    println!("   • rotated 180°: {} of {} keypoints matched", matches.len(), a.len());

    Ok(())
}
