//! Headless rendering integration tests.
//!
//! These need a GPU adapter (real or software fallback). Without one, engine
//! creation fails and the test returns early.

use neuroscope::*;
use pollster::FutureExt;

fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

#[test]
fn headless_render_tests() {
    let options = Options::default();
    let model = generate_neuron_with(&options, &mut StdRandom::seeded(5)).unwrap();

    let pixels = match render_to_image(&model, &options, 320, 240) {
        Ok(pixels) => pixels,
        Err(e) => {
            eprintln!("Skipping headless tests: no GPU adapter available ({e})");
            return;
        }
    };

    // --- Buffer shape ---
    assert_eq!(pixels.len(), 320 * 240 * 4);

    // --- The soma covers the center, the corner shows the fogged background ---
    let center = pixel(&pixels, 320, 160, 120);
    let corner = pixel(&pixels, 320, 0, 0);
    assert_ne!(center, corner, "soma should differ from the background");

    // --- Same model, same frame ---
    let again = render_to_image(&model, &options, 320, 240).unwrap();
    assert_eq!(pixels, again);

    // --- File output ---
    let path = std::env::temp_dir().join(format!("neuroscope_headless_{}.png", std::process::id()));
    render_to_file(&model, &options, &path, 160, 120).unwrap();
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);

    // --- Zero-sized requests fail before touching the GPU ---
    assert!(render_to_image(&model, &options, 0, 10).is_err());
}

#[test]
fn scene_release_tests() {
    let options = Options::default();
    let model = generate_neuron_with(&options, &mut StdRandom::seeded(9)).unwrap();

    let mut engine = match RenderEngine::new_headless(64, 48, &options.viewer).block_on() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Skipping scene release tests: no GPU adapter available ({e})");
            return;
        }
    };
    assert_eq!(engine.mesh_count(), 0);

    // --- Soma and 43 tubes, plus one instanced particle mesh ---
    upload_model(&mut engine, &model);
    assert_eq!(model.surfaces().count(), 44);
    assert_eq!(engine.mesh_count(), 44 + 1);
    assert!(engine.capture_frame().is_ok());

    // --- Teardown drops every mesh, and the engine still renders ---
    engine.release_scene();
    assert_eq!(engine.mesh_count(), 0);
    assert!(engine.capture_frame().is_ok());

    // --- Releasing twice is harmless ---
    engine.release_scene();
    assert_eq!(engine.mesh_count(), 0);
}
