//! Bridge demo application
//!
//! Builds a small host scene, renders it through the scene delegate, then
//! applies a few edits and re-renders after each one so the incremental
//! sync can be followed in the log (`RUST_LOG=debug` shows every dirty mark).
//!
//! Usage: `bridge_demo [config.toml|config.ron] [output_dir]`

mod exporter;
mod raster;

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

use hydra_bridge::core::{BridgeConfig, Config, ConfigError};
use hydra_bridge::engine::{Engine, EngineError, RenderResult, SyncReport};
use hydra_bridge::foundation::logging;
use hydra_bridge::foundation::math::{Quat, Transform, Vec3};
use hydra_bridge::host::{
    HostCamera, HostLight, HostMaterial, HostMesh, HostObject, HostScene, ViewPerspective,
    ViewportState,
};
use thiserror::Error;

use exporter::{MtlxExporter, Palette};
use raster::Rasterizer;

const DEFAULT_CONFIG: &str = "bridge.toml";
const DEFAULT_OUTPUT: &str = "bridge_output";

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render produced no combined pass")]
    MissingPass,
}

/// Handles to the objects the demo edits
struct DemoScene {
    scene: HostScene,
    cube: hydra_bridge::foundation::collections::ObjectKey,
    red: hydra_bridge::foundation::collections::MaterialKey,
}

fn look_at(eye: Vec3, target: Vec3) -> Transform {
    // Cameras look down their local -Z axis
    let rotation = Quat::face_towards(&(eye - target), &Vec3::y());
    Transform::from_position_rotation(eye, rotation)
}

fn build_scene(palette: &Palette) -> DemoScene {
    let mut scene = HostScene::new();

    let red_material = HostMaterial::new("Red").with_base_color([0.8, 0.1, 0.05, 1.0]);
    let grey_material = HostMaterial::new("Floor").with_base_color([0.5, 0.5, 0.55, 1.0]);
    {
        let mut palette = palette.borrow_mut();
        palette.insert(red_material.name.clone(), red_material.base_color);
        palette.insert(grey_material.name.clone(), grey_material.base_color);
    }
    let red = scene.add_material(red_material);
    let grey = scene.add_material(grey_material);

    let cube = scene.add_object(
        HostObject::mesh("Cube", HostMesh::cube(2.0))
            .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)).to_matrix())
            .with_material(red),
    );
    scene.add_object(HostObject::mesh("Floor", HostMesh::plane(10.0)).with_material(grey));

    let sun_rotation = Quat::face_towards(&Vec3::new(0.4, 1.0, 0.6), &Vec3::y());
    scene.add_object(
        HostObject::light("Sun", HostLight::sun(3.0, 0.01)).with_transform(
            Transform::from_position_rotation(Vec3::new(0.0, 10.0, 0.0), sun_rotation).to_matrix(),
        ),
    );

    let camera = scene.add_object(
        HostObject::camera("Camera", HostCamera::default())
            .with_transform(look_at(Vec3::new(7.0, 5.0, 9.0), Vec3::zeros()).to_matrix()),
    );
    scene.set_active_camera(camera);

    DemoScene { scene, cube, red }
}

fn log_report(step: &str, report: &SyncReport) {
    let populate = &report.populate;
    log::info!(
        "{step}: {} inserted, {} updated, {} patched, {} removed, {} skipped; \
         materials +{} ~{} -{} ({} exported); pulled {} prims on {} workers",
        populate.inserted,
        populate.updated,
        populate.patched,
        populate.removed,
        populate.skipped,
        populate.materials_inserted,
        populate.materials_updated,
        populate.materials_removed,
        populate.materials_exported,
        report.sync.prims,
        report.sync.workers,
    );
}

fn save(result: &RenderResult, path: &Path) -> Result<(), DemoError> {
    let buffer = result.combined().ok_or(DemoError::MissingPass)?;
    let image = image::RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.to_rgba8())
        .ok_or(DemoError::MissingPass)?;
    image.save(path)?;
    log::info!(
        "Saved {} ({} samples{})",
        path.display(),
        result.samples_completed,
        if result.stopped { ", stopped" } else { "" }
    );
    Ok(())
}

fn sync_and_render(
    engine: &mut Engine,
    scene: &mut HostScene,
    step: &str,
    output: &Path,
) -> Result<(), DemoError> {
    let updates = scene.take_updates();
    let report = engine.sync(scene, &updates);
    log_report(step, &report);

    let result = engine.render(scene, &AtomicBool::new(false))?;
    save(&result, &output.join(format!("{step}.png")))
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => BridgeConfig::load_from_file(path)?,
        None => BridgeConfig::load_or_default(DEFAULT_CONFIG)?,
    };
    logging::init_from_config(&config.engine);

    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));
    std::fs::create_dir_all(&output)?;

    let palette: Palette = Rc::default();
    let DemoScene {
        mut scene,
        cube,
        red,
    } = build_scene(&palette);

    let mut engine = Engine::final_render(
        &config,
        Box::new(Rasterizer::new()),
        Box::new(MtlxExporter::new(&output, Rc::clone(&palette))),
    )?;
    sync_and_render(&mut engine, &mut scene, "00_initial", &output)?;

    // Transform-only edit
    if let Some(object) = scene.object_mut(cube) {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.6);
        object.matrix_world =
            Transform::from_position_rotation(Vec3::new(-1.5, 1.0, 1.0), rotation).to_matrix();
    }
    scene.tag_object(cube, false, true, false);
    sync_and_render(&mut engine, &mut scene, "01_moved", &output)?;

    // Material edit
    let teal = [0.05, 0.6, 0.55, 1.0];
    if let Some(material) = scene.material_mut(red) {
        material.base_color = teal;
        palette.borrow_mut().insert(material.name.clone(), teal);
    }
    scene.tag_material(red);
    sync_and_render(&mut engine, &mut scene, "02_recoloured", &output)?;

    // Interactive view of the same scene before the cube goes away
    let viewport = ViewportState {
        perspective: ViewPerspective::Camera,
        camera_zoom: -10.0,
        width: config.render.width / 2,
        height: config.render.height / 2,
        ..ViewportState::default()
    };
    let mut viewport_engine = Engine::viewport(
        &config,
        viewport.clone(),
        Box::new(Rasterizer::new()),
        Box::new(MtlxExporter::new(&output, Rc::clone(&palette))),
    )?;
    let report = viewport_engine.sync(&scene, &[]);
    log_report("viewport", &report);
    let result = viewport_engine.view_draw(&scene, &viewport)?;
    save(&result, &output.join("viewport.png"))?;

    // Deletion
    scene.remove_object(cube);
    sync_and_render(&mut engine, &mut scene, "03_deleted", &output)?;

    log::info!(
        "Session ended with {} rprims and {} sprims in the index",
        engine.index().rprim_count(),
        engine.index().sprim_count()
    );
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        // The logger may not be up if config loading failed
        eprintln!("bridge_demo: {error}");
        std::process::exit(1);
    }
}
