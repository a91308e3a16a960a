//! Initial populate, identity and idempotence

use approx::assert_relative_eq;

use super::Session;
use crate::core::DelegateConfig;
use crate::foundation::math::{Transform, Vec3};
use crate::host::{HostCamera, HostLight, HostMaterial, HostMesh, HostObject};
use crate::scene::{tokens, PrimType, Value};

#[test]
fn test_initial_populate_inserts_meshes_and_lights() {
    let mut session = Session::new();
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(2.0)));
    let lamp = session.scene.add_object(HostObject::light("Lamp", HostLight::point(100.0, 0.1)));
    let camera = session.scene.add_object(HostObject::camera("Camera", HostCamera::default()));
    let empty = session.scene.add_object(HostObject::empty("Empty"));
    let hidden = session
        .scene
        .add_object(HostObject::mesh("Hidden", HostMesh::plane(1.0)).hidden());

    assert!(!session.delegate.is_populated());
    let stats = session.populate();
    assert!(session.delegate.is_populated());

    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.skipped, 2);
    assert_eq!(session.delegate.object_count(), 2);
    assert_eq!(session.index.prim_type(&session.id(cube)), Some(PrimType::Mesh));
    assert_eq!(session.index.prim_type(&session.id(lamp)), Some(PrimType::SphereLight));
    for key in [camera, empty, hidden] {
        assert!(session.delegate.object(&session.id(key)).is_none());
        assert!(!session.index.contains(&session.id(key)));
    }
}

#[test]
fn test_scene_ids_are_stable_and_distinct() {
    let mut session = Session::new();
    let a = session.scene.add_object(HostObject::mesh("A", HostMesh::cube(1.0)));
    let b = session.scene.add_object(HostObject::mesh("B", HostMesh::cube(1.0)));
    session.populate();

    assert_eq!(session.id(a), session.id(a));
    assert_ne!(session.id(a), session.id(b));
    assert!(session.id(a).as_str().starts_with("/blender_delegate/O_"));

    let mut ids: Vec<_> = session.delegate.objects().map(|(id, _)| id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 2);
}

#[test]
fn test_configured_root_path_scopes_ids() {
    let mut session = Session::with_config(&DelegateConfig::new().with_root_path("/hd"));
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)));
    session.populate();
    assert!(session.id(cube).as_str().starts_with("/hd/O_"));
}

#[test]
fn test_points_round_trip() {
    let mut session = Session::new();
    let mesh = HostMesh::cube(3.0);
    let expected = mesh.vertices.clone();
    let cube = session.scene.add_object(HostObject::mesh("Cube", mesh));
    session.populate();

    let points = session.delegate.get(&session.id(cube), tokens::POINTS);
    assert_eq!(points, Some(Value::Vec3Array(expected)));
}

#[test]
fn test_cube_and_sun_end_to_end() {
    let mut session = Session::new();
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(2.0)));
    let sun = session.scene.add_object(HostObject::light("Sun", HostLight::sun(3.0, 0.2)));
    session.populate();

    let topology = session.delegate.get_mesh_topology(&session.id(cube));
    assert_eq!(topology.face_vertex_counts.len(), 12);
    assert!(topology.face_vertex_counts.iter().all(|&count| count == 3));
    assert_eq!(topology.face_vertex_indices.len(), 36);

    let angle = session
        .delegate
        .get_light_param_value(&session.id(sun), tokens::ANGLE)
        .and_then(|value| value.as_float())
        .unwrap();
    assert_relative_eq!(angle, 0.2 * 180.0 / std::f32::consts::PI, epsilon = 1e-5);
    assert_eq!(session.index.prim_type(&session.id(sun)), Some(PrimType::DistantLight));
}

#[test]
fn test_degenerate_mesh_never_enters_table() {
    let mut session = Session::new();
    let empty_mesh = session.scene.add_object(HostObject::mesh("Nothing", HostMesh::default()));
    let stats = session.populate();

    assert_eq!(stats.skipped, 1);
    assert!(session.delegate.object(&session.id(empty_mesh)).is_none());
    assert!(!session.index.contains(&session.id(empty_mesh)));
    assert_eq!(session.delegate.get(&session.id(empty_mesh), tokens::POINTS), None);
}

#[test]
fn test_repopulate_without_changes_is_idempotent() {
    let mut session = Session::new();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)).with_material(red));
    session.scene.add_object(HostObject::light("Sun", HostLight::sun(1.0, 0.1)));
    session.populate();

    let before = session.delegate.clone();
    let mutations = session.index.mutation_count();
    let exports = session.exporter.calls();
    assert_eq!(exports, 1);

    let stats = session.populate();
    assert!(stats.is_empty());
    assert_eq!(session.delegate, before);
    assert_eq!(session.index.mutation_count(), mutations);
    assert_eq!(session.exporter.calls(), exports);
}

#[test]
fn test_materials_resolve_on_populate() {
    let mut session = Session::new();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    let cube = session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)).with_material(red));
    let stats = session.populate();

    assert_eq!(stats.materials_inserted, 1);
    let material_id = session.delegate.get_material_id(&session.id(cube)).unwrap();
    assert_eq!(material_id, session.delegate.material_id(red));
    assert_eq!(session.index.prim_type(&material_id), Some(PrimType::Material));
    assert_eq!(
        session.delegate.get_material_resource(&material_id),
        Some(std::path::PathBuf::from("/materials/Red.mtlx"))
    );
}

#[test]
fn test_failed_material_export_degrades_gracefully() {
    let mut session = Session::new();
    session.exporter = super::CountingExporter::failing();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    let cube = session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)).with_material(red));
    let stats = session.populate();

    assert_eq!(stats.materials_exported, 1);
    let material_id = session.delegate.get_material_id(&session.id(cube)).unwrap();
    assert!(session.delegate.material(&material_id).is_some());
    assert_eq!(session.delegate.get_material_resource(&material_id), None);
}

#[test]
fn test_material_export_can_be_disabled() {
    let mut session = Session::with_config(&DelegateConfig::new().with_material_export(false));
    let red = session.scene.add_material(HostMaterial::new("Red"));
    session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)).with_material(red));
    session.populate();

    assert_eq!(session.exporter.calls(), 0);
    assert_eq!(session.delegate.material_count(), 1);
}

#[test]
fn test_lights_carry_no_material() {
    let mut session = Session::new();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    let lamp = session
        .scene
        .add_object(HostObject::light("Lamp", HostLight::point(10.0, 0.1)).with_material(red));
    session.populate();

    assert_eq!(session.delegate.get_material_id(&session.id(lamp)), None);
    assert_eq!(session.delegate.material_count(), 0);
}

#[test]
fn test_unknown_ids_return_defaults() {
    let mut session = Session::new();
    let cube = session.scene.add_object(
        HostObject::mesh("Cube", HostMesh::cube(1.0))
            .with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).to_matrix()),
    );
    session.populate();
    let ghost = crate::scene::SceneId::new("/blender_delegate/O_FFFFFFFFFFFFFFFF");

    assert_eq!(session.delegate.get_transform(&ghost), crate::foundation::math::Mat4::identity());
    assert!(session.delegate.get_mesh_topology(&ghost).is_empty());
    assert_eq!(session.delegate.get(&ghost, tokens::POINTS), None);
    assert_eq!(session.delegate.get_material_id(&ghost), None);
    assert!(!session.delegate.get_visible(&ghost));
    assert!(session.delegate.get_extent(&ghost).is_empty());

    // Known id, missing token
    assert_eq!(session.delegate.get(&session.id(cube), tokens::ANGLE), None);
    assert_eq!(session.delegate.get_light_param_value(&session.id(cube), tokens::POINTS), None);
    assert!(session.delegate.get_visible(&session.id(cube)));
}
