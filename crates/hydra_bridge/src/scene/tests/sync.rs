//! Render-side sync pass over the in-memory index

use super::Session;
use crate::foundation::math::{Transform, Vec3};
use crate::host::{HostLight, HostMaterial, HostMesh, HostObject};
use crate::scene::tokens;

#[test]
fn test_first_sync_pulls_everything() {
    let mut session = Session::new();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    let cube = session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(2.0)).with_material(red));
    let sun = session.scene.add_object(HostObject::light("Sun", HostLight::sun(3.0, 0.2)));
    session.populate();

    let stats = session.index.sync_all(&session.delegate, 4);
    assert_eq!(stats.prims, 3);
    assert!(stats.workers >= 1 && stats.workers <= 3);
    assert!(!session.index.has_dirty());

    let mesh = session.index.synced(&session.id(cube)).and_then(|prim| prim.as_mesh()).unwrap();
    assert_eq!(mesh.points.len(), 8);
    assert_eq!(mesh.topology.face_count(), 12);
    assert!(mesh.visible);
    assert_eq!(mesh.material, Some(session.delegate.material_id(red)));

    let light = session.index.synced(&session.id(sun)).and_then(|prim| prim.as_light()).unwrap();
    assert!(light.params.contains(tokens::ANGLE));
    assert!(!light.params.contains(tokens::RADIUS));

    let material = session
        .index
        .synced(&session.delegate.material_id(red))
        .and_then(|prim| prim.as_material())
        .unwrap();
    assert!(material.resource.is_some());
}

#[test]
fn test_transform_edit_pulls_only_transform() {
    let mut session = Session::new();
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(2.0)));
    session.scene.add_object(HostObject::mesh("Other", HostMesh::cube(2.0)));
    session.populate();
    session.index.sync_all(&session.delegate, 2);

    let moved = Transform::from_position(Vec3::new(0.0, 3.0, 0.0)).to_matrix();
    session.scene.object_mut(cube).unwrap().matrix_world = moved;
    session.scene.tag_object(cube, false, true, false);
    session.populate();

    let stats = session.index.sync_all(&session.delegate, 2);
    assert_eq!(stats.prims, 1);
    assert_eq!(stats.pulls, 1);

    let mesh = session.index.synced(&session.id(cube)).and_then(|prim| prim.as_mesh()).unwrap();
    assert_eq!(mesh.transform, moved);
    assert_eq!(mesh.points.len(), 8);
}

#[test]
fn test_clean_index_syncs_nothing() {
    let mut session = Session::new();
    session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)));
    session.populate();
    session.index.sync_all(&session.delegate, 1);

    let stats = session.index.sync_all(&session.delegate, 1);
    assert_eq!(stats.prims, 0);
    assert_eq!(stats.pulls, 0);
}

#[test]
fn test_removed_prims_leave_the_cache() {
    let mut session = Session::new();
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)));
    session.populate();
    session.index.sync_all(&session.delegate, 1);
    assert!(session.index.synced(&session.id(cube)).is_some());

    session.scene.remove_object(cube);
    session.populate();
    session.index.sync_all(&session.delegate, 1);
    assert!(session.index.synced(&session.id(cube)).is_none());
}

#[test]
fn test_many_prims_spread_over_workers() {
    let mut session = Session::new();
    for i in 0..16 {
        session.scene.add_object(
            HostObject::mesh(format!("Cube{i}"), HostMesh::cube(1.0))
                .with_transform(Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)).to_matrix()),
        );
    }
    session.populate();

    let stats = session.index.sync_all(&session.delegate, 4);
    assert_eq!(stats.prims, 16);
    assert_eq!(stats.workers, 4);
    assert_eq!(session.index.synced_prims().count(), 16);
    for (id, prim) in session.index.synced_prims() {
        let mesh = prim.as_mesh().unwrap();
        assert_eq!(mesh.transform, session.delegate.get_transform(id));
    }
}
