//! Reconciliation against the visible set

use super::Session;
use crate::host::{HostLight, HostMaterial, HostMesh, HostObject};

#[test]
fn test_reconciliation_removes_orphans() {
    let mut session = Session::new();
    let shared = session.scene.add_material(HostMaterial::new("Shared"));
    let a = session
        .scene
        .add_object(HostObject::mesh("A", HostMesh::cube(1.0)).with_material(shared));
    let b = session
        .scene
        .add_object(HostObject::mesh("B", HostMesh::cube(1.0)).with_material(shared));
    session.populate();
    let material_id = session.delegate.material_id(shared);

    session.scene.object_mut(b).unwrap().visible = false;
    session.scene.tag_collection();
    let stats = session.populate();

    assert_eq!(stats.removed, 1);
    assert!(session.delegate.object(&session.id(b)).is_none());
    assert!(!session.index.contains(&session.id(b)));
    assert!(session.delegate.material(&material_id).is_some());
    assert!(session.index.contains(&material_id));

    session.scene.remove_object(a);
    let stats = session.populate();

    assert_eq!(stats.removed, 1);
    assert_eq!(stats.materials_removed, 1);
    assert_eq!(session.delegate.object_count(), 0);
    assert!(session.delegate.material(&material_id).is_none());
    assert!(!session.index.contains(&material_id));
}

#[test]
fn test_removal_needs_a_collection_update() {
    let mut session = Session::new();
    let cube = session.scene.add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)));
    session.populate();

    // Hiding without a collection update is not surfaced
    session.scene.object_mut(cube).unwrap().visible = false;
    session.scene.tag_object(cube, false, true, false);
    session.populate();
    assert!(session.delegate.object(&session.id(cube)).is_some());

    session.scene.tag_collection();
    session.populate();
    assert!(session.delegate.object(&session.id(cube)).is_none());
}

#[test]
fn test_unhidden_object_returns_on_reconciliation() {
    let mut session = Session::new();
    let lamp = session
        .scene
        .add_object(HostObject::light("Lamp", HostLight::point(10.0, 0.1)).hidden());
    session.populate();
    assert_eq!(session.delegate.object_count(), 0);

    session.scene.object_mut(lamp).unwrap().visible = true;
    session.scene.tag_collection();
    let stats = session.populate();

    assert_eq!(stats.inserted, 1);
    assert!(session.index.contains(&session.id(lamp)));
}

#[test]
fn test_rebound_material_is_dropped_when_unreferenced() {
    let mut session = Session::new();
    let red = session.scene.add_material(HostMaterial::new("Red"));
    let blue = session.scene.add_material(HostMaterial::new("Blue"));
    let cube = session
        .scene
        .add_object(HostObject::mesh("Cube", HostMesh::cube(1.0)).with_material(red));
    session.populate();

    session.scene.object_mut(cube).unwrap().material_slots = vec![Some(blue)];
    session.scene.tag_object(cube, false, false, true);
    session.scene.tag_collection();
    session.populate();

    assert!(session.delegate.material(&session.delegate.material_id(red)).is_none());
    assert!(session.delegate.material(&session.delegate.material_id(blue)).is_some());
    // Every binding resolves after the pass
    for (_, object) in session.delegate.objects() {
        if let Some(material) = object.material() {
            assert!(session.delegate.material(material).is_some());
        }
    }
}

#[test]
fn test_reused_slot_does_not_alias_removed_object() {
    let mut session = Session::new();
    let old = session.scene.add_object(HostObject::mesh("Old", HostMesh::cube(1.0)));
    session.populate();
    let old_id = session.id(old);

    session.scene.remove_object(old);
    let new = session.scene.add_object(HostObject::light("New", HostLight::sun(1.0, 0.0)));
    session.populate();

    assert_ne!(session.id(new), old_id);
    assert!(session.delegate.object(&old_id).is_none());
    assert!(!session.index.contains(&old_id));
    assert_eq!(session.delegate.object_count(), 1);
}
