//! Material resolution and the external material export service

use std::path::PathBuf;

use thiserror::Error;

use crate::foundation::collections::MaterialKey;
use crate::host::HostObject;

/// First non-empty material slot of `object`.
pub fn active_material(object: &HostObject) -> Option<MaterialKey> {
    object.material_slots.iter().find_map(|slot| *slot)
}

/// Errors reported by a [`MaterialExporter`]
#[derive(Error, Debug)]
pub enum MaterialExportError {
    /// The export service reported a failure
    #[error("material export failed for {name:?}: {reason}")]
    Failed {
        /// Material name
        name: String,
        /// Service-provided reason
        reason: String,
    },

    /// The service returned a path that is not usable
    #[error("material export for {name:?} returned invalid path {path:?}")]
    InvalidPath {
        /// Material name
        name: String,
        /// Returned path
        path: PathBuf,
    },

    /// IO error while writing the shading network
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous service that writes a material's shading network to a file.
///
/// Calls may be slow; the delegate caches the result per material version
/// and only calls again after a shading update.
pub trait MaterialExporter {
    /// Export the material named `name`, returning the written file
    fn export_material(&self, name: &str) -> Result<PathBuf, MaterialExportError>;
}

impl<F> MaterialExporter for F
where
    F: Fn(&str) -> Result<PathBuf, MaterialExportError>,
{
    fn export_material(&self, name: &str) -> Result<PathBuf, MaterialExportError> {
        self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;
    use crate::host::HostMesh;

    #[test]
    fn test_active_material_skips_empty_slots() {
        let mut materials: SlotMap<MaterialKey, ()> = SlotMap::with_key();
        let red = materials.insert(());
        let mut object = HostObject::mesh("Cube", HostMesh::cube(1.0));
        object.material_slots = vec![None, Some(red)];
        assert_eq!(active_material(&object), Some(red));
    }

    #[test]
    fn test_object_without_material() {
        let object = HostObject::mesh("Cube", HostMesh::cube(1.0));
        assert_eq!(active_material(&object), None);
    }

    #[test]
    fn test_closure_exporter() {
        let exporter = |name: &str| -> Result<PathBuf, MaterialExportError> {
            Ok(PathBuf::from(format!("/tmp/{name}.mtlx")))
        };
        let path = exporter.export_material("Red").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/Red.mtlx"));
    }
}
