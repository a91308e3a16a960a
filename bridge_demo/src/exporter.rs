//! MaterialX file exporter for the demo scene

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hydra_bridge::export::{MaterialExportError, MaterialExporter};

/// Base colours the exporter writes, keyed by material name
pub type Palette = Rc<RefCell<HashMap<String, [f32; 4]>>>;

/// Writes one `.mtlx` document per material into an output directory
pub struct MtlxExporter {
    directory: PathBuf,
    palette: Palette,
}

impl MtlxExporter {
    pub fn new(directory: impl Into<PathBuf>, palette: Palette) -> Self {
        Self {
            directory: directory.into(),
            palette,
        }
    }
}

impl MaterialExporter for MtlxExporter {
    fn export_material(&self, name: &str) -> Result<PathBuf, MaterialExportError> {
        let color = self
            .palette
            .borrow()
            .get(name)
            .copied()
            .ok_or_else(|| MaterialExportError::Failed {
                name: name.to_string(),
                reason: "material not in palette".to_string(),
            })?;

        let path = self.directory.join(format!("{name}.mtlx"));
        std::fs::write(&path, document(name, color))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn document(name: &str, color: [f32; 4]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "<?xml version=\"1.0\"?>");
    let _ = writeln!(out, "<materialx version=\"1.38\">");
    let _ = writeln!(
        out,
        "  <standard_surface name=\"SR_{name}\" type=\"surfaceshader\">"
    );
    let _ = writeln!(
        out,
        "    <input name=\"base_color\" type=\"color3\" value=\"{}, {}, {}\" />",
        color[0], color[1], color[2]
    );
    let _ = writeln!(
        out,
        "    <input name=\"opacity\" type=\"color3\" value=\"{0}, {0}, {0}\" />",
        color[3]
    );
    let _ = writeln!(out, "  </standard_surface>");
    let _ = writeln!(
        out,
        "  <surfacematerial name=\"{name}\" type=\"material\">"
    );
    let _ = writeln!(
        out,
        "    <input name=\"surfaceshader\" type=\"surfaceshader\" nodename=\"SR_{name}\" />"
    );
    let _ = writeln!(out, "  </surfacematerial>");
    let _ = writeln!(out, "</materialx>");
    out
}

/// Read the base colour back out of a document written by [`MtlxExporter`]
pub fn read_base_color(path: &Path) -> Option<[f32; 3]> {
    let contents = std::fs::read_to_string(path).ok()?;
    let line = contents.lines().find(|line| line.contains("name=\"base_color\""))?;
    let value = line.split("value=\"").nth(1)?.split('"').next()?;

    let mut channels = value.split(',').map(|c| c.trim().parse::<f32>());
    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_colour_reads_back() {
        let directory = std::env::temp_dir().join("bridge_demo_exporter_test");
        std::fs::create_dir_all(&directory).unwrap();
        let palette: Palette = Rc::default();
        palette
            .borrow_mut()
            .insert("Red".to_string(), [0.8, 0.1, 0.05, 1.0]);

        let exporter = MtlxExporter::new(&directory, palette);
        let path = exporter.export_material("Red").unwrap();
        assert_eq!(path, directory.join("Red.mtlx"));
        assert_eq!(read_base_color(&path), Some([0.8, 0.1, 0.05]));
    }

    #[test]
    fn test_unknown_material_fails() {
        let exporter = MtlxExporter::new(std::env::temp_dir(), Rc::default());
        assert!(matches!(
            exporter.export_material("Missing"),
            Err(MaterialExportError::Failed { .. })
        ));
    }
}
