//! glTF import into a [`RoomAsset`].
//!
//! Surface groups are keyed the way the web loader keys scene nodes, so the
//! names authored in the DCC tool (after the loader's sanitization) are the
//! names the binding table refers to:
//!
//! - whitespace becomes `_`, the characters `[ ] . : /` are dropped
//! - repeated names get `_1`, `_2`, ... suffixes in document order
//! - a mesh with several primitives yields `<node>_<i>` per primitive
//!
//! Embedded materials keep their authored names unchanged. When two share a
//! name the first one is kept; unnamed materials become `material_<index>`.
//!
//! Supports binary glTF (`.glb`) and JSON glTF with embedded `data:` URIs.
//! External file references are not supported.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{AssetError, AssetResult};

use super::types::*;

/// Parse a `.glb`/`.gltf` file fetched from `path`.
pub fn import_room_asset(data: &[u8], path: &str) -> AssetResult<RoomAsset> {
    let gltf = gltf::Gltf::from_slice(data).map_err(|source| AssetError::Gltf {
        path: path.to_string(),
        source,
    })?;
    let buffers = resolve_buffers(&gltf.document, gltf.blob, path)?;

    // Materials keep their authored names; the first of a duplicated name wins
    let material_names: Vec<String> = gltf
        .document
        .materials()
        .map(|mat| match mat.name() {
            Some(name) => name.to_string(),
            None => format!("material_{}", mat.index().unwrap_or_default()),
        })
        .collect();

    let mut materials: HashMap<String, Arc<EmbeddedMaterial>> = HashMap::new();
    for (mat, name) in gltf.document.materials().zip(&material_names) {
        if materials.contains_key(name) {
            log::warn!("Duplicate material name `{}` in {}, keeping the first", name, path);
            continue;
        }
        let pbr = mat.pbr_metallic_roughness();
        let material = EmbeddedMaterial {
            name: name.clone(),
            base_color_factor: pbr.base_color_factor(),
            emissive_factor: mat.emissive_factor(),
            metallic_factor: pbr.metallic_factor(),
            roughness_factor: pbr.roughness_factor(),
            double_sided: mat.double_sided(),
            has_base_color_texture: pbr.base_color_texture().is_some(),
        };
        materials.insert(name.clone(), Arc::new(material));
    }

    let mut names = UniqueNames::default();
    let mut groups = HashMap::new();

    for node in gltf.document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };

        let base = node
            .name()
            .or_else(|| mesh.name())
            .map(sanitize_node_name)
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let node_name = names.claim(&base);
        let primitive_count = mesh.primitives().count();

        for (i, primitive) in mesh.primitives().enumerate() {
            let name = if primitive_count == 1 {
                node_name.clone()
            } else {
                format!("{node_name}_{i}")
            };

            let geometry = read_geometry(&primitive, &buffers).ok_or_else(|| {
                AssetError::MissingPositions {
                    path: path.to_string(),
                    group: name.clone(),
                }
            })?;
            let material = primitive
                .material()
                .index()
                .and_then(|index| material_names.get(index).cloned());

            groups.insert(
                name.clone(),
                SurfaceGroup {
                    name,
                    geometry: Arc::new(geometry),
                    material,
                },
            );
        }
    }

    log::debug!(
        "Imported {}: {} surface groups, {} materials",
        path,
        groups.len(),
        materials.len()
    );

    Ok(RoomAsset { groups, materials })
}

/// Read a primitive's vertex data. Returns `None` without positions.
fn read_geometry(primitive: &gltf::Primitive<'_>, buffers: &[Vec<u8>]) -> Option<Geometry> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals = reader.read_normals().map(|iter| iter.collect());
    let uvs = reader
        .read_tex_coords(0)
        .map(|coords| coords.into_f32().collect());
    let indices = reader
        .read_indices()
        .map(|indices| indices.into_u32().collect());

    Some(Geometry {
        positions,
        normals,
        uvs,
        indices,
    })
}

/// Node name sanitization as done by the web scene graph.
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Hands out unique names: `a`, `a_1`, `a_2`, ...
#[derive(Default)]
struct UniqueNames {
    taken: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl UniqueNames {
    fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{base}_{counter}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Resolve all buffer data (GLB binary chunk or base64 data URIs).
fn resolve_buffers(
    document: &gltf::Document,
    blob: Option<Vec<u8>>,
    path: &str,
) -> AssetResult<Vec<Vec<u8>>> {
    let buffer_error = |reason: String| AssetError::Buffer {
        path: path.to_string(),
        reason,
    };
    let mut buffers = Vec::new();

    for buffer in document.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let data = blob.as_ref().ok_or_else(|| {
                    buffer_error("binary buffer referenced but no blob present".into())
                })?;
                buffers.push(data.clone());
            }
            gltf::buffer::Source::Uri(uri) => {
                let data = parse_data_uri(uri).ok_or_else(|| {
                    buffer_error(format!("external buffer URIs not supported: {uri}"))
                })?;
                buffers.push(data);
            }
        }

        let expected = buffer.length();
        let actual = buffers.last().map_or(0, Vec::len);
        if actual < expected {
            return Err(buffer_error(format!(
                "buffer {} holds {actual} bytes, {expected} declared",
                buffer.index()
            )));
        }
    }

    Ok(buffers)
}

/// Parse a data URI (e.g., `data:application/octet-stream;base64,...`).
fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let base64_start = rest.find(";base64,")?;
    base64_decode(&rest[base64_start + 8..])
}

fn base64_decode(input: &str) -> Option<Vec<u8>> {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn decode_char(c: u8) -> Option<u8> {
        TABLE.iter().position(|&b| b == c).map(|p| p as u8)
    }

    let input: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    let last_chunk = input.len().saturating_sub(1) / 4;

    for (index, chunk) in input.chunks(4).enumerate() {
        // A lone trailing character carries less than one byte
        if chunk.len() == 1 {
            return None;
        }
        let mut buf = [0u8; 4];
        let mut pad = 0;

        for (i, &byte) in chunk.iter().enumerate() {
            if byte == b'=' {
                if index != last_chunk || i < 2 {
                    return None;
                }
                pad += 1;
            } else if pad > 0 {
                return None;
            } else {
                buf[i] = decode_char(byte)?;
            }
        }
        // Unpadded tail
        pad += 4 - chunk.len();

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if pad < 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if pad < 1 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use rstest::rstest;

    #[test]
    fn test_base64_decode() {
        assert_eq!(base64_decode("SGVsbG8gV29ybGQ=").unwrap(), b"Hello World");
        assert_eq!(base64_decode("YQ==").unwrap(), b"a");
        assert_eq!(base64_decode("YQ").unwrap(), b"a");
        assert!(base64_decode("Y!==").is_none());
    }

    #[rstest]
    #[case("QUJDR")]
    #[case("Q===")]
    #[case("QQ=A")]
    #[case("QQ==QUJD")]
    fn test_base64_decode_rejects_malformed(#[case] input: &str) {
        assert_eq!(base64_decode(input), None);
    }

    #[test]
    fn test_parse_data_uri() {
        let uri = "data:application/octet-stream;base64,AQID";
        assert_eq!(parse_data_uri(uri).unwrap(), vec![1, 2, 3]);
        assert!(parse_data_uri("file://some/path").is_none());
    }

    #[rstest]
    #[case("comp_blinn1_0", "comp_blinn1_0")]
    #[case("lamp white.blinn1", "lamp_whiteblinn1")]
    #[case("a[0]:b/c", "a0bc")]
    fn test_sanitize_node_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_node_name(input), expected);
    }

    #[test]
    fn test_unique_names() {
        let mut names = UniqueNames::default();
        assert_eq!(names.claim("radiator"), "radiator");
        assert_eq!(names.claim("radiator"), "radiator_1");
        assert_eq!(names.claim("radiator_2"), "radiator_2");
        assert_eq!(names.claim("radiator"), "radiator_3");
    }

    #[test]
    fn test_import_glb_groups_and_materials() {
        let glb = test_fixtures::glb(&[
            ("comp_blinn1_0", Some("blinn1")),
            ("emis_lambert1_0", Some("lambert1")),
            ("loose part", None),
        ]);
        let asset = import_room_asset(&glb, "models/room.glb").unwrap();

        assert_eq!(
            asset.group_names(),
            vec!["comp_blinn1_0", "emis_lambert1_0", "loose_part"]
        );
        let comp = asset.group("comp_blinn1_0").unwrap();
        assert_eq!(comp.geometry.vertex_count(), 3);
        assert_eq!(comp.geometry.element_count(), 3);
        assert_eq!(comp.material.as_deref(), Some("blinn1"));
        assert_eq!(asset.group("loose_part").unwrap().material, None);

        let lambert = asset.material("lambert1").unwrap();
        assert!(lambert.is_emissive());
        assert!(!asset.material("blinn1").unwrap().is_emissive());
    }

    #[test]
    fn test_duplicate_node_names_are_suffixed() {
        let glb = test_fixtures::glb(&[("radiator", Some("blinn1")), ("radiator", Some("blinn1"))]);
        let asset = import_room_asset(&glb, "room.glb").unwrap();
        assert_eq!(asset.group_names(), vec!["radiator", "radiator_1"]);
    }

    #[test]
    fn test_material_names_are_kept_as_authored() {
        let glb = test_fixtures::glb_with_materials(
            &[("screens", Some("lambert1.001")), ("desk", Some("dup"))],
            &["lambert1.001", "dup", "dup"],
        );
        let asset = import_room_asset(&glb, "room.glb").unwrap();

        assert_eq!(asset.material_count(), 2);
        let lambert = asset.material("lambert1.001").unwrap();
        assert_eq!(lambert.name, "lambert1.001");
        assert!(lambert.is_emissive());
        assert!(asset.material("lambert1001").is_none());
        assert!(asset.material("dup").is_some());
        assert!(asset.material("dup_1").is_none());
        assert_eq!(
            asset.group("screens").unwrap().material.as_deref(),
            Some("lambert1.001")
        );
    }

    #[test]
    fn test_import_gltf_with_data_uri() {
        let gltf = test_fixtures::embedded_gltf("window4_phong1_0", "phong1");
        let asset = import_room_asset(&gltf, "room.gltf").unwrap();
        let window = asset.group("window4_phong1_0").unwrap();
        assert_eq!(window.geometry.vertex_count(), 3);
        assert_eq!(window.material.as_deref(), Some("phong1"));
    }

    #[test]
    fn test_import_rejects_garbage() {
        let result = import_room_asset(b"definitely not gltf", "room.glb");
        assert!(matches!(result, Err(AssetError::Gltf { .. })));
    }
}
