//! Builders for real asset bytes used across the unit tests.

use std::io::Cursor;

use serde_json::{json, Value};

use crate::assets::MemorySource;
use crate::scene::binding::{Binding, ROOM_BINDINGS, SCREENS_GROUP, SCREENS_MATERIAL};
use crate::ShowcaseConfig;

/// Embedded materials every fixture model carries, in index order.
const MATERIALS: [&str; 3] = ["blinn1", "lambert1", "phong1"];

/// Encode a 2x2 PNG filled with one color.
pub fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// One indexed triangle: 3 positions followed by 3 u16 indices.
fn triangle_bin() -> Vec<u8> {
    let positions: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let mut bin: Vec<u8> = bytemuck::cast_slice(&positions).to_vec();
    bin.extend_from_slice(bytemuck::cast_slice(&[0u16, 1, 2]));
    bin
}

/// glTF JSON with one node and mesh per entry, all sharing one triangle.
fn document(nodes: &[(&str, Option<&str>)], materials: &[&str], buffer: Value) -> Value {
    let node_values: Vec<Value> = nodes
        .iter()
        .enumerate()
        .map(|(i, (name, _))| json!({ "name": name, "mesh": i }))
        .collect();
    let meshes: Vec<Value> = nodes
        .iter()
        .map(|(name, material)| {
            let mut primitive = json!({ "attributes": { "POSITION": 0 }, "indices": 1 });
            if let Some(material) = material {
                let index = materials
                    .iter()
                    .position(|m| m == material)
                    .expect("fixture material");
                primitive["material"] = json!(index);
            }
            json!({ "name": format!("{name}_mesh"), "primitives": [primitive] })
        })
        .collect();
    let material_values: Vec<Value> = materials
        .iter()
        .map(|name| {
            let emissive = if name.starts_with("lambert1") { 1.0 } else { 0.0 };
            json!({
                "name": name,
                "pbrMetallicRoughness": { "baseColorFactor": [0.8, 0.8, 0.8, 1.0] },
                "emissiveFactor": [emissive, emissive, emissive]
            })
        })
        .collect();

    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": (0..nodes.len()).collect::<Vec<_>>() }],
        "nodes": node_values,
        "meshes": meshes,
        "materials": material_values,
        "accessors": [
            {
                "bufferView": 0,
                "componentType": 5126,
                "count": 3,
                "type": "VEC3",
                "min": [0.0, 0.0, 0.0],
                "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "buffers": [buffer]
    })
}

/// Binary glTF with the given nodes and the standard fixture materials.
pub fn glb(nodes: &[(&str, Option<&str>)]) -> Vec<u8> {
    glb_with_materials(nodes, &MATERIALS)
}

/// Binary glTF with the given nodes and embedded materials, in index order.
pub fn glb_with_materials(nodes: &[(&str, Option<&str>)], materials: &[&str]) -> Vec<u8> {
    let mut bin = triangle_bin();
    let doc = document(nodes, materials, json!({ "byteLength": bin.len() }));

    let mut json_chunk = serde_json::to_vec(&doc).expect("serialize gltf json");
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json_chunk.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json_chunk);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

/// JSON glTF with its buffer embedded as a base64 data URI.
pub fn embedded_gltf(node: &str, material: &str) -> Vec<u8> {
    let bin = triangle_bin();
    let uri = format!("data:application/octet-stream;base64,{}", base64_encode(&bin));
    let doc = document(
        &[(node, Some(material))],
        &[material],
        json!({ "byteLength": bin.len(), "uri": uri }),
    );
    serde_json::to_vec(&doc).expect("serialize gltf json")
}

fn base64_encode(data: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::new();
    for chunk in data.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
        for i in 0..4 {
            if i <= chunk.len() {
                out.push(TABLE[((n >> (18 - 6 * i)) & 63) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Every group the room binds, with the material it was authored with.
fn room_nodes(skip: Option<&str>) -> Vec<(&'static str, Option<&'static str>)> {
    ROOM_BINDINGS
        .iter()
        .map(|(group, binding)| match binding {
            Binding::Embedded(material) => (*group, Some(*material)),
            Binding::Palette(_) => (*group, Some("blinn1")),
        })
        .chain(std::iter::once((SCREENS_GROUP, Some(SCREENS_MATERIAL))))
        .filter(|(group, _)| Some(*group) != skip)
        .collect()
}

/// The full room model.
pub fn room_glb() -> Vec<u8> {
    glb(&room_nodes(None))
}

/// The room model with one group left out.
pub fn room_glb_without(group: &str) -> Vec<u8> {
    glb(&room_nodes(Some(group)))
}

/// The room model lacking one embedded material; groups authored with it
/// carry no material.
pub fn room_glb_without_material(material: &str) -> Vec<u8> {
    let materials: Vec<&str> = MATERIALS.into_iter().filter(|m| *m != material).collect();
    let nodes: Vec<_> = room_nodes(None)
        .into_iter()
        .map(|(group, authored)| (group, authored.filter(|m| *m != material)))
        .collect();
    glb_with_materials(&nodes, &materials)
}

/// A source serving the room model and body texture at the default paths.
pub fn room_source() -> MemorySource {
    let config = ShowcaseConfig::default();
    let source = MemorySource::new();
    source
        .insert(&config.model_path, room_glb())
        .expect("insert model");
    source
        .insert(&config.texture_path, png_bytes([120, 90, 200, 255]))
        .expect("insert texture");
    source
}
