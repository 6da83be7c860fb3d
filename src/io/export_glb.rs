// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary glTF (GLB) exporter
//!
//! The only asynchronous export path: encoding runs on the blocking pool
//! because a scene container may transcode images alongside the geometry.
//! Callers await the bytes or an `ExportFailed` rejection.

use crate::builder::Solid;
use crate::error::PlateError;
use serde_json::json;

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

/// Encode the solid as a single self-contained GLB file.
pub async fn export(solid: &Solid) -> Result<Vec<u8>, PlateError> {
    let solid = solid.clone();
    let handle = tokio::task::spawn_blocking(move || encode_glb(&solid));
    match handle.await {
        Ok(result) => result,
        Err(join_error) => Err(PlateError::export(join_error)),
    }
}

fn encode_glb(solid: &Solid) -> Result<Vec<u8>, PlateError> {
    let (gltf, buffer_data) = build_gltf_json(solid);

    let json_string = serde_json::to_string(&gltf).map_err(PlateError::export)?;
    let json_padding = padding_to_four(json_string.len());
    let bin_padding = padding_to_four(buffer_data.len());

    let json_chunk_len = json_string.len() + json_padding;
    let bin_chunk_len = buffer_data.len() + bin_padding;
    let total_length = 12 + 8 + json_chunk_len + 8 + bin_chunk_len;

    let mut bytes = Vec::with_capacity(total_length);

    // GLB header
    bytes.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON chunk, space-padded
    bytes.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
    bytes.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    bytes.extend_from_slice(json_string.as_bytes());
    bytes.resize(bytes.len() + json_padding, b' ');

    // BIN chunk, zero-padded
    bytes.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
    bytes.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    bytes.extend_from_slice(&buffer_data);
    bytes.resize(bytes.len() + bin_padding, 0);

    Ok(bytes)
}

fn build_gltf_json(solid: &Solid) -> (serde_json::Value, Vec<u8>) {
    let mesh = &solid.mesh;
    let mut buffer_data = Vec::new();

    // Positions
    let position_offset = buffer_data.len();
    let (min_pos, max_pos) = position_bounds(solid);
    for vertex in &mesh.vertices {
        buffer_data.extend_from_slice(&(vertex.position.x as f32).to_le_bytes());
        buffer_data.extend_from_slice(&(vertex.position.y as f32).to_le_bytes());
        buffer_data.extend_from_slice(&(vertex.position.z as f32).to_le_bytes());
    }
    let position_length = buffer_data.len() - position_offset;

    // Normals
    let normal_offset = buffer_data.len();
    for vertex in &mesh.vertices {
        buffer_data.extend_from_slice(&(vertex.normal.x as f32).to_le_bytes());
        buffer_data.extend_from_slice(&(vertex.normal.y as f32).to_le_bytes());
        buffer_data.extend_from_slice(&(vertex.normal.z as f32).to_le_bytes());
    }
    let normal_length = buffer_data.len() - normal_offset;

    // Indices
    let indices_offset = buffer_data.len();
    for triangle in &mesh.triangles {
        buffer_data.extend_from_slice(&(triangle.indices[0] as u32).to_le_bytes());
        buffer_data.extend_from_slice(&(triangle.indices[1] as u32).to_le_bytes());
        buffer_data.extend_from_slice(&(triangle.indices[2] as u32).to_le_bytes());
    }
    let indices_length = buffer_data.len() - indices_offset;

    let mut gltf = json!({
        "asset": {
            "generator": "polyplate",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [
            {
                "nodes": [0]
            }
        ],
        "nodes": [
            {
                "mesh": 0,
                "name": "plate"
            }
        ],
        "meshes": [
            {
                "primitives": [
                    {
                        "attributes": {
                            "POSITION": 0,
                            "NORMAL": 1
                        },
                        "indices": 2,
                        "mode": 4
                    }
                ]
            }
        ],
        "accessors": [
            {
                "bufferView": 0,
                "byteOffset": 0,
                "componentType": 5126,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": [min_pos[0], min_pos[1], min_pos[2]],
                "max": [max_pos[0], max_pos[1], max_pos[2]]
            },
            {
                "bufferView": 1,
                "byteOffset": 0,
                "componentType": 5126,
                "count": mesh.vertices.len(),
                "type": "VEC3"
            },
            {
                "bufferView": 2,
                "byteOffset": 0,
                "componentType": 5125,
                "count": mesh.triangles.len() * 3,
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            {
                "buffer": 0,
                "byteOffset": position_offset,
                "byteLength": position_length,
                "target": 34962
            },
            {
                "buffer": 0,
                "byteOffset": normal_offset,
                "byteLength": normal_length,
                "target": 34962
            },
            {
                "buffer": 0,
                "byteOffset": indices_offset,
                "byteLength": indices_length,
                "target": 34963
            }
        ],
        "buffers": [
            {
                "byteLength": buffer_data.len()
            }
        ]
    });

    // The opaque material reference rides along for the external catalog;
    // no visual properties are resolved here.
    if let Some(key) = &solid.material {
        gltf["materials"] = json!([{ "name": key }]);
        gltf["meshes"][0]["primitives"][0]["material"] = json!(0);
    }

    (gltf, buffer_data)
}

fn position_bounds(solid: &Solid) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX, f32::MAX, f32::MAX];
    let mut max = [f32::MIN, f32::MIN, f32::MIN];

    for vertex in &solid.mesh.vertices {
        min[0] = min[0].min(vertex.position.x as f32);
        min[1] = min[1].min(vertex.position.y as f32);
        min[2] = min[2].min(vertex.position.z as f32);
        max[0] = max[0].max(vertex.position.x as f32);
        max[1] = max[1].max(vertex.position.y as f32);
        max[2] = max[2].max(vertex.position.z as f32);
    }

    (min, max)
}

fn padding_to_four(len: usize) -> usize {
    (4 - len % 4) % 4
}
