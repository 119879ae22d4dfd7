// model.rs — glTF/GLB 模型加载 (后台线程 + channel)

use crate::error::ModelError;
use glam::{Mat3, Mat4, Vec3};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// The one model the viewer shows.
pub const MODEL_PATH: &str = "models/sample.glb";

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// All triangle primitives of a model, flattened into world space.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ModelData {
    fn append(&mut self, positions: &[Vec3], normals: Option<Vec<Vec3>>, indices: &[u32], color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        let normals = normals.unwrap_or_else(|| face_normals(positions, indices));
        self.vertices.extend(positions.iter().zip(&normals).map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color,
        }));
        self.indices.extend(indices.iter().map(|i| i + base));
    }
}

/// Area-weighted vertex normals for meshes exported without them.
fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.into_iter().map(|n| n.normalize_or_zero()).collect()
}

/// 先找 exe 同目录，再找工作目录
pub fn resolve_model_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join(MODEL_PATH);
            if p.exists() {
                return p;
            }
        }
    }
    PathBuf::from(MODEL_PATH)
}

/// Imports a glTF/GLB file and bakes the default scene into one mesh.
pub fn load_model(path: &Path) -> Result<ModelData, ModelError> {
    let (doc, buffers, _images) = gltf::import(path).map_err(|source| ModelError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = ModelData::default();
    let scene = doc.default_scene().or_else(|| doc.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut out);
        }
    }

    if out.indices.is_empty() {
        return Err(ModelError::Empty(path.to_path_buf()));
    }
    Ok(out)
}

fn collect_node(node: &gltf::Node, parent: Mat4, buffers: &[gltf::buffer::Data], out: &mut ModelData) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    if let Some(mesh) = node.mesh() {
        for prim in mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions
                .map(|p| world.transform_point3(Vec3::from_array(p)))
                .collect();

            let normals = reader.read_normals().map(|ns| {
                ns.map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
                    .collect::<Vec<_>>()
            });
            let normals = normals.filter(|ns| ns.len() == positions.len());

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.len() < 3 {
                continue;
            }

            let [r, g, b, _] = prim.material().pbr_metallic_roughness().base_color_factor();
            out.append(&positions, normals, &indices, [r, g, b]);
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

pub enum ModelPoll {
    Pending,
    Ready(ModelData),
    /// The loader finished without a model; nothing will ever arrive.
    Abandoned,
}

/// An in-flight background load. Dropping it discards whatever arrives later.
pub struct PendingModel {
    rx: Receiver<ModelData>,
}

impl PendingModel {
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = channel();
        thread::spawn(move || {
            log::debug!("loading model {} in background", path.display());
            match load_model(&path) {
                Ok(model) => {
                    log::info!(
                        "model loaded: {} vertices, {} triangles",
                        model.vertices.len(),
                        model.indices.len() / 3
                    );
                    if tx.send(model).is_err() {
                        log::debug!("viewer torn down before {} finished loading", path.display());
                    }
                }
                Err(e) => log::warn!("{e}"),
            }
        });
        Self { rx }
    }

    #[cfg(test)]
    pub fn from_receiver(rx: Receiver<ModelData>) -> Self {
        Self { rx }
    }

    pub fn poll(&self) -> ModelPoll {
        match self.rx.try_recv() {
            Ok(model) => ModelPoll::Ready(model),
            Err(TryRecvError::Empty) => ModelPoll::Pending,
            Err(TryRecvError::Disconnected) => ModelPoll::Abandoned,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Writes a one-triangle glTF (offset +1 on X) with an external buffer.
    pub(crate) fn write_triangle(dir: &Path) -> PathBuf {
        let mut bin = Vec::new();
        for v in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in v {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        for i in [0u16, 1, 2] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        std::fs::write(dir.join("tri.bin"), &bin).unwrap();

        let json = r#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [ { "nodes": [0] } ],
            "nodes": [ { "mesh": 0, "translation": [1.0, 0.0, 0.0] } ],
            "meshes": [ { "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] } ],
            "buffers": [ { "uri": "tri.bin", "byteLength": 42 } ],
            "bufferViews": [
                { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
                { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
            ],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                  "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
                { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
            ]
        }"#;
        let path = dir.join("tri.gltf");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_triangle_in_world_space() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_triangle(dir.path())).unwrap();

        assert_eq!(model.indices, vec![0, 1, 2]);
        assert_eq!(model.vertices.len(), 3);
        assert_eq!(model.vertices[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(model.vertices[1].position, [2.0, 0.0, 0.0]);
        for v in &model.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("nope.glb")).unwrap_err();
        assert!(matches!(err, ModelError::Import { .. }));
    }

    #[test]
    fn face_normals_skip_bad_indices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = face_normals(&positions, &[0, 1, 2, 0, 1, 9]);
        assert_eq!(normals, vec![Vec3::Z; 3]);
    }

    #[test]
    fn background_load_delivers_model() {
        let dir = tempfile::tempdir().unwrap();
        let pending = PendingModel::spawn(write_triangle(dir.path()));

        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match pending.poll() {
                ModelPoll::Ready(model) => {
                    assert_eq!(model.indices.len(), 3);
                    break;
                }
                ModelPoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                ModelPoll::Pending => panic!("model never arrived"),
                ModelPoll::Abandoned => panic!("loader gave up"),
            }
        }
    }

    #[test]
    fn failed_background_load_is_abandoned() {
        let dir = tempfile::tempdir().unwrap();
        let pending = PendingModel::spawn(dir.path().join("missing.glb"));

        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match pending.poll() {
                ModelPoll::Abandoned => break,
                ModelPoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                _ => panic!("expected the load to be abandoned"),
            }
        }
    }
}
