//! Reads triangle meshes from PLY files (ASCII or binary).
//!
//! The `vertex` element needs `x`, `y` and `z`; `nx`, `ny`, `nz` are
//! used when all vertices carry them. The `face` element needs a
//! `vertex_indices` (or `vertex_index`) list; polygons with more than
//! three corners are split into a triangle fan. An optional integer
//! `material_index` per face becomes the triangle's material.

// std
use std::convert::TryInto;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
// others
use log::{debug, info};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Ply, Property};
// lbvh
use crate::core::error::MeshError;
use crate::core::geometry::{Normal3f, Point3f};
use crate::core::mesh::MaterialId;
use crate::core::pbrt::Float;
use crate::shapes::triangle::TriangleMesh;

fn property_as_float(property: &Property) -> Option<Float> {
    match *property {
        Property::Float(f) => Some(f),
        Property::Double(d) => Some(d as Float),
        Property::Char(c) => Some(c as Float),
        Property::UChar(c) => Some(c as Float),
        Property::Short(s) => Some(s as Float),
        Property::UShort(s) => Some(s as Float),
        Property::Int(i) => Some(i as Float),
        Property::UInt(i) => Some(i as Float),
        _ => None,
    }
}

fn property_as_index(property: &Property) -> Option<usize> {
    match *property {
        Property::Char(c) if c >= 0 => Some(c as usize),
        Property::UChar(c) => Some(c as usize),
        Property::Short(s) if s >= 0 => Some(s as usize),
        Property::UShort(s) => Some(s as usize),
        Property::Int(i) if i >= 0 => Some(i as usize),
        Property::UInt(i) => Some(i as usize),
        _ => None,
    }
}

fn property_as_indices(property: &Property) -> Option<Vec<usize>> {
    fn convert<T: Copy + TryInto<usize>>(list: &[T]) -> Option<Vec<usize>> {
        list.iter().map(|&i| i.try_into().ok()).collect()
    }
    match property {
        Property::ListChar(l) => convert(l),
        Property::ListUChar(l) => convert(l),
        Property::ListShort(l) => convert(l),
        Property::ListUShort(l) => convert(l),
        Property::ListInt(l) => convert(l),
        Property::ListUInt(l) => convert(l),
        _ => None,
    }
}

fn vertex_coordinate(
    vertex: &DefaultElement,
    index: usize,
    property: &'static str,
) -> Result<Float, MeshError> {
    vertex
        .get(property)
        .and_then(property_as_float)
        .ok_or(MeshError::MissingProperty { index, property })
}

/// Parse a PLY stream into a **TriangleMesh**.
pub fn read_ply_mesh<R: Read>(reader: &mut R) -> Result<TriangleMesh, MeshError> {
    let parser = Parser::<DefaultElement>::new();
    let ply: Ply<DefaultElement> = parser.read_ply(reader)?;
    let vertices: &Vec<DefaultElement> = ply
        .payload
        .get("vertex")
        .ok_or(MeshError::MissingElement("vertex"))?;
    let faces: &Vec<DefaultElement> = ply
        .payload
        .get("face")
        .ok_or(MeshError::MissingElement("face"))?;
    // positions
    let mut p: Vec<Point3f> = Vec::with_capacity(vertices.len());
    for (index, vertex) in vertices.iter().enumerate() {
        p.push(Point3f {
            x: vertex_coordinate(vertex, index, "x")?,
            y: vertex_coordinate(vertex, index, "y")?,
            z: vertex_coordinate(vertex, index, "z")?,
        });
    }
    // normals, all or nothing
    let n: Vec<Normal3f> = vertices
        .iter()
        .map(|vertex| {
            Some(Normal3f {
                x: vertex.get("nx").and_then(property_as_float)?,
                y: vertex.get("ny").and_then(property_as_float)?,
                z: vertex.get("nz").and_then(property_as_float)?,
            })
        })
        .collect::<Option<Vec<Normal3f>>>()
        .unwrap_or_default();
    // faces, fan triangulated
    let mut vertex_indices: Vec<usize> = Vec::with_capacity(faces.len() * 3);
    let mut material_ids: Vec<MaterialId> = Vec::with_capacity(faces.len());
    let mut has_materials: bool = false;
    for (face, element) in faces.iter().enumerate() {
        let indices: Vec<usize> = element
            .get("vertex_indices")
            .or_else(|| element.get("vertex_index"))
            .and_then(property_as_indices)
            .ok_or(MeshError::MissingProperty {
                index: face,
                property: "vertex_indices",
            })?;
        if indices.len() < 3 {
            return Err(MeshError::FaceArity {
                face,
                count: indices.len(),
            });
        }
        let material: MaterialId = match element.get("material_index").and_then(property_as_index) {
            Some(m) => {
                has_materials = true;
                MaterialId(m as u32)
            }
            None => MaterialId::default(),
        };
        for k in 1..(indices.len() - 1) {
            vertex_indices.push(indices[0]);
            vertex_indices.push(indices[k]);
            vertex_indices.push(indices[k + 1]);
            material_ids.push(material);
        }
    }
    if !has_materials {
        material_ids.clear();
    }
    debug!(
        "PLY: {} vertices, {} faces, normals: {}",
        p.len(),
        faces.len(),
        !n.is_empty()
    );
    TriangleMesh::new(vertex_indices, p, n, material_ids)
}

/// Read the PLY file at *path*.
pub fn load_ply_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh, MeshError> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    let mesh = read_ply_mesh(&mut reader)?;
    info!(
        "loaded {:?} ({} triangles, {} vertices)",
        path.as_ref(),
        mesh.n_triangles,
        mesh.p.len()
    );
    Ok(mesh)
}
