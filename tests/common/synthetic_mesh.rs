use match3d::mesh::{Face, Mesh};
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use std::io::Write;
use std::path::Path;

/// Deterministic xorshift stream in `[-0.5, 0.5)`.
pub struct Noise(u64);

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self(seed | 1)
    }

    pub fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % 1_000_003) as f64 / 1_000_003.0 - 0.5
    }
}

/// Unit-area face cloud filling a box with the given extents.
pub fn cloud(seed: u64, faces: usize, extents: [f64; 3]) -> Mesh {
    let mut noise = Noise::new(seed);
    Mesh::new(
        (0..faces)
            .map(|_| Face {
                area: 1.0,
                centroid: Point3::new(
                    extents[0] * noise.next(),
                    extents[1] * noise.next(),
                    extents[2] * noise.next(),
                ),
            })
            .collect(),
    )
}

/// Apply a linear map (rotation, reflection) and a translation to every centroid.
pub fn transformed(mesh: &Mesh, linear: Matrix3<f64>, offset: Vector3<f64>) -> Mesh {
    Mesh::new(
        mesh.faces()
            .iter()
            .map(|f| Face {
                area: f.area,
                centroid: Point3::from(linear * f.centroid.coords + offset),
            })
            .collect(),
    )
}

pub fn some_rotation() -> Matrix3<f64> {
    *Rotation3::from_euler_angles(0.4, -1.1, 2.3).matrix()
}

pub fn mirror_x() -> Matrix3<f64> {
    Matrix3::from_diagonal(&Vector3::new(-1.0, 1.0, 1.0))
}

/// Axis-aligned cross: one unit face at each end of each arm plus one at the
/// centre, so every centroid lies on a symmetry plane.
pub fn cross(extents: [f64; 3]) -> Mesh {
    let mut centroids = vec![Point3::origin()];
    for (axis, &e) in extents.iter().enumerate() {
        for sign in [1.0, -1.0] {
            let mut p = Point3::origin();
            p[axis] = sign * e;
            centroids.push(p);
        }
    }
    Mesh::new(
        centroids
            .into_iter()
            .map(|centroid| Face {
                area: 1.0,
                centroid,
            })
            .collect(),
    )
}

/// The 12 triangles of an axis-aligned box centred at the origin.
pub fn box_triangles(size: [f64; 3]) -> Vec<[Point3<f64>; 3]> {
    let [hx, hy, hz] = size.map(|s| s * 0.5);
    let c = |x: f64, y: f64, z: f64| Point3::new(x * hx, y * hy, z * hz);
    let quads = [
        [c(-1., -1., -1.), c(1., -1., -1.), c(1., 1., -1.), c(-1., 1., -1.)],
        [c(-1., -1., 1.), c(-1., 1., 1.), c(1., 1., 1.), c(1., -1., 1.)],
        [c(-1., -1., -1.), c(-1., -1., 1.), c(1., -1., 1.), c(1., -1., -1.)],
        [c(-1., 1., -1.), c(1., 1., -1.), c(1., 1., 1.), c(-1., 1., 1.)],
        [c(-1., -1., -1.), c(-1., 1., -1.), c(-1., 1., 1.), c(-1., -1., 1.)],
        [c(1., -1., -1.), c(1., -1., 1.), c(1., 1., 1.), c(1., 1., -1.)],
    ];
    quads
        .iter()
        .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
        .collect()
}

pub fn write_ascii_stl(path: &Path, triangles: &[[Point3<f64>; 3]]) {
    let mut file = std::fs::File::create(path).expect("create stl");
    writeln!(file, "solid fixture").unwrap();
    for tri in triangles {
        writeln!(file, "  facet normal 0 0 0\n    outer loop").unwrap();
        for v in tri {
            writeln!(file, "      vertex {} {} {}", v.x, v.y, v.z).unwrap();
        }
        writeln!(file, "    endloop\n  endfacet").unwrap();
    }
    writeln!(file, "endsolid fixture").unwrap();
}
