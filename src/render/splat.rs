use super::SceneRenderer;
use crate::error::{Error, Result, Service};
use crate::image::{ImageViewMut, Raster};
use crate::mesh::{io::load_stl, Mesh, MeshHandle};
use crate::views::CameraPose;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Parameters for [`SplatRenderer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatParams {
    /// Loaded meshes are rescaled so their farthest centroid sits at this radius.
    pub fit_radius: f64,
    /// Half-width of the orthographic view volume.
    pub ortho_half_extent: f64,
}

impl Default for SplatParams {
    fn default() -> Self {
        Self {
            fit_radius: 3.0,
            ortho_half_extent: 3.5,
        }
    }
}

/// Orthographic point-splat renderer over face centroids.
///
/// Each centroid lights the pixel it projects into with an intensity that
/// decreases with depth along the view direction; overlapping splats keep the
/// brightest value. Meshes come from an in-memory registry keyed by model id,
/// falling back to reading the handle's STL file.
#[derive(Debug, Default)]
pub struct SplatRenderer {
    params: SplatParams,
    registry: HashMap<String, Mesh>,
    scene: Option<Vec<Point3<f64>>>,
}

impl SplatRenderer {
    pub fn new(params: SplatParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Make `mesh` loadable under `model_id` without touching the filesystem.
    pub fn register(&mut self, model_id: impl Into<String>, mesh: Mesh) {
        self.registry.insert(model_id.into(), mesh);
    }

    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    fn normalized_points(&self, mesh: &Mesh) -> Result<Vec<Point3<f64>>> {
        let com = mesh.center_of_mass().ok_or_else(|| {
            Error::external(Service::Renderer, "cannot centre a mesh with zero area")
        })?;
        let radius = mesh
            .faces()
            .iter()
            .map(|f| (f.centroid - com).norm())
            .fold(0.0, f64::max);
        let scale = if radius > 0.0 {
            self.params.fit_radius / radius
        } else {
            1.0
        };
        Ok(mesh
            .faces()
            .iter()
            .map(|f| Point3::from((f.centroid - com) * scale))
            .collect())
    }
}

impl SceneRenderer for SplatRenderer {
    fn load(&mut self, mesh: &MeshHandle) -> Result<()> {
        if self.scene.is_some() {
            return Err(Error::external(
                Service::Renderer,
                "scene already holds a mesh; clear it first",
            ));
        }
        let points = match self.registry.get(&mesh.model_id) {
            Some(registered) => self.normalized_points(registered)?,
            None => {
                let loaded = load_stl(&mesh.path)?;
                self.normalized_points(&loaded)?
            }
        };
        self.scene = Some(points);
        Ok(())
    }

    fn render(&mut self, pose: &CameraPose, resolution: u32) -> Result<Raster> {
        let points = self
            .scene
            .as_ref()
            .ok_or_else(|| Error::external(Service::Renderer, "render called on an empty scene"))?;
        let n = resolution as usize;
        let half = self.params.ortho_half_extent;
        let mut out = Raster::new(n, n);
        for p in points {
            let (s, t) = pose.project(p);
            let xs = pixel_span(s / half, n);
            if xs.is_empty() {
                continue;
            }
            let depth = (p.coords.dot(&pose.look) / half).clamp(-1.0, 1.0);
            let intensity = (191.5 + 63.5 * depth) as u8;
            for y in pixel_span(-t / half, n) {
                let row = out.row_mut(y);
                for px in &mut row[xs.clone()] {
                    *px = (*px).max(intensity);
                }
            }
        }
        Ok(out)
    }

    fn clear(&mut self) -> Result<()> {
        self.scene = None;
        Ok(())
    }
}

/// Pixels covered by normalized coordinate `z` on an `n`-pixel axis.
///
/// A point inside a bin covers that bin; a point exactly on the edge between
/// two bins (the centre line included) covers both. The span of `-z` is the
/// mirror of the span of `z`, so quarter turns and mirrors of a raster equal
/// re-renders from the rolled or mirrored camera.
fn pixel_span(z: f64, n: usize) -> Range<usize> {
    let m = z * n as f64 * 0.5;
    if !m.is_finite() || n == 0 {
        return 0..0;
    }
    let (lo, hi) = if n % 2 == 0 {
        let centre = (n / 2) as f64;
        if m.fract() == 0.0 {
            (m + centre - 1.0, m + centre)
        } else {
            let idx = m.floor() + centre;
            (idx, idx)
        }
    } else {
        // Half-way cases round away from zero, which is already symmetric.
        let idx = m.round() + ((n - 1) / 2) as f64;
        (idx, idx)
    };
    let lo = lo.max(0.0);
    let hi = hi.min((n - 1) as f64);
    if lo > hi {
        return 0..0;
    }
    lo as usize..hi as usize + 1
}
