//! Renderer collaborator.
//!
//! A [`SceneRenderer`] mutates one scene: it loads a mesh, renders camera
//! poses, and must be cleared before the next mesh. [`SharedRenderer`] turns
//! that into a scoped resource: [`SharedRenderer::session`] locks the renderer,
//! loads the mesh, and the returned [`SceneSession`] clears the scene when it
//! is dropped, on every exit path.
//!
//! [`SplatRenderer`] is a small software renderer (orthographic point splats
//! of the face centroids) used by tests and the demo tools.

mod retry;
mod session;
mod splat;

pub use retry::{with_retry, RetryPolicy};
pub use session::{SceneSession, SharedRenderer};
pub use splat::{SplatParams, SplatRenderer};

use crate::error::Result;
use crate::image::Raster;
use crate::mesh::MeshHandle;
use crate::views::CameraPose;

/// Contract for an external renderer backed by a single mutable scene.
pub trait SceneRenderer: Send {
    /// Load `mesh` into the scene, centred on its centre of mass.
    fn load(&mut self, mesh: &MeshHandle) -> Result<()>;

    /// Orthographic render of the loaded scene at `resolution × resolution`.
    fn render(&mut self, pose: &CameraPose, resolution: u32) -> Result<Raster>;

    /// Remove everything `load` added.
    fn clear(&mut self) -> Result<()>;
}
