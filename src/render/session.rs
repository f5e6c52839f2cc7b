use super::SceneRenderer;
use crate::error::Result;
use crate::image::Raster;
use crate::mesh::MeshHandle;
use crate::views::CameraPose;
use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard};

/// Renderer shared between workers; one session at a time.
pub struct SharedRenderer<R: SceneRenderer> {
    inner: Mutex<R>,
}

impl<R: SceneRenderer> SharedRenderer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            inner: Mutex::new(renderer),
        }
    }

    /// Lock the renderer and load `mesh`. Blocks while another session is live.
    pub fn session(&self, mesh: &MeshHandle) -> Result<SceneSession<'_, R>> {
        let guard = self.inner.lock();
        let mut session = SceneSession {
            guard,
            model_id: mesh.model_id.clone(),
        };
        // On failure the session drops here and clears the partial scene.
        session.guard.load(mesh)?;
        debug!("SceneSession: loaded {}", mesh.model_id);
        Ok(session)
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

/// Exclusive, scoped access to a loaded scene.
pub struct SceneSession<'a, R: SceneRenderer> {
    guard: MutexGuard<'a, R>,
    model_id: String,
}

impl<R: SceneRenderer> SceneSession<'_, R> {
    pub fn render(&mut self, pose: &CameraPose, resolution: u32) -> Result<Raster> {
        self.guard.render(pose, resolution)
    }
}

impl<R: SceneRenderer> Drop for SceneSession<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.guard.clear() {
            warn!("SceneSession: failed to clear scene for {}: {err}", self.model_id);
        }
    }
}
