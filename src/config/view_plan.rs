use super::read_json;
use crate::error::Result;
use crate::pose::PoseParams;
use crate::render::SplatParams;
use crate::views::ViewPlanParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct ViewPlanToolConfig {
    /// STL model to canonicalize.
    pub input: PathBuf,
    #[serde(default)]
    pub pose: PoseParams,
    #[serde(default)]
    pub view_plan: ViewPlanParams,
    #[serde(default)]
    pub splat: SplatParams,
    pub output: ViewPlanOutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ViewPlanOutputConfig {
    /// Frame and plan audit as JSON.
    pub audit_json: PathBuf,
    /// When set, every planned view is written here as `{stem}.png`.
    #[serde(default)]
    pub render_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ViewPlanToolConfig> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::CoveragePolicy;
    use std::io::Write;

    #[test]
    fn policy_and_resolution_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "input": "part.stl",
                "view_plan": {{"policy": {{"kind": "octahedral"}}, "resolution": 256}},
                "output": {{"audit_json": "out/plan.json"}}
            }}"#
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.view_plan.policy, CoveragePolicy::Octahedral);
        assert_eq!(config.view_plan.resolution, 256);
        assert!(config.view_plan.use_image_transforms);
        assert!(config.output.render_dir.is_none());
    }
}
