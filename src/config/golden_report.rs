use super::read_json;
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct GoldenReportConfig {
    /// Golden search results table.
    pub golden: PathBuf,
    #[serde(default)]
    pub approved_names: Option<PathBuf>,
    /// Observed results, one `query,result1,...` row per search.
    pub search_results: PathBuf,
    #[serde(default)]
    pub output: GoldenReportOutput,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GoldenReportOutput {
    pub summary_json: Option<PathBuf>,
    pub html: Option<HtmlReportConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HtmlReportConfig {
    /// Directory holding `{item}.png`.
    pub image_dir: PathBuf,
    pub out: PathBuf,
}

pub fn load_config(path: &Path) -> Result<GoldenReportConfig> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn minimal_config_uses_default_outputs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"golden":"g.csv","search_results":"r.csv"}}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.golden, PathBuf::from("g.csv"));
        assert!(config.approved_names.is_none());
        assert!(config.output.html.is_none());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("failed to read")));
    }
}
