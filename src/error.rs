use thiserror::Error;

/// Which external collaborator produced an [`Error::ExternalService`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Renderer,
    SignatureMatcher,
    Provenance,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Service::Renderer => "renderer",
            Service::SignatureMatcher => "signature matcher",
            Service::Provenance => "provenance service",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Geometry that has no usable inertia frame. Fatal for that model only.
    #[error("degenerate mesh: {0}")]
    DegenerateMesh(String),

    /// Misconfigured view plan. Never recovered by dropping views.
    #[error("invalid view plan: {0}")]
    InvalidViewPlan(String),

    #[error(
        "no score can be calculated for a search involving an item named {name} \
         because there is no known item with that name"
    )]
    UnknownItem { name: String },

    #[error("{service} failure: {message}")]
    ExternalService {
        service: Service,
        message: String,
        transient: bool,
    },

    /// Golden table failed construction-time validation.
    #[error("golden results validation failed: {0}")]
    GoldenValidation(String),

    /// Unusable runtime configuration (worker pool, config files).
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn external(service: Service, message: impl Into<String>) -> Self {
        Error::ExternalService {
            service,
            message: message.into(),
            transient: false,
        }
    }

    pub fn transient(service: Service, message: impl Into<String>) -> Self {
        Error::ExternalService {
            service,
            message: message.into(),
            transient: true,
        }
    }

    /// True for failures a caller may retry (timeouts, flaky sessions).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::ExternalService {
                transient: true,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
