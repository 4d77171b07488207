use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmrError {
    #[error("Patch index out of range: ipatch={ipatch}, hierarchy has {npatches} patches")]
    InvalidIndex { ipatch: usize, npatches: usize },

    #[error("Invalid patch hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("Length mismatch for {what}: expected {expected} patches, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Shape mismatch at patch {ipatch}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        ipatch: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Invalid radial binning: {0}")]
    InvalidBinning(String),

    #[error("No sign change in [{a}, {b}]: f(a)={fa}, f(b)={fb}")]
    NoBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("Solver diverged at iteration {iterations}: {message}")]
    SolverDiverged { iterations: usize, message: String },

    #[error("Patch {ipatch} has a single cell along every axis; cell size is undefined")]
    DegeneratePatch { ipatch: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AmrResult<T> = Result<T, AmrError>;
