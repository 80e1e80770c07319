pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid poster config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid font scale: min {min_font}px, max {max_font}px")]
    InvalidFontScale { min_font: f64, max_font: f64 },

    #[error("Poster config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Poster config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
