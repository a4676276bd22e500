use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("malformed dataset: {0}")]
    MalformedInput(String),
    #[error("series `{0}` has no entries")]
    EmptySeries(&'static str),
    #[error("chart backend unavailable: {0}")]
    RenderDependencyUnavailable(String),
}
