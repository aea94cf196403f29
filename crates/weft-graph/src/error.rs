use thiserror::Error;

/// Errors from the graph layer.
///
/// Analysis itself never fails; heuristic misses degrade to sentinel
/// values. The only fatal condition is failing to compile the scan
/// patterns at construction time.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("scan pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
