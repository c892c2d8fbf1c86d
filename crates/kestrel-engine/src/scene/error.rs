use std::fmt;

/// Errors from the scene registry and transition machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The registry is empty or no activation has occurred yet.
    NoSceneActive,
    /// An index-based activation named a slot outside the registry.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NoSceneActive => write!(f, "no scene is active"),
            SceneError::IndexOutOfRange { index, len } => {
                write!(f, "scene index {index} out of range for registry of {len}")
            }
        }
    }
}

impl std::error::Error for SceneError {}
