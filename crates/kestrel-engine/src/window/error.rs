use std::fmt;

/// Fatal runtime-loop failures.
///
/// Both variants terminate the loop: there is no recovery path for a broken
/// display context, and nothing to render without a scene. Resources are
/// still released on the way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Display surface or GPU context acquisition failed. Not retried.
    SurfaceInit { reason: String },
    /// The loop reached the render step with no scene to drive.
    NoSceneFound,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::SurfaceInit { reason } => {
                write!(f, "failed to initialize the display surface: {reason}")
            }
            RuntimeError::NoSceneFound => {
                write!(f, "no scene has been registered with the scene manager")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
