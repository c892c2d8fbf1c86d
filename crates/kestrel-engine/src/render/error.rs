use std::fmt;

/// The compilation step a render resource failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

/// A render resource was rejected by the GPU backend.
///
/// `log` carries the backend diagnostic verbatim. Surfaced to the owning
/// scene at `init` time; the scene decides whether to abort or degrade.
#[derive(Debug, Clone)]
pub struct CompilationError {
    pub stage: ShaderStage,
    pub log: String,
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self.stage {
            ShaderStage::Vertex => "vertex shader compilation failed",
            ShaderStage::Fragment => "fragment shader compilation failed",
            ShaderStage::Link => "shader program linking failed",
        };
        write!(f, "{stage}: {}", self.log)
    }
}

impl std::error::Error for CompilationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_stage() {
        let err = CompilationError {
            stage: ShaderStage::Fragment,
            log: "unknown identifier".into(),
        };
        assert_eq!(
            err.to_string(),
            "fragment shader compilation failed: unknown identifier"
        );
    }
}
