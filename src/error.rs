use std::{fmt, io, path::PathBuf};

/// Pipeline stage a shader object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "vertex"),
            Stage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Errors that can occur while building a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A source file could not be opened or read.
    Read { path: PathBuf, source: io::Error },
    /// The driver rejected a stage's source text.
    Compile { stage: Stage, log: String },
    /// The driver rejected linking the compiled stages.
    Link { log: String },
}

impl ShaderError {
    /// Driver info log attached to a compile or link failure.
    pub fn log(&self) -> Option<&str> {
        match self {
            ShaderError::Read { .. } => None,
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => {
                Some(log.as_str())
            }
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Read { path, source } => write!(
                f,
                "cannot read shader source {}: {}",
                path.display(),
                source
            ),
            ShaderError::Compile { stage, log } => {
                write!(f, "{} shader compilation error:\n{}", stage, log)
            }
            ShaderError::Link { log } => {
                write!(f, "shader linking failed:\n{}", log)
            }
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}
