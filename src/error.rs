use std::fmt;

/// Failure contexts for the road compression boundary. Details (file
/// names, road names, decoder messages) ride along as report attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadError {
    InvalidInput,
    Io,
    Serialize,
    Config,
}

impl fmt::Display for RoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadError::InvalidInput => f.write_str("invalid road input"),
            RoadError::Io => f.write_str("road file could not be read or written"),
            RoadError::Serialize => f.write_str("road output could not be serialized"),
            RoadError::Config => f.write_str("invalid run configuration"),
        }
    }
}

impl std::error::Error for RoadError {}

pub type Result<T> = error_stack::Result<T, RoadError>;
