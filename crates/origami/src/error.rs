//! Error type for malformed input.
//!
//! Geometric constructions that have no solution return `None`; only input
//! that cannot be interpreted at all surfaces as a `PatternError`.

use thiserror::Error;

use crate::graph::FaceId;

#[derive(Error, Debug)]
pub enum PatternError {
    /// Boundary points do not describe a convex polygon.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),

    /// A required field of an interchange document is absent.
    #[error("document is missing required field `{0}`")]
    MissingField(&'static str),

    /// The interchange document is not valid JSON for the schema.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A vertex entry has fewer than two coordinates.
    #[error("vertex {0} has fewer than two coordinates")]
    MalformedVertex(usize),

    #[error("unknown face {0:?}")]
    UnknownFace(FaceId),

    #[error("unknown base `{0}` (expected kite, fish, bird or frog)")]
    UnknownBase(String),
}

pub type Result<T> = std::result::Result<T, PatternError>;
