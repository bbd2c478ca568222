// Core: pure array-in, array-out computations
pub mod error;
pub mod types;
pub mod processing;
pub mod pipeline;
pub mod analysis;
pub mod spectral;

// Collaborators at the file boundary
pub mod formats;
pub mod output;
pub mod converter;

pub use analysis::{FidelityReport, SimilarityConfig, SimilarityScorer, SimilarityStatistics};
pub use converter::{ChromaConverter, Evaluation};
pub use error::{FidelityError, Result};
pub use pipeline::{round_trip, subsample_and_reconstruct, Reconstruction};
pub use processing::{ColorMatrix, SubsampledPlane};
pub use types::{Channel, Image, Plane, YCbCrPlanes};
