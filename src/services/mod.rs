pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod similarity;

pub use recommendations::{RecommendOptions, RecommendationEngine};
pub use similarity::{CachedSimilarityGateway, SimilarityGateway, StoreSimilarityGateway};
