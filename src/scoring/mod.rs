pub mod branch;
pub mod engine;
pub mod preference;
pub mod validation;
pub mod weights;

pub use branch::{branch_score, match_branch, BRANCH_PREFERENCES};
pub use engine::{
    passes_filter, recommend, score_offerings, Recommendation, RecommendDiagnostics,
    RecommendedOffering, ScoredOffering, MAX_RECOMMENDATIONS,
};
pub use preference::{Preference, DEFAULT_CATEGORY};
pub use validation::{parse_preference, PreferenceError, REQUIRED_FIELDS};
pub use weights::ScoreWeights;
