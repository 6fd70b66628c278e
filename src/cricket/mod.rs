pub mod features;
pub mod match_state;
pub mod presentation;
pub mod projection;

pub use features::{derive_features, DeriveError, FeatureRecord, RatePolicy, FEATURE_COLUMNS};
pub use match_state::{City, MatchState, Team, UnknownName};
pub use presentation::{Chart, ChartKind, ProbabilityDisplay};
