pub mod elo;
pub mod head_to_head;
pub mod store;
pub mod types;
pub mod weighting;

pub use elo::{EloEngine, expected_score};
pub use head_to_head::HeadToHead;
pub use store::RatingStore;
pub use types::{FormEntry, HeadToHeadSummary, Meeting, RatingEntry, RatingValue};
pub use weighting::calculate_weight;
