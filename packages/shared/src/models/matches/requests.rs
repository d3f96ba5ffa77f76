use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of a round score update. Scores outside 0..=10 are clamped, not
/// rejected. `vyrazacka` replaces the round's counters wholesale when given.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoreUpdateRequest {
    pub score_a: i32,
    pub score_b: i32,
    #[serde(default)]
    pub vyrazacka: Option<HashMap<String, i32>>,
}
