pub mod card;
mod error;
pub mod hand;
pub mod simulation;
pub mod tools;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use card::{card_to_value, Rank};
pub use error::{AdvisorError, Result};
pub use hand::{best_total, parse_hand};
pub use simulation::{recommend, DrawMode, Recommendation, SimulationOptions, TrialResult};

/// The two moves the advisor chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum Decision {
    #[serde(rename = "HIT")]
    Hit,
    #[serde(rename = "STAND")]
    Stand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_parses_from_upper_case_names() {
        assert_eq!("HIT".parse::<Decision>().unwrap(), Decision::Hit);
        assert_eq!("STAND".parse::<Decision>().unwrap(), Decision::Stand);
        assert!("DOUBLE".parse::<Decision>().is_err());
    }

    #[test]
    fn decision_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Decision::Hit).unwrap(), "\"HIT\"");
        assert_eq!(serde_json::to_string(&Decision::Stand).unwrap(), "\"STAND\"");
    }

    #[test]
    fn decision_displays_its_serialized_name() {
        assert_eq!(Decision::Hit.to_string(), "HIT");
        assert_eq!(Decision::Stand.to_string(), "STAND");
    }
}
