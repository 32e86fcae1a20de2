//! The operations an agent can call, with the descriptions it uses to pick
//! between them.
//!
//! Every operation is pure apart from logging and reports failures as
//! `AdvisorError` without retrying. A caller that wants to dispatch on a tool
//! name can deserialize a [`ToolCall`] from JSON such as
//! `{"tool": "parse_hand", "cards": ["A", "6"]}`.

use std::collections::HashMap;
use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::simulation::{
    recommend, SimulationOptions, DEFAULT_SIMULATIONS, DEFAULT_SIMULATIONS_WITH_SEEN,
};
use crate::{hand, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

pub const PARSE_HAND: ToolSpec = ToolSpec {
    name: "parse_hand",
    description: "Given a list of cards (e.g. ['A', '6']), return the total hand value and whether the hand is soft (contains Ace as 11).",
};

pub const HAND_VALUE: ToolSpec = ToolSpec {
    name: "hand_value",
    description: "Given a list of card values (e.g. [10, 11]), return the final hand value considering Aces.",
};

pub const SIMULATE_BEST_DECISION: ToolSpec = ToolSpec {
    name: "simulate_best_decision",
    description: "Given a list of player's cards and a dealer's visible card, simulate hit vs stand outcomes and recommend the better move. Optional num_simulations (default 100).",
};

pub const SIMULATE_BEST_DECISION_WITH_SEEN: ToolSpec = ToolSpec {
    name: "simulate_best_decision_with_seen",
    description: "Simulate hit vs stand while accounting for previously seen cards (single 52-card deck). seen_cards maps a rank such as 'A' or '10' to how many were seen. Optional num_simulations (default 1000).",
};

pub const TOOLS: [ToolSpec; 4] = [
    PARSE_HAND,
    HAND_VALUE,
    SIMULATE_BEST_DECISION,
    SIMULATE_BEST_DECISION_WITH_SEEN,
];

/// Total and softness of a list of card symbols.
pub fn parse_hand<S: AsRef<str>>(cards: &[S]) -> Result<(u16, bool)> {
    hand::parse_hand(cards)
}

/// Best total of a list of card values, with 11 standing for an Ace.
pub fn hand_value(values: &[u8]) -> u16 {
    hand::best_total(values)
}

/// Simulates HIT and STAND from an infinite deck and returns the report.
pub fn simulate_best_decision<S: AsRef<str>>(
    cards: &[S],
    dealer_card: &str,
    options: &SimulationOptions,
) -> Result<String> {
    let recommendation = recommend(cards, dealer_card, None, options)?;
    info!(
        "simulate_best_decision(cards={:?}, dealer_card={}) = {}",
        symbols(cards),
        dealer_card,
        recommendation.decision
    );
    Ok(recommendation.report())
}

/// Simulates HIT and STAND from a single deck without the hand, the dealer's
/// up card and the seen cards, and returns the report.
pub fn simulate_best_decision_with_seen<S: AsRef<str>>(
    cards: &[S],
    dealer_card: &str,
    seen_cards: &HashMap<String, i32>,
    options: &SimulationOptions,
) -> Result<String> {
    let recommendation = recommend(cards, dealer_card, Some(seen_cards), options)?;
    info!(
        "simulate_best_decision_with_seen(cards={:?}, dealer_card={}, seen_cards={:?}) = {}",
        symbols(cards),
        dealer_card,
        seen_cards,
        recommendation.decision
    );
    Ok(recommendation.report())
}

fn symbols<S: AsRef<str>>(cards: &[S]) -> Vec<&str> {
    cards.iter().map(|card| card.as_ref()).collect()
}

fn default_simulations() -> u32 {
    DEFAULT_SIMULATIONS
}

fn default_simulations_with_seen() -> u32 {
    DEFAULT_SIMULATIONS_WITH_SEEN
}

/// A tool invocation as an agent would emit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    ParseHand {
        cards: Vec<String>,
    },
    HandValue {
        hand: Vec<u8>,
    },
    SimulateBestDecision {
        cards: Vec<String>,
        dealer_card: String,
        #[serde(default = "default_simulations")]
        num_simulations: u32,
    },
    SimulateBestDecisionWithSeen {
        cards: Vec<String>,
        dealer_card: String,
        #[serde(default)]
        seen_cards: HashMap<String, i32>,
        #[serde(default = "default_simulations_with_seen")]
        num_simulations: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Hand { total: u16, is_soft: bool },
    Value(u16),
    Report(String),
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Hand { total, is_soft } => write!(f, "({}, {})", total, is_soft),
            ToolOutput::Value(value) => write!(f, "{}", value),
            ToolOutput::Report(report) => write!(f, "{}", report),
        }
    }
}

impl ToolCall {
    pub fn spec(&self) -> ToolSpec {
        match self {
            ToolCall::ParseHand { .. } => PARSE_HAND,
            ToolCall::HandValue { .. } => HAND_VALUE,
            ToolCall::SimulateBestDecision { .. } => SIMULATE_BEST_DECISION,
            ToolCall::SimulateBestDecisionWithSeen { .. } => SIMULATE_BEST_DECISION_WITH_SEEN,
        }
    }

    /// Runs the call. `options` supplies the seed and thread count, its trial
    /// count is replaced by the call's `num_simulations`.
    pub fn invoke(&self, options: &SimulationOptions) -> Result<ToolOutput> {
        match self {
            ToolCall::ParseHand { cards } => {
                let (total, is_soft) = parse_hand(cards)?;
                Ok(ToolOutput::Hand { total, is_soft })
            }
            ToolCall::HandValue { hand } => Ok(ToolOutput::Value(hand_value(hand))),
            ToolCall::SimulateBestDecision {
                cards,
                dealer_card,
                num_simulations,
            } => {
                let options = SimulationOptions {
                    trials: *num_simulations,
                    ..*options
                };
                simulate_best_decision(cards, dealer_card, &options).map(ToolOutput::Report)
            }
            ToolCall::SimulateBestDecisionWithSeen {
                cards,
                dealer_card,
                seen_cards,
                num_simulations,
            } => {
                let options = SimulationOptions {
                    trials: *num_simulations,
                    ..*options
                };
                simulate_best_decision_with_seen(cards, dealer_card, seen_cards, &options)
                    .map(ToolOutput::Report)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdvisorError;

    fn seeded() -> SimulationOptions {
        SimulationOptions::new(1).with_seed(42)
    }

    #[test]
    fn tool_names_are_unique() {
        for (i, a) in TOOLS.iter().enumerate() {
            for b in &TOOLS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
            assert!(!a.description.is_empty());
        }
    }

    #[test]
    fn hand_value_examples() {
        assert_eq!(hand_value(&[10, 10, 10]), 30);
        assert_eq!(hand_value(&[11, 11, 9]), 21);
        assert_eq!(hand_value(&[10, 11]), 21);
        assert_eq!(hand_value(&vec![255; 300]), u16::MAX);
    }

    #[test]
    fn parse_hand_call_from_json() {
        let call: ToolCall =
            serde_json::from_str(r#"{"tool": "parse_hand", "cards": ["A", "6"]}"#).unwrap();
        assert_eq!(call.spec(), PARSE_HAND);
        let output = call.invoke(&seeded()).unwrap();
        assert_eq!(
            output,
            ToolOutput::Hand {
                total: 17,
                is_soft: true
            }
        );
        assert_eq!(output.to_string(), "(17, true)");
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({"total": 17, "is_soft": true})
        );
    }

    #[test]
    fn hand_value_call_from_json() {
        let call: ToolCall =
            serde_json::from_str(r#"{"tool": "hand_value", "hand": [11, 11, 9]}"#).unwrap();
        assert_eq!(call.invoke(&seeded()).unwrap(), ToolOutput::Value(21));
    }

    #[test]
    fn simulation_calls_default_their_trial_counts() {
        let call: ToolCall = serde_json::from_str(
            r#"{"tool": "simulate_best_decision", "cards": ["10", "6"], "dealer_card": "7"}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::SimulateBestDecision {
                cards: vec!["10".to_string(), "6".to_string()],
                dealer_card: "7".to_string(),
                num_simulations: 100,
            }
        );

        let call: ToolCall = serde_json::from_str(
            r#"{"tool": "simulate_best_decision_with_seen", "cards": ["10", "6"],
                "dealer_card": "7", "seen_cards": {"A": 2}}"#,
        )
        .unwrap();
        match call {
            ToolCall::SimulateBestDecisionWithSeen {
                num_simulations,
                ref seen_cards,
                ..
            } => {
                assert_eq!(num_simulations, 1000);
                assert_eq!(seen_cards.get("A"), Some(&2));
            }
            _ => panic!("wrong tool"),
        }
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let parsed: std::result::Result<ToolCall, _> =
            serde_json::from_str(r#"{"tool": "double_down", "cards": ["A"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn simulation_tool_reports_use_requested_trials() {
        let report = simulate_best_decision(&["10", "6"], "7", &SimulationOptions::new(250).with_seed(8))
            .unwrap();
        assert!(report.starts_with("Simulated 250 games per move.\n"));
        assert!(report.contains("you should **"));

        let seen: HashMap<String, i32> = [("A".to_string(), 4)].into_iter().collect();
        let report = simulate_best_decision_with_seen(
            &["10", "6"],
            "7",
            &seen,
            &SimulationOptions::new(300).with_seed(8),
        )
        .unwrap();
        assert!(report.starts_with("Simulated 300 games with adjusted deck.\n"));
        assert!(report.contains("With seen cards considered"));
    }

    #[test]
    fn invoke_overrides_trials_but_keeps_seed() {
        let call = ToolCall::SimulateBestDecision {
            cards: vec!["9".to_string(), "7".to_string()],
            dealer_card: "10".to_string(),
            num_simulations: 400,
        };
        let first = call.invoke(&seeded()).unwrap();
        let second = call.invoke(&seeded()).unwrap();
        assert_eq!(first, second);
        assert!(first.to_string().starts_with("Simulated 400 games per move."));
    }

    #[test]
    fn errors_surface_from_tools() {
        assert_eq!(
            parse_hand(&["Z"]),
            Err(AdvisorError::InvalidCard("Z".to_string()))
        );
        let call = ToolCall::SimulateBestDecision {
            cards: vec!["9".to_string()],
            dealer_card: "7".to_string(),
            num_simulations: 0,
        };
        assert!(matches!(
            call.invoke(&seeded()),
            Err(AdvisorError::InvalidArgument(_))
        ));
    }
}
