use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

use crate::{AdvisorError, Result};

/// Blackjack value of an Ace before any soft reduction.
pub const ACE_VALUE: u8 = 11;

/// Card symbol as a player would type it. Parsing ignores ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Rank {
    #[strum(to_string = "2")]
    Two = 0,
    #[strum(to_string = "3")]
    Three,
    #[strum(to_string = "4")]
    Four,
    #[strum(to_string = "5")]
    Five,
    #[strum(to_string = "6")]
    Six,
    #[strum(to_string = "7")]
    Seven,
    #[strum(to_string = "8")]
    Eight,
    #[strum(to_string = "9")]
    Nine,
    #[strum(to_string = "10")]
    Ten,
    #[strum(to_string = "J")]
    Jack,
    #[strum(to_string = "Q")]
    Queen,
    #[strum(to_string = "K")]
    King,
    #[strum(to_string = "A")]
    Ace,
}

impl Rank {
    pub const COUNT: usize = 13;

    /// Parses a card symbol, mapping any failure to `AdvisorError::InvalidCard`.
    pub fn parse(symbol: &str) -> Result<Rank> {
        Rank::from_str(symbol).map_err(|_| AdvisorError::InvalidCard(symbol.to_string()))
    }

    pub fn blackjack_value(&self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => ACE_VALUE,
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

/// Maps a card symbol to its blackjack value: 2-10 at face value, J/Q/K as 10
/// and A as 11.
pub fn card_to_value(card: &str) -> Result<u8> {
    Rank::parse(card).map(|rank| rank.blackjack_value())
}

/// Converts every symbol of a hand, failing on the first unknown one.
pub fn cards_to_values<S: AsRef<str>>(cards: &[S]) -> Result<Vec<u8>> {
    cards.iter().map(|card| card_to_value(card.as_ref())).collect()
}
