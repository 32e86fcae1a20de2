use std::collections::HashMap;

use log::debug;
use rand::Rng;
use strum::IntoEnumIterator;

use crate::{AdvisorError, Rank, Result};

/// Copies of each rank in a single 52-card deck.
pub const STANDARD_COMPOSITION: [i32; Rank::COUNT] = [4; Rank::COUNT];

/// The card values of the infinite-deck approximation. The four ten-valued ranks
/// are each listed, so a ten is four times as likely as any other value.
pub const INFINITE_DECK_VALUES: [u8; Rank::COUNT] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10, 11];

/// Remaining count of every rank in a single deck.
///
/// Counts are signed: seen-card reports may overlap with the dealt cards, so
/// depleting never fails on a rank that is already used up. Negative counts
/// are clamped when the shoe is flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    counts: [i32; Rank::COUNT],
}

impl Shoe {
    /// Creates a full single-deck shoe.
    pub fn standard() -> Shoe {
        Shoe {
            counts: STANDARD_COMPOSITION,
        }
    }

    pub fn count(&self, rank: Rank) -> i32 {
        self.counts[rank.index()]
    }

    /// Removes one card per given symbol.
    pub fn deplete<S: AsRef<str>>(&mut self, cards: &[S]) -> Result<()> {
        for card in cards {
            let rank = Rank::parse(card.as_ref())?;
            self.counts[rank.index()] = self.counts[rank.index()].saturating_sub(1);
        }
        Ok(())
    }

    /// Removes the reported number of already seen cards of each rank. Keys
    /// naming the same rank in different case add up. Counts saturate, so any
    /// amount beyond the deck just leaves the rank exhausted.
    pub fn apply_seen(&mut self, seen: &HashMap<String, i32>) -> Result<()> {
        for (card, &count) in seen {
            let rank = Rank::parse(card)?;
            if count < 0 {
                return Err(AdvisorError::InvalidArgument(format!(
                    "seen count for {} must not be negative, got {}",
                    card, count
                )));
            }
            self.counts[rank.index()] = self.counts[rank.index()].saturating_sub(count);
        }
        Ok(())
    }

    /// Lists the value of every drawable card, one entry per copy.
    pub fn flatten(&self) -> Result<Vec<u8>> {
        let mut values = Vec::with_capacity(52);
        for rank in Rank::iter() {
            let count = self.count(rank).max(0) as usize;
            values.extend(std::iter::repeat(rank.blackjack_value()).take(count));
        }
        if values.is_empty() {
            return Err(AdvisorError::EmptyShoe);
        }
        Ok(values)
    }
}

impl Default for Shoe {
    fn default() -> Self {
        Self::standard()
    }
}

/// Where simulated cards come from. Draws are with replacement, so the pool
/// stays unchanged for a whole simulation and can be shared by workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPool {
    values: Vec<u8>,
}

impl DrawPool {
    /// The infinite-deck approximation: every draw is independent of the cards
    /// already dealt.
    pub fn infinite_deck() -> DrawPool {
        DrawPool {
            values: INFINITE_DECK_VALUES.to_vec(),
        }
    }

    /// Builds the finite pool left after removing the hand, the dealer up card
    /// and every seen card from a fresh deck.
    pub fn with_seen<S: AsRef<str>>(
        cards: &[S],
        dealer_card: &str,
        seen: &HashMap<String, i32>,
    ) -> Result<DrawPool> {
        let mut shoe = Shoe::standard();
        shoe.deplete(cards)?;
        shoe.deplete(&[dealer_card])?;
        shoe.apply_seen(seen)?;
        let values = shoe.flatten()?;
        debug!("Adjusted shoe has {} drawable cards: {:?}", values.len(), shoe);
        Ok(DrawPool { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> u8 {
        self.values[rng.gen_range(0..self.values.len())]
    }
}
