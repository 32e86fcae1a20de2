use log::debug;

use crate::card::{cards_to_values, ACE_VALUE};
use crate::Result;

pub const BLACKJACK: u16 = 21;

/// Sums a hand, counting Aces as 1 instead of 11 one at a time until the hand
/// no longer busts or no Ace is left to reduce.
///
/// Totals beyond `u16::MAX` saturate.
pub fn best_total(values: &[u8]) -> u16 {
    let mut total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    let mut aces = values.iter().filter(|&&v| v == ACE_VALUE).count();

    while total > u64::from(BLACKJACK) && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    u16::try_from(total).unwrap_or(u16::MAX)
}

/// Returns the best total and whether the hand is soft.
///
/// A hand is reported soft when it holds an Ace and does not bust. This looks
/// at the unreduced values only, so a hand whose every Ace was reduced to 1 is
/// still reported soft.
pub fn parse_hand<S: AsRef<str>>(cards: &[S]) -> Result<(u16, bool)> {
    let values = cards_to_values(cards)?;
    let total = best_total(&values);
    let is_soft = values.contains(&ACE_VALUE) && total <= BLACKJACK;
    debug!("parse_hand({:?}) -> total={}, is_soft={}", values, total, is_soft);
    Ok((total, is_soft))
}

pub fn is_bust(total: u16) -> bool {
    total > BLACKJACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AdvisorError;

    #[test]
    fn pair_of_aces_is_twelve() {
        assert_eq!(best_total(&[11, 11]), 12);
        assert_eq!(parse_hand(&["A", "A"]).unwrap(), (12, true));
    }

    #[test]
    fn soft_seventeen() {
        assert_eq!(parse_hand(&["A", "6"]).unwrap(), (17, true));
    }

    #[test]
    fn two_faces_are_hard_twenty() {
        assert_eq!(parse_hand(&["K", "Q"]).unwrap(), (20, false));
    }

    #[test]
    fn bust_without_aces_is_not_reduced() {
        assert_eq!(best_total(&[10, 10, 10]), 30);
        assert!(is_bust(best_total(&[10, 10, 10])));
    }

    #[test]
    fn only_as_many_aces_as_needed_are_reduced() {
        assert_eq!(best_total(&[11, 11, 9]), 21);
        assert_eq!(best_total(&[11, 6, 9]), 16);
        assert_eq!(best_total(&[11, 11, 11, 11]), 14);
        assert_eq!(best_total(&[]), 0);
    }

    #[test]
    fn hands_without_aces_are_never_soft() {
        let hands: [&[&str]; 5] = [
            &["2", "3"],
            &["K", "Q"],
            &["10", "9", "5"],
            &["7", "7", "7"],
            &["J"],
        ];
        for hand in hands {
            assert!(!parse_hand(hand).unwrap().1, "hand {:?}", hand);
        }
    }

    #[test]
    fn unbusted_hands_with_an_ace_are_soft() {
        // A,6,9 counts its Ace as 1 but is still reported soft.
        let hands: [&[&str]; 4] = [&["A", "2"], &["A", "K"], &["A", "6", "9"], &["A", "A", "9"]];
        for hand in hands {
            let (total, is_soft) = parse_hand(hand).unwrap();
            assert!(total <= BLACKJACK);
            assert!(is_soft, "hand {:?}", hand);
        }
    }

    #[test]
    fn busted_hand_with_ace_is_not_soft() {
        assert_eq!(parse_hand(&["A", "K", "Q", "5"]).unwrap(), (26, false));
    }

    #[test]
    fn huge_hands_do_not_overflow() {
        assert_eq!(best_total(&vec![255u8; 300]), u16::MAX);
        // 7000 Aces sum past u16::MAX before every one is reduced to 1.
        assert_eq!(best_total(&vec![ACE_VALUE; 7000]), 7000);
    }

    #[test]
    fn best_total_ignores_card_order() {
        let hand = [11u8, 5, 11, 2, 10];
        let expected = best_total(&hand);
        let mut rotated = hand;
        for _ in 0..hand.len() {
            rotated.rotate_left(1);
            assert_eq!(best_total(&rotated), expected);
        }
        let mut reversed = hand;
        reversed.reverse();
        assert_eq!(best_total(&reversed), expected);
    }

    #[test]
    fn invalid_card_propagates() {
        assert_eq!(
            parse_hand(&["A", "15"]),
            Err(AdvisorError::InvalidCard("15".to_string()))
        );
    }
}
