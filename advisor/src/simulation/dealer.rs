use crate::hand::best_total;

/// Total at which both the dealer and the auto-played HIT hand stop drawing.
/// Soft 17 stands as well.
pub const STAND_ON: u16 = 17;

/// Keeps drawing into `hand` until it totals 17 or more and returns the final
/// total.
pub fn draw_to_seventeen<F: FnMut() -> u8>(hand: &mut Vec<u8>, mut draw: F) -> u16 {
    let mut total = best_total(hand);
    while total < STAND_ON {
        hand.push(draw());
        total = best_total(hand);
    }
    total
}

/// Plays out the dealer from the up card: the hole card is drawn, then the
/// dealer hits until reaching 17.
pub fn simulate_dealer<F: FnMut() -> u8>(up_card: u8, mut draw: F) -> u16 {
    let mut hand = Vec::with_capacity(6);
    hand.push(up_card);
    hand.push(draw());
    draw_to_seventeen(&mut hand, draw)
}
