pub mod dealer;
pub mod shoe;

use std::collections::HashMap;
use std::fmt;
use std::ops::AddAssign;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::card::cards_to_values;
use crate::hand::{best_total, is_bust};
use crate::{card_to_value, AdvisorError, Decision, Result};

use self::dealer::{draw_to_seventeen, simulate_dealer};
use self::shoe::DrawPool;

/// Trials per move when nothing is known about the shoe.
pub const DEFAULT_SIMULATIONS: u32 = 100;
/// Trials per move when the seen cards are taken into account.
pub const DEFAULT_SIMULATIONS_WITH_SEEN: u32 = 1000;
/// Requested worker threads are capped at this many per available core.
pub const MAX_THREADS_PER_CORE: usize = 4;

/// How the remaining cards are modelled during a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawMode {
    InfiniteDeck,
    SeenCards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Settles a hand that did not bust against the dealer's final total.
pub fn compare_totals(player_total: u16, dealer_total: u16) -> Outcome {
    if is_bust(dealer_total) || player_total > dealer_total {
        Outcome::Win
    } else if player_total < dealer_total {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrialResult {
    pub win: u32,
    pub loss: u32,
    pub draw: u32,
}

impl TrialResult {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.win += 1,
            Outcome::Loss => self.loss += 1,
            Outcome::Draw => self.draw += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.win + self.loss + self.draw
    }

    /// Fraction of trials won, rounded to three decimals.
    pub fn win_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        round_to_thousandths(self.win as f64 / total as f64)
    }
}

impl AddAssign for TrialResult {
    fn add_assign(&mut self, rhs: Self) {
        self.win += rhs.win;
        self.loss += rhs.loss;
        self.draw += rhs.draw;
    }
}

/// Rounds half to even, so 1/16 becomes 0.062.
fn round_to_thousandths(x: f64) -> f64 {
    (x * 1000.0).round_ties_even() / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationOptions {
    /// Trials per move. Must be positive.
    pub trials: u32,
    /// Fixes the random draws. Without it every call is seeded from entropy.
    pub seed: Option<u64>,
    /// Worker threads. 0 uses all available cores.
    pub number_of_threads: usize,
}

impl SimulationOptions {
    pub fn new(trials: u32) -> Self {
        SimulationOptions {
            trials,
            seed: None,
            number_of_threads: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, number_of_threads: usize) -> Self {
        self.number_of_threads = number_of_threads;
        self
    }

    fn resolved_threads(&self) -> usize {
        let cores = match std::thread::available_parallelism() {
            Ok(n) => n.get(),
            Err(_) => 1,
        };
        let number_of_threads = {
            if self.number_of_threads == 0 {
                cores
            } else {
                self.number_of_threads.min(cores * MAX_THREADS_PER_CORE)
            }
        };
        number_of_threads.clamp(1, self.trials.max(1) as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub decision: Decision,
    pub stand_win_rate: f64,
    pub hit_win_rate: f64,
    pub stand: TrialResult,
    pub hit: TrialResult,
    pub trials: u32,
    pub mode: DrawMode,
}

impl Recommendation {
    pub fn from_results(mode: DrawMode, trials: u32, stand: TrialResult, hit: TrialResult) -> Self {
        let stand_win_rate = stand.win_rate();
        let hit_win_rate = hit.win_rate();
        let decision = if hit_win_rate > stand_win_rate {
            Decision::Hit
        } else {
            Decision::Stand
        };
        Recommendation {
            decision,
            stand_win_rate,
            hit_win_rate,
            stand,
            hit,
            trials,
            mode,
        }
    }

    /// The text handed back to the caller of the simulation tools.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stand = self.stand_win_rate * 100.0;
        let hit = self.hit_win_rate * 100.0;
        match self.mode {
            DrawMode::InfiniteDeck => {
                writeln!(f, "Simulated {} games per move.", self.trials)?;
                writeln!(f, " - If you STAND: Win rate = {:.1}%", stand)?;
                writeln!(f, " - If you HIT:   Win rate = {:.1}%", hit)?;
                writeln!(f)?;
                write!(
                    f,
                    "👉 Based on simulation, you should **{}**.",
                    self.decision
                )
            }
            DrawMode::SeenCards => {
                writeln!(f, "Simulated {} games with adjusted deck.", self.trials)?;
                writeln!(f, " - STAND win rate: {:.1}%", stand)?;
                writeln!(f, " - HIT win rate:   {:.1}%", hit)?;
                writeln!(f)?;
                write!(
                    f,
                    "👉 With seen cards considered, you should **{}**.",
                    self.decision
                )
            }
        }
    }
}

/// One STAND trial: the player keeps `stand_total` and the dealer plays out.
pub fn play_stand_trial<R: Rng>(
    stand_total: u16,
    dealer_up_card: u8,
    pool: &DrawPool,
    rng: &mut R,
) -> Outcome {
    let dealer_total = simulate_dealer(dealer_up_card, || pool.draw(rng));
    compare_totals(stand_total, dealer_total)
}

/// One HIT trial: the player takes a card and then keeps drawing to 17. A bust
/// loses without the dealer playing.
pub fn play_hit_trial<R: Rng>(
    player_values: &[u8],
    dealer_up_card: u8,
    pool: &DrawPool,
    rng: &mut R,
) -> Outcome {
    let mut hand = player_values.to_vec();
    hand.push(pool.draw(rng));
    let player_total = draw_to_seventeen(&mut hand, || pool.draw(rng));
    if is_bust(player_total) {
        return Outcome::Loss;
    }
    let dealer_total = simulate_dealer(dealer_up_card, || pool.draw(rng));
    compare_totals(player_total, dealer_total)
}

/// Runs `trials` STAND trials followed by `trials` HIT trials.
fn run_trials<R: Rng>(
    player_values: &[u8],
    dealer_up_card: u8,
    pool: &DrawPool,
    trials: u32,
    rng: &mut R,
) -> (TrialResult, TrialResult) {
    let stand_total = best_total(player_values);

    let mut stand = TrialResult::default();
    for _ in 0..trials {
        stand.record(play_stand_trial(stand_total, dealer_up_card, pool, rng));
    }

    let mut hit = TrialResult::default();
    for _ in 0..trials {
        hit.record(play_hit_trial(player_values, dealer_up_card, pool, rng));
    }

    (stand, hit)
}

/// Compares HIT and STAND for already valued cards.
///
/// Trials are split into one contiguous batch per worker. Worker `i` draws from
/// its own generator seeded with `seed + i`, so a fixed seed and thread count
/// always reproduce the same result.
pub fn simulate(
    player_values: &[u8],
    dealer_up_card: u8,
    pool: &DrawPool,
    mode: DrawMode,
    options: &SimulationOptions,
) -> Result<Recommendation> {
    if options.trials == 0 {
        return Err(AdvisorError::InvalidArgument(String::from(
            "number of simulations must be positive",
        )));
    }

    let number_of_threads = options.resolved_threads();
    let base_seed = options.seed.unwrap_or_else(rand::random);
    let batch_size = |index: usize| {
        let index = index as u32;
        let threads = number_of_threads as u32;
        options.trials / threads + u32::from(index < options.trials % threads)
    };
    let run_batch = |index: usize| {
        let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));
        let trials = batch_size(index);
        trace!("Worker {} runs {} trials per move", index, trials);
        run_trials(player_values, dealer_up_card, pool, trials, &mut rng)
    };

    let (mut stand, mut hit) = (TrialResult::default(), TrialResult::default());
    std::thread::scope(|scope| {
        let workers: Vec<_> = (1..number_of_threads)
            .map(|index| scope.spawn(move || run_batch(index)))
            .collect();

        let (s, h) = run_batch(0);
        stand += s;
        hit += h;

        for worker in workers {
            let (s, h) = worker
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
            stand += s;
            hit += h;
        }
    });

    Ok(Recommendation::from_results(mode, options.trials, stand, hit))
}

/// Recommends HIT or STAND for the given hand against the dealer up card.
///
/// Without `seen` every draw comes from the infinite-deck approximation. With
/// it, draws come from a single deck minus the hand, the up card and the seen
/// cards.
pub fn recommend<S: AsRef<str>>(
    player_cards: &[S],
    dealer_card: &str,
    seen: Option<&HashMap<String, i32>>,
    options: &SimulationOptions,
) -> Result<Recommendation> {
    let player_values = cards_to_values(player_cards)?;
    let dealer_up_card = card_to_value(dealer_card)?;
    let (pool, mode) = match seen {
        Some(seen) => (
            DrawPool::with_seen(player_cards, dealer_card, seen)?,
            DrawMode::SeenCards,
        ),
        None => (DrawPool::infinite_deck(), DrawMode::InfiniteDeck),
    };

    let recommendation = simulate(&player_values, dealer_up_card, &pool, mode, options)?;
    debug!(
        "recommend(cards={:?}, dealer_card={}, seen_cards={:?}) = {}",
        player_cards.iter().map(|c| c.as_ref()).collect::<Vec<_>>(),
        dealer_card,
        seen,
        recommendation.decision
    );
    Ok(recommendation)
}
