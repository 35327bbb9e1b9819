//! Four binary dice.
//!
//! Each roll throws four two-sided dice and moves by the number that came up
//! marked. Totals run 0..=4 with a binomial spread (2 is most likely, 0 and
//! 4 are 1 in 16). The individual bits are kept so recorded games can be
//! replayed and audited.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, GameRngState};

/// Number of dice thrown per roll.
pub const DICE_COUNT: usize = 4;

/// Outcome of one throw of the four dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollResult {
    values: [bool; DICE_COUNT],
}

impl RollResult {
    /// Build a roll from individual dice.
    #[must_use]
    pub const fn new(values: [bool; DICE_COUNT]) -> Self {
        Self { values }
    }

    /// A roll with the given total, marked dice first.
    ///
    /// Returns `None` for totals above four.
    #[must_use]
    pub fn from_total(total: u8) -> Option<Self> {
        if total as usize > DICE_COUNT {
            return None;
        }
        let mut values = [false; DICE_COUNT];
        for value in values.iter_mut().take(total as usize) {
            *value = true;
        }
        Some(Self { values })
    }

    /// The individual dice, `true` for a marked face.
    #[must_use]
    pub const fn values(&self) -> [bool; DICE_COUNT] {
        self.values
    }

    /// The dice as 0/1 bits.
    #[must_use]
    pub fn bits(&self) -> [u8; DICE_COUNT] {
        self.values.map(u8::from)
    }

    /// Squares to move, 0..=4.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.values.iter().filter(|&&v| v).count() as u8
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.bits();
        write!(f, "{} [{a}{b}{c}{d}]", self.total())
    }
}

/// Source of rolls for one game.
///
/// Each die is an independent fair coin drawn from a seeded `GameRng`, so a
/// game's rolls are reproducible from its seed.
#[derive(Clone, Debug)]
pub struct DiceEngine {
    rng: GameRng,
}

impl DiceEngine {
    /// Create a dice engine seeded for reproducible rolls.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    /// Resume from a saved RNG state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        Self {
            rng: GameRng::from_state(state),
        }
    }

    /// Throw the four dice.
    pub fn roll(&mut self) -> RollResult {
        let mut values = [false; DICE_COUNT];
        for value in &mut values {
            *value = self.rng.gen_bool(0.5);
        }
        RollResult { values }
    }

    /// An independent dice stream for lookahead, leaving this one's future
    /// rolls unchanged.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            rng: self.rng.fork(),
        }
    }

    /// Current RNG state for checkpointing.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        self.rng.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_matches_bits() {
        let mut dice = DiceEngine::new(1);
        for _ in 0..200 {
            let roll = dice.roll();
            let sum: u8 = roll.bits().iter().sum();
            assert_eq!(roll.total(), sum);
            assert!(roll.total() <= 4);
        }
    }

    #[test]
    fn test_from_total() {
        for total in 0..=4 {
            assert_eq!(RollResult::from_total(total).unwrap().total(), total);
        }
        assert!(RollResult::from_total(5).is_none());
        assert_eq!(
            RollResult::from_total(2).unwrap().values(),
            [true, true, false, false]
        );
    }

    #[test]
    fn test_display() {
        let roll = RollResult::new([true, false, true, false]);
        assert_eq!(roll.to_string(), "2 [1010]");
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = DiceEngine::new(42);
        let mut b = DiceEngine::new(42);
        for _ in 0..50 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_state_resume() {
        let mut dice = DiceEngine::new(9);
        for _ in 0..10 {
            dice.roll();
        }
        let saved = dice.state();
        let expected: Vec<_> = (0..20).map(|_| dice.roll()).collect();

        let mut resumed = DiceEngine::from_state(&saved);
        let actual: Vec<_> = (0..20).map(|_| resumed.roll()).collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_bit_frequencies_are_fair() {
        let mut dice = DiceEngine::new(2024);
        let n = 40_000;
        let mut ones = [0u32; DICE_COUNT];
        let mut joint = [[0u32; DICE_COUNT]; DICE_COUNT];

        for _ in 0..n {
            let bits = dice.roll().bits();
            for i in 0..DICE_COUNT {
                ones[i] += u32::from(bits[i]);
                for j in (i + 1)..DICE_COUNT {
                    joint[i][j] += u32::from(bits[i] & bits[j]);
                }
            }
        }

        for count in ones {
            let p = f64::from(count) / f64::from(n);
            assert!((p - 0.5).abs() < 0.02, "bit frequency {p} is not close to 0.5");
        }

        // Independence: P(bi & bj) ~ 0.25 for every pair
        for i in 0..DICE_COUNT {
            for j in (i + 1)..DICE_COUNT {
                let p = f64::from(joint[i][j]) / f64::from(n);
                assert!((p - 0.25).abs() < 0.02, "bits {i} and {j}: joint frequency {p}");
            }
        }
    }

    #[test]
    fn test_total_distribution_is_binomial() {
        let mut dice = DiceEngine::new(77);
        let n = 32_000;
        let mut totals = [0u32; 5];
        for _ in 0..n {
            totals[dice.roll().total() as usize] += 1;
        }
        let expected = [1.0, 4.0, 6.0, 4.0, 1.0].map(|k: f64| k / 16.0);
        for (count, p) in totals.iter().zip(expected) {
            let observed = f64::from(*count) / f64::from(n);
            assert!((observed - p).abs() < 0.02, "observed {observed}, expected {p}");
        }
    }
}
