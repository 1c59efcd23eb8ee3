//! Weighted categorical draws.
//!
//! Every categorical pick in the scene (ornament kind, foliage hue, palette
//! entry) goes through a [`WeightedTable`] so the intended mix is written down
//! as data instead of being implied by the order of `if` branches.
//!
//! ```ignore
//! let kinds = WeightedTable::new([(0.45, Light), (0.40, Ball), (0.15, Gift)])?;
//! let kind = *kinds.sample(&mut rng);
//! ```

use crate::error::ChoiceError;
use rand::Rng;

/// A table of `(weight, value)` pairs sampled with a single uniform draw.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    /// Values with their cumulative upper bound, normalized to end at 1.0.
    entries: Vec<(f32, T)>,
    weights: Vec<f32>,
}

impl<T> WeightedTable<T> {
    /// Build a table. Entries with a non-positive or non-finite weight are dropped.
    ///
    /// Weights do not need to sum to one; they are normalized.
    pub fn new<I>(pairs: I) -> Result<Self, ChoiceError>
    where
        I: IntoIterator<Item = (f32, T)>,
    {
        let kept: Vec<(f32, T)> = pairs
            .into_iter()
            .filter(|(w, _)| w.is_finite() && *w > 0.0)
            .collect();

        let total: f32 = kept.iter().map(|(w, _)| *w).sum();
        if kept.is_empty() || total <= 0.0 {
            return Err(ChoiceError::Empty);
        }

        let mut cumulative = 0.0;
        let mut weights = Vec::with_capacity(kept.len());
        let entries = kept
            .into_iter()
            .map(|(w, value)| {
                cumulative += w / total;
                weights.push(w / total);
                (cumulative, value)
            })
            .collect();

        Ok(Self { entries, weights })
    }

    /// Build a table where every value is equally likely.
    pub fn uniform<I>(values: I) -> Result<Self, ChoiceError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::new(values.into_iter().map(|v| (1.0, v)))
    }

    /// Map a uniform draw `u` in `[0, 1)` to a value.
    ///
    /// Values outside the range are clamped, so `u >= 1.0` returns the last entry.
    pub fn pick(&self, u: f32) -> &T {
        let u = if u.is_nan() { 0.0 } else { u };
        // Float accumulation can leave the last bound just under 1.0.
        let idx = self
            .entries
            .iter()
            .position(|(bound, _)| u < *bound)
            .unwrap_or(self.entries.len() - 1);
        &self.entries[idx].1
    }

    /// Draw a value using `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        self.pick(rng.gen::<f32>())
    }

    /// Normalized probability of each entry, in table order.
    pub fn probabilities(&self) -> impl Iterator<Item = (f32, &T)> {
        self.weights
            .iter()
            .zip(self.entries.iter())
            .map(|(w, (_, value))| (*w, value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; an empty table cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_follows_thresholds() {
        let table = WeightedTable::new([(0.45, 'L'), (0.40, 'B'), (0.15, 'G')]).unwrap();
        assert_eq!(*table.pick(0.0), 'L');
        assert_eq!(*table.pick(0.44), 'L');
        assert_eq!(*table.pick(0.46), 'B');
        assert_eq!(*table.pick(0.84), 'B');
        assert_eq!(*table.pick(0.86), 'G');
        assert_eq!(*table.pick(0.999), 'G');
    }

    #[test]
    fn test_out_of_range_draws_clamp() {
        let table = WeightedTable::new([(1.0, 1), (1.0, 2)]).unwrap();
        assert_eq!(*table.pick(-3.0), 1);
        assert_eq!(*table.pick(1.0), 2);
        assert_eq!(*table.pick(f32::NAN), 1);
    }

    #[test]
    fn test_weights_are_normalized() {
        let table = WeightedTable::new([(2.0, "a"), (6.0, "b")]).unwrap();
        let probs: Vec<f32> = table.probabilities().map(|(p, _)| p).collect();
        assert!((probs[0] - 0.25).abs() < 1e-6);
        assert!((probs[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_weights_are_dropped() {
        let table = WeightedTable::new([(0.0, 'x'), (-1.0, 'y'), (f32::NAN, 'z'), (1.0, 'k')]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(*table.pick(0.5), 'k');
    }

    #[test]
    fn test_empty_table_is_an_error() {
        assert_eq!(WeightedTable::<u8>::new([]).unwrap_err(), ChoiceError::Empty);
        assert_eq!(WeightedTable::new([(0.0, 1u8)]).unwrap_err(), ChoiceError::Empty);
    }

    #[test]
    fn test_uniform_sampling_hits_every_entry() {
        let table = WeightedTable::uniform(0..4u32).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut seen = [0u32; 4];
        for _ in 0..4000 {
            seen[*table.sample(&mut rng) as usize] += 1;
        }
        for count in seen {
            assert!((800..1200).contains(&count), "count {count}");
        }
    }
}
