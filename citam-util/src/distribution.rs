use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Distributions defined by a domain of [0.0, 1.0]. A lot like general random
/// distributions, but you can plot the contents on a graph.
pub trait PlottedDistribution {
    type Item;

    /// Sample the distribution using a value between 0 and 1.
    ///
    /// This maps to the whole probability space of the distribution.
    fn plot(&self, x: f32) -> Self::Item;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Item {
        self.plot(rng.random::<f32>())
    }
}

/// A stepped integer range, e.g. a duration grid `[min, max]` in increments
/// of `step`. Used for meeting lengths and schedule item durations, both of
/// which are specified that way in the simulation's input parameters.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize,
)]
pub struct RangeDistribution {
    min: i32,
    step: i32,
    max: i32,
}

impl RangeDistribution {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, step: 1, max }
    }

    pub fn with_step(mut self, step: i32) -> Self {
        assert!(step > 0);
        self.step = step;
        self
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn step(&self) -> i32 {
        self.step
    }
}

impl Iterator for RangeDistribution {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.min > self.max {
            return None;
        }

        let current = self.min;
        self.min += self.step;
        Some(current)
    }
}

impl PlottedDistribution for RangeDistribution {
    type Item = i32;

    fn plot(&self, x: f32) -> i32 {
        let range = (self.max - self.min) / self.step;
        if range <= 0 {
            return self.min;
        }

        // Plot the parameter in the range of positions and floor down to
        // integer.
        let pos = (x * range as f32) as i32;
        self.min + pos * self.step
    }
}

impl From<RangeInclusive<i32>> for RangeDistribution {
    fn from(range: RangeInclusive<i32>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_is_clamped_to_grid() {
        let d = RangeDistribution::new(900, 7200).with_step(900);
        for i in 0..=10 {
            let v = d.plot(i as f32 / 10.0);
            assert!((900..=7200).contains(&v));
            assert_eq!((v - 900) % 900, 0);
        }
    }

    #[test]
    fn iterates_the_grid() {
        let d = RangeDistribution::new(2, 10).with_step(2);
        assert_eq!(d.collect::<Vec<_>>(), vec![2, 4, 6, 8, 10]);
    }
}
