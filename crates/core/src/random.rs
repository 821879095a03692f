//! Random-variate source abstraction.

/// A seeded source of random variates.
///
/// Implementations must be deterministic for a given seed: the same sequence
/// of calls yields the same sequence of values. Every draw permanently
/// advances the stream.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform real in `[low, high)`.
    fn uniform_range(&mut self, low: f64, high: f64) -> f64;

    /// Exponential draw with the given mean (`1 / rate`).
    fn exponential(&mut self, mean: f64) -> f64;

    /// Uniform choice among indices `0..n`. `n` must be non-zero.
    fn choose_index(&mut self, n: usize) -> usize;
}
