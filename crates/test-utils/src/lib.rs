//! Shared test utilities for the Southern Ocean preparation workspace.
//!
//! This crate provides:
//! - Synthetic ocean and sea-ice field generators
//! - A small fixture grid and a catalog serving it
//! - Approximate-equality assertions
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that `actual` is within `fraction` of `expected`, relative to `expected`.
///
/// ```
/// use test_utils::assert_rel_eq;
///
/// assert_rel_eq!(111.19, 111.2, 0.001);
/// ```
#[macro_export]
macro_rules! assert_rel_eq {
    ($actual:expr, $expected:expr, $fraction:expr) => {{
        let expected: f64 = $expected as f64;
        $crate::assert_approx_eq!($actual, expected, (expected * $fraction as f64).abs());
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_rel_eq() {
        assert_rel_eq!(1000.5, 1000.0, 0.001);
    }
}
