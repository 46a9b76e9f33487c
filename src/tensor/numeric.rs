pub use num::{Float, One, Zero};
use rand::distributions::uniform::SampleUniform;
use std::cmp::PartialEq;
use std::iter::Sum;

pub use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub trait Numeric:
    Float
    + AddAssign
    + SubAssign
    + MulAssign
    + Sum
    + PartialEq
    + SampleUniform
    + std::fmt::Debug
    + std::fmt::Display
{
    /// Converts a configuration constant or dataset literal into the element type.
    fn lit(value: f64) -> Self;
}
// https://stackoverflow.com/questions/42381185/specifying-generic-parameter-to-belong-to-a-small-set-of-types
macro_rules! numeric_impl {
    ($($t: ty),+) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn lit(value: f64) -> Self {
                    value as $t
                }
            }
        )+
    }
}

numeric_impl!(f32, f64);

#[test]
fn test_lit_round_trips_reference_constants() {
    assert_eq!(f32::lit(0.4), 0.4f32);
    assert_eq!(f64::lit(0.6), 0.6f64);
}
