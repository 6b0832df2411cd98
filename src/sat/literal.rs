#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean variables and literals.
//!
//! A literal packs its variable and polarity into one `u32`: the variable index is
//! shifted left by one and the low bit is set for negative literals. Negation is a
//! single XOR, and `index()` can be used directly to address per-literal tables
//! such as watch lists.

use core::ops::{Neg, Not};
use std::fmt::{Display, Formatter};

/// A 0-based Boolean variable index.
pub type Variable = u32;

/// The largest variable index that still fits the packed literal encoding.
pub const MAX_VARIABLE: Variable = u32::MAX >> 1;

/// A variable together with its polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal(u32);

impl Literal {
    /// Creates a literal over `var`. `polarity == true` is the positive literal.
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        debug_assert!(var <= MAX_VARIABLE);
        Self((var << 1) | (!polarity as u32))
    }

    /// The positive literal of `var`.
    #[must_use]
    pub const fn positive(var: Variable) -> Self {
        Self::new(var, true)
    }

    /// The negative literal of `var`.
    #[must_use]
    pub const fn negative(var: Variable) -> Self {
        Self::new(var, false)
    }

    /// The underlying variable.
    #[must_use]
    pub const fn variable(self) -> Variable {
        self.0 >> 1
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(self) -> bool {
        self.0 & 1 == 0
    }

    /// `true` for a negative literal.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// The complementary literal.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Dense index of this literal, `2 * var` or `2 * var + 1`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// DIMACS form: `var + 1`, negative when the literal is negated.
    ///
    /// # Panics
    ///
    /// If the variable does not fit an `i32` once shifted to 1-based numbering.
    #[must_use]
    pub fn to_i32(self) -> i32 {
        let var = i32::try_from(self.variable() + 1).expect("variable does not fit DIMACS i32");
        if self.polarity() { var } else { -var }
    }

    /// Parses a non-zero DIMACS literal. Returns `None` for `0` or for values whose
    /// variable does not fit the packed encoding.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        if value == 0 {
            return None;
        }
        let var = value.unsigned_abs() - 1;
        (var <= MAX_VARIABLE).then(|| Self::new(var, value.is_positive()))
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_i32())
    }
}
