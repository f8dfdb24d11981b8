use serde::{Deserialize, Serialize};

/// Policy applied when a division or rescaling discards non-zero digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero (truncation).
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest neighbour; ties away from zero.
    HalfUp,
    /// Nearest neighbour; ties towards zero.
    HalfDown,
    /// Nearest neighbour; ties towards positive infinity.
    HalfCeiling,
    /// Nearest neighbour; ties towards negative infinity.
    HalfFloor,
    /// Nearest neighbour; ties towards the even neighbour ("banker's rounding").
    HalfEven,
    /// Asserts the operation is exact; anything else is a
    /// [`NumberError::RoundingNecessary`](crate::NumberError::RoundingNecessary).
    Unnecessary,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 10] = [
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfCeiling,
        RoundingMode::HalfFloor,
        RoundingMode::HalfEven,
        RoundingMode::Unnecessary,
    ];

    /// Decide whether a truncated quotient must move one unit away from zero.
    ///
    /// `half_cmp` compares twice the discarded remainder against the divisor
    /// (both in magnitude), i.e. the discarded fraction against one half.
    pub(crate) fn should_increment(
        self,
        has_discarded_fraction: bool,
        is_positive_or_zero: bool,
        quotient_is_even: bool,
        half_cmp: std::cmp::Ordering,
    ) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};

        match self {
            RoundingMode::Up => has_discarded_fraction,
            RoundingMode::Down | RoundingMode::Unnecessary => false,
            RoundingMode::Ceiling => has_discarded_fraction && is_positive_or_zero,
            RoundingMode::Floor => has_discarded_fraction && !is_positive_or_zero,
            RoundingMode::HalfUp => half_cmp != Less,
            RoundingMode::HalfDown => half_cmp == Greater,
            RoundingMode::HalfCeiling => {
                if is_positive_or_zero {
                    half_cmp != Less
                } else {
                    half_cmp == Greater
                }
            }
            RoundingMode::HalfFloor => {
                if is_positive_or_zero {
                    half_cmp == Greater
                } else {
                    half_cmp != Less
                }
            }
            RoundingMode::HalfEven => {
                if quotient_is_even {
                    half_cmp == Greater
                } else {
                    matches!(half_cmp, Greater | Equal)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn half_even_ties_go_to_even_neighbour() {
        // 2.5 -> 2 (quotient 2 is even), 3.5 -> 4 (quotient 3 is odd).
        assert!(!RoundingMode::HalfEven.should_increment(true, true, true, Ordering::Equal));
        assert!(RoundingMode::HalfEven.should_increment(true, true, false, Ordering::Equal));
    }

    #[test]
    fn exact_division_never_increments() {
        for mode in RoundingMode::ALL {
            assert!(
                !mode.should_increment(false, true, true, Ordering::Less),
                "{mode:?} incremented an exact quotient"
            );
        }
    }
}
