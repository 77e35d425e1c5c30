//! Guarded arithmetic over token amounts.
//!
//! Every balance, allowance and supply update goes through these helpers so
//! that no operation can produce a negative or wrapped quantity.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Arithmetic underflow")]
    Underflow,
}

#[inline]
pub fn checked_add(a: u64, b: u64) -> Result<u64, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

#[inline]
pub fn checked_sub(a: u64, b: u64) -> Result<u64, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checked_sub_boundaries() {
        assert_eq!(checked_sub(10, 10), Ok(0));
        assert_eq!(checked_sub(10, 11), Err(ArithmeticError::Underflow));
        assert_eq!(checked_sub(0, 1), Err(ArithmeticError::Underflow));
    }

    #[test]
    fn test_checked_add_boundaries() {
        assert_eq!(checked_add(u64::MAX - 1, 1), Ok(u64::MAX));
        assert_eq!(checked_add(u64::MAX, 1), Err(ArithmeticError::Overflow));
    }

    proptest! {
        #[test]
        fn test_sub_then_add_restores(a in any::<u64>(), b in any::<u64>()) {
            match checked_sub(a, b) {
                Ok(diff) => prop_assert_eq!(checked_add(diff, b), Ok(a)),
                Err(e) => {
                    prop_assert!(b > a);
                    prop_assert_eq!(e, ArithmeticError::Underflow);
                }
            }
        }
    }
}
