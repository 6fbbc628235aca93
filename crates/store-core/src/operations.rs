//! # Arithmetic Operations
//!
//! The one isolated, framework-free logic unit in the system: dispatches a
//! four-function operator symbol over two numeric operands.

use crate::error::{CoreError, CoreResult};

/// Applies a binary arithmetic operator to two operands.
///
/// ## Supported operators
/// `+`, `-`, `*`, `/`
///
/// Unknown symbols and division by zero are typed errors, never panics.
///
/// ## Example
/// ```rust
/// use store_core::operations::operations;
///
/// assert_eq!(operations(5.0, 5.0, '+').unwrap(), 10.0);
/// assert_eq!(operations(10.0, 5.0, '-').unwrap(), 5.0);
/// assert!(operations(1.0, 0.0, '/').is_err());
/// ```
pub fn operations(a: f64, b: f64, operator: char) -> CoreResult<f64> {
    match operator {
        '+' => Ok(a + b),
        '-' => Ok(a - b),
        '*' => Ok(a * b),
        '/' => {
            if b == 0.0 {
                Err(CoreError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
        other => Err(CoreError::UnknownOperator(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus() {
        assert_eq!(operations(5.0, 5.0, '+').unwrap(), 10.0);
    }

    #[test]
    fn test_minus() {
        assert_eq!(operations(10.0, 5.0, '-').unwrap(), 5.0);
    }

    #[test]
    fn test_multiply() {
        assert_eq!(operations(10.0, 2.0, '*').unwrap(), 20.0);
    }

    #[test]
    fn test_divide() {
        assert_eq!(operations(10.0, 2.0, '/').unwrap(), 5.0);
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(matches!(
            operations(10.0, 0.0, '/'),
            Err(CoreError::DivisionByZero)
        ));
    }

    #[test]
    fn test_unknown_operator() {
        assert!(matches!(
            operations(10.0, 2.0, '%'),
            Err(CoreError::UnknownOperator('%'))
        ));
    }
}
