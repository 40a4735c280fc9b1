//! Bounded positive quantities: ingredient amounts and cooking times.
//!
//! Both are stored as `SMALLINT`-sized integers, so the upper bound keeps
//! every value representable with room to spare.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing an [`Amount`] or [`CookingTime`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("{what} must be at least {min} (got {value})")]
    TooSmall {
        what: &'static str,
        min: i32,
        value: i64,
    },
    #[error("{what} must be at most {max} (got {value})")]
    TooLarge {
        what: &'static str,
        max: i32,
        value: i64,
    },
}

macro_rules! bounded_quantity {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Smallest accepted value.
            pub const MIN: i32 = 1;
            /// Largest accepted value.
            pub const MAX: i32 = 32_000;

            /// Validate a raw value.
            ///
            /// # Errors
            ///
            /// Returns [`QuantityError`] when the value is outside `MIN..=MAX`.
            pub fn new(value: i64) -> Result<Self, QuantityError> {
                if value < i64::from(Self::MIN) {
                    return Err(QuantityError::TooSmall {
                        what: $what,
                        min: Self::MIN,
                        value,
                    });
                }
                if value > i64::from(Self::MAX) {
                    return Err(QuantityError::TooLarge {
                        what: $what,
                        max: Self::MAX,
                        value,
                    });
                }
                // Bounds checked above
                #[allow(clippy::cast_possible_truncation)]
                Ok(Self(value as i32))
            }

            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = QuantityError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

bounded_quantity!(
    /// Quantity of one ingredient in one recipe, in the ingredient's
    /// measurement unit.
    Amount,
    "amount"
);

bounded_quantity!(
    /// Cooking time in minutes.
    CookingTime,
    "cooking time"
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_bounds() {
        assert!(Amount::new(1).is_ok());
        assert!(Amount::new(32_000).is_ok());
        assert!(matches!(
            Amount::new(0),
            Err(QuantityError::TooSmall { value: 0, .. })
        ));
        assert!(matches!(
            Amount::new(-5),
            Err(QuantityError::TooSmall { .. })
        ));
        assert!(matches!(
            Amount::new(32_001),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_error_names_the_field() {
        let err = CookingTime::new(0).unwrap_err();
        assert_eq!(err.to_string(), "cooking time must be at least 1 (got 0)");
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let amount: Amount = serde_json::from_str("200").unwrap();
        assert_eq!(amount.get(), 200);
        assert!(serde_json::from_str::<Amount>("0").is_err());
        assert!(serde_json::from_str::<CookingTime>("99999999999").is_err());
    }
}
