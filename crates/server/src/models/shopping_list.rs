//! Aggregated shopping list rows.

use core::fmt;

/// Total amount of one ingredient across every recipe in a user's cart.
///
/// Derived on every export, never stored. Two ingredients sharing a name but
/// not a unit are separate rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl fmt::Display for AggregatedLine {
    /// Renders as `name (unit) - amount`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.name, self.measurement_unit, self.total_amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_name_unit_amount_order() {
        let line = AggregatedLine {
            name: "мука".to_string(),
            measurement_unit: "г".to_string(),
            total_amount: 200,
        };
        assert_eq!(line.to_string(), "мука (г) - 200");
    }
}
