//! Readability rules for showing attribute values to players

use serde::{Deserialize, Serialize};

/// How an attribute value is turned into the number shown in UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRules {
    /// Scale applied before rounding (e.g. 100.0 to show a fraction as percent)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Round to a whole number instead of one decimal place
    #[serde(default)]
    pub round_to_integer: bool,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for DisplayRules {
    fn default() -> Self {
        DisplayRules {
            multiplier: default_multiplier(),
            round_to_integer: false,
        }
    }
}

impl DisplayRules {
    /// Scale, round to one decimal, then optionally to an integer.
    ///
    /// Ties round to even at both steps.
    pub fn apply(&self, value: f64) -> f64 {
        let scaled = value * self.multiplier;
        let one_decimal = (scaled * 10.0).round_ties_even() / 10.0;
        if self.round_to_integer {
            one_decimal.round_ties_even()
        } else {
            one_decimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rounds_to_one_decimal() {
        let rules = DisplayRules::default();
        assert!((rules.apply(4.26) - 4.3).abs() < 1e-9);
        assert!((rules.apply(4.24) - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_multiplier_and_integer() {
        let rules = DisplayRules {
            multiplier: 100.0,
            round_to_integer: true,
        };
        assert!((rules.apply(0.127) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_integer_ties_to_even() {
        let rules = DisplayRules {
            multiplier: 1.0,
            round_to_integer: true,
        };
        assert!((rules.apply(2.5) - 2.0).abs() < 1e-9);
        assert!((rules.apply(3.5) - 4.0).abs() < 1e-9);
    }
}
