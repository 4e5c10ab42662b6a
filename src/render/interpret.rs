// src/render/interpret.rs

pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// What a typed p-value means at the 5 % level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PValueReading {
    /// Nothing numeric typed yet.
    Waiting,
    Significant { p: f64, gauge_percent: f64 },
    NotSignificant { p: f64, gauge_percent: f64 },
}

impl PValueReading {
    pub fn gauge_percent(&self) -> Option<f64> {
        match self {
            PValueReading::Waiting => None,
            PValueReading::Significant { gauge_percent, .. }
            | PValueReading::NotSignificant { gauge_percent, .. } => Some(*gauge_percent),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            PValueReading::Waiting => "Waiting for a number...",
            PValueReading::Significant { .. } => "SIGNIFICANT RESULT",
            PValueReading::NotSignificant { .. } => "NOT SIGNIFICANT",
        }
    }

    pub fn advice(&self) -> String {
        match self {
            PValueReading::Waiting => "Type the p-value reported by R.".to_string(),
            PValueReading::Significant { p, .. } => format!(
                "The chance of seeing this result by luck alone is {:.2}%. Reject the null hypothesis.",
                p * 100.0
            ),
            PValueReading::NotSignificant { .. } => {
                "Not enough evidence of a difference; it may be natural variation. Keep the null hypothesis.".to_string()
            }
        }
    }
}

/// Parses user input; a comma works as decimal mark. Values outside
/// [0, 1] are clamped.
pub fn read_p_value(input: &str) -> PValueReading {
    let parsed = input.trim().replace(',', ".").parse::<f64>();
    let p = match parsed {
        Ok(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => return PValueReading::Waiting,
    };

    let gauge_percent = gauge_position(p);
    if p < SIGNIFICANCE_LEVEL {
        PValueReading::Significant { p, gauge_percent }
    } else {
        PValueReading::NotSignificant { p, gauge_percent }
    }
}

/// Stretches the gauge so the threshold stays visible: [0, 0.05] covers the
/// first 5 % of the bar and (0.05, 1] the remaining 95 %.
pub fn gauge_position(p: f64) -> f64 {
    if p <= SIGNIFICANCE_LEVEL {
        (p / SIGNIFICANCE_LEVEL) * 5.0
    } else {
        5.0 + ((p - SIGNIFICANCE_LEVEL) / (1.0 - SIGNIFICANCE_LEVEL)) * 95.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(matches!(read_p_value("0.049"), PValueReading::Significant { .. }));
        assert!(matches!(read_p_value("0.05"), PValueReading::NotSignificant { .. }));
    }

    #[test]
    fn comma_decimal_and_whitespace_are_accepted() {
        match read_p_value(" 0,01 ") {
            PValueReading::Significant { p, .. } => assert!(approx(p, 0.01)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_numeric_input_waits() {
        assert_eq!(read_p_value(""), PValueReading::Waiting);
        assert_eq!(read_p_value("abc"), PValueReading::Waiting);
        assert_eq!(read_p_value("NaN"), PValueReading::Waiting);
        assert_eq!(read_p_value("").gauge_percent(), None);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        match read_p_value("-3") {
            PValueReading::Significant { p, gauge_percent } => {
                assert!(approx(p, 0.0));
                assert!(approx(gauge_percent, 0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        match read_p_value("7.5") {
            PValueReading::NotSignificant { p, gauge_percent } => {
                assert!(approx(p, 1.0));
                assert!(approx(gauge_percent, 100.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gauge_is_piecewise_linear() {
        assert!(approx(gauge_position(0.025), 2.5));
        assert!(approx(gauge_position(0.05), 5.0));
        assert!(approx(gauge_position(0.525), 52.5));
    }
}
