use std::error::Error;
use std::fmt;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a non-positive tick period or a canvas without area.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueError {
    pub what: String,
}

impl InputValueError {
    pub fn new(what: impl Into<String>) -> InputValueError {
        InputValueError { what: what.into() }
    }
}

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value: {}", self.what)
    }
}

impl Error for InputValueError {}

/// format_elapsed formats a duration in seconds as `mm:ss.d` (tenths of a second). Negative and
/// non-finite inputs are shown as zero.
pub fn format_elapsed(t_s: f64) -> String {
    let t_s = if t_s.is_finite() && t_s > 0.0 { t_s } else { 0.0 };
    let minutes = (t_s / 60.0).floor() as u64;
    let seconds = (t_s % 60.0).floor() as u64;
    let tenths = ((t_s % 1.0) * 10.0).floor() as u64;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_formatted_as_minutes_seconds_tenths() {
        assert_eq!(format_elapsed(0.0), "00:00.0");
        assert_eq!(format_elapsed(4.25), "00:04.2");
        assert_eq!(format_elapsed(125.9), "02:05.9");
        assert_eq!(format_elapsed(-3.0), "00:00.0");
        assert_eq!(format_elapsed(f64::NAN), "00:00.0");
    }

    #[test]
    fn input_value_error_names_the_offending_value() {
        let err = InputValueError::new("tick_period_ms must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid input value: tick_period_ms must be > 0"
        );
    }
}
