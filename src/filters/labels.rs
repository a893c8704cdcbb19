//! Display labels derived from nullable experience and salary bounds.

/// Human readable experience range.
///
/// | min  | max  | label         |
/// |------|------|---------------|
/// | None | None | `Fresher`     |
/// | N    | None | `N+ yrs`      |
/// | None | N    | `Up to N yrs` |
/// | N    | M    | `N-M yrs`     |
pub fn experience_label(min: Option<i32>, max: Option<i32>) -> String {
    match (min, max) {
        (None, None) => "Fresher".to_string(),
        (Some(min), None) => format!("{min}+ yrs"),
        (None, Some(max)) => format!("Up to {max} yrs"),
        (Some(min), Some(max)) => format!("{min}-{max} yrs"),
    }
}

/// Monthly salary range, `None` when nothing is known
pub fn salary_label(min: Option<i32>, max: Option<i32>) -> Option<String> {
    match (min, max) {
        (None, None) => None,
        (Some(min), None) => Some(format!("{min}+ /Month")),
        (None, Some(max)) => Some(format!("Up to {max} /Month")),
        (Some(min), Some(max)) => Some(format!("{min}-{max} /Month")),
    }
}
