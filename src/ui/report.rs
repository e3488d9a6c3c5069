use firing_viewer::{AnalysisError, ChannelRoles, RatioResult, StatisticResult};

// ---------------------------------------------------------------------------
// Result text – the only place values are rounded
// ---------------------------------------------------------------------------

/// Decimal places shown for every computed value.
pub const DISPLAY_DECIMALS: usize = 4;

fn pm(mean: f64, spread: f64) -> String {
    format!("{mean:.prec$} ± {spread:.prec$}", prec = DISPLAY_DECIMALS)
}

pub fn stat_line(label: &str, stat: &StatisticResult) -> String {
    format!(
        "{label}: {}  (n = {})",
        pm(stat.mean, stat.stddev),
        stat.sample_count
    )
}

pub fn of_ratio_text(roles: &ChannelRoles, result: &RatioResult) -> String {
    [
        stat_line(&format!("Avg oxidizer ({})", roles.oxidizer), &result.numerator),
        stat_line(&format!("Avg fuel ({})", roles.fuel), &result.denominator),
        format!("O/F ratio: {}", pm(result.ratio, result.ratio_error)),
    ]
    .join("\n")
}

pub fn thrust_text(roles: &ChannelRoles, result: &StatisticResult) -> String {
    stat_line(&format!("Avg thrust ({})", roles.thrust), result)
}

/// Status-line text for a failed action.
pub fn error_text(err: &AnalysisError) -> String {
    match err {
        AnalysisError::NoFileLoaded => "Please load a file first.".to_string(),
        other => other.to_string(),
    }
}
