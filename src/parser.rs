use crate::errors::AnalysisError;

/// Largest CPA magnitude accepted. Keeps window sums and chart scaling
/// comfortably inside `f64` range.
pub const MAX_CPA_MAGNITUDE: f64 = 1e12;

/// Parses a comma-separated list of CPA values, keeping input order.
///
/// Empty tokens (trailing commas, runs of whitespace) are skipped. Any other
/// token must parse as a finite `f64` no larger than [`MAX_CPA_MAGNITUDE`].
pub fn parse_cpa_values(input: &str) -> Result<Vec<f64>, AnalysisError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<f64, AnalysisError> {
    let value = token.parse::<f64>().map_err(|source| AnalysisError::Parse {
        token: token.to_string(),
        source,
    })?;
    if !value.is_finite() {
        return Err(AnalysisError::NonFinite {
            token: token.to_string(),
        });
    }
    if value.abs() > MAX_CPA_MAGNITUDE {
        return Err(AnalysisError::OutOfRange {
            token: token.to_string(),
            limit: MAX_CPA_MAGNITUDE,
        });
    }
    Ok(value)
}
