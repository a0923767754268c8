use crate::bounds::BoundsCalculator;
use crate::errors::AnalysisError;
use crate::models::{Analysis, AnalysisRequest, AnalyzeForm, CpaRow};
use crate::parser::{parse_cpa_values, MAX_CPA_MAGNITUDE};
use crate::weeks::{validate_range, week_count, week_ending, weekly_dates};
use chrono::NaiveDate;

pub fn analyze(request: &AnalysisRequest) -> Result<Analysis, AnalysisError> {
    analyze_with(request, BoundsCalculator::default())
}

/// Runs the full pipeline. The date range is checked before the CPA text is
/// looked at, parse failures win over count mismatches, and the week count
/// is checked before any dates are generated.
pub fn analyze_with(
    request: &AnalysisRequest,
    calculator: BoundsCalculator,
) -> Result<Analysis, AnalysisError> {
    validate_range(request.start_date, request.end_date)?;
    if !is_supported_target(request.target_cpa) {
        return Err(AnalysisError::InvalidTarget {
            value: request.target_cpa.to_string(),
        });
    }

    let values = parse_cpa_values(&request.actual_cpa)?;
    let expected = week_count(request.start_date, request.end_date)?;
    if values.len() != expected {
        return Err(AnalysisError::CountMismatch {
            expected,
            provided: values.len(),
        });
    }
    let dates = weekly_dates(request.start_date, request.end_date)?;

    let bands = calculator.compute(&values);
    let rows = dates
        .into_iter()
        .zip(values)
        .zip(bands)
        .map(|((date, actual_cpa), band)| CpaRow {
            date,
            actual_cpa,
            target_cpa: request.target_cpa,
            rolling_mean: band.mean,
            rolling_std: band.std,
            upper_bound: band.upper,
            lower_bound: band.lower,
        })
        .collect();

    Ok(Analysis {
        start_date: request.start_date,
        end_date: request.end_date,
        adjusted_end_date: week_ending(request.end_date)?,
        target_cpa: request.target_cpa,
        rolling_window: calculator.window(),
        rows,
    })
}

/// Converts raw form text into a typed request.
pub fn request_from_form(form: &AnalyzeForm) -> Result<AnalysisRequest, AnalysisError> {
    let start_date = parse_date("Start Date", &form.start_date)?;
    let end_date = parse_date("End Date", &form.end_date)?;
    validate_range(start_date, end_date)?;

    let target_text = form.target_cpa.trim();
    let target_cpa = target_text
        .parse::<f64>()
        .ok()
        .filter(|value| is_supported_target(*value))
        .ok_or_else(|| AnalysisError::InvalidTarget {
            value: target_text.to_string(),
        })?;

    Ok(AnalysisRequest {
        start_date,
        end_date,
        actual_cpa: form.actual_cpa.clone(),
        target_cpa,
    })
}

fn is_supported_target(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_CPA_MAGNITUDE
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, AnalysisError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| AnalysisError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(actual: &str) -> AnalysisRequest {
        AnalysisRequest {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 21),
            actual_cpa: actual.to_string(),
            target_cpa: 220.0,
        }
    }

    #[test]
    fn three_week_scenario_builds_table() {
        let analysis = analyze(&request("200,230,180")).unwrap();
        assert_eq!(analysis.adjusted_end_date, date(2024, 1, 21));
        assert_eq!(analysis.rolling_window, 2);
        assert_eq!(analysis.rows.len(), 3);

        let dates: Vec<NaiveDate> = analysis.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 7), date(2024, 1, 14), date(2024, 1, 21)]);

        let actual: Vec<f64> = analysis.rows.iter().map(|r| r.actual_cpa).collect();
        assert_eq!(actual, vec![200.0, 230.0, 180.0]);

        for row in &analysis.rows {
            assert_eq!(row.target_cpa, 220.0);
            assert!(row.upper_bound >= row.actual_cpa);
            assert!(row.lower_bound <= row.actual_cpa);
        }
        assert_eq!(analysis.rows[0].upper_bound, 200.0);
        assert!((analysis.rows[2].upper_bound - 240.3553).abs() < 1e-4);
    }

    #[test]
    fn count_mismatch_names_expected_weeks() {
        let err = analyze(&request("200,230,180,210")).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::CountMismatch {
                expected: 3,
                provided: 4
            }
        );
        assert!(err.to_string().contains("exactly 3 values"));
    }

    #[test]
    fn parse_error_is_reported() {
        let err = analyze(&request("abc,200")).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn parse_error_wins_over_count_mismatch() {
        let err = analyze(&request("1,2,3,4,5,x")).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn date_range_is_checked_before_parsing() {
        let mut req = request("not numbers at all");
        req.start_date = date(2024, 2, 1);
        let err = analyze(&req).unwrap_err();
        assert_eq!(err.kind(), "invalid_date_range");
    }

    #[test]
    fn non_finite_target_is_rejected() {
        let mut req = request("200,230,180");
        req.target_cpa = f64::NAN;
        assert_eq!(analyze(&req).unwrap_err().kind(), "invalid_target");
    }

    #[test]
    fn oversized_target_is_rejected() {
        let mut req = request("200,230,180");
        req.target_cpa = 1.7e308;
        assert_eq!(analyze(&req).unwrap_err().kind(), "invalid_target");
    }

    #[test]
    fn huge_values_are_rejected_before_bounds() {
        let err = analyze(&request("1e308, 1.5e308, 1")).unwrap_err();
        assert_eq!(err.kind(), "parse_error");
    }

    #[test]
    fn end_date_at_calendar_limit_is_rejected() {
        let mut req = request("1,2,3,4,5");
        req.start_date = NaiveDate::MAX - chrono::Duration::days(30);
        req.end_date = NaiveDate::MAX;
        let err = analyze(&req).unwrap_err();
        assert_eq!(err, AnalysisError::DateOutOfRange { date: NaiveDate::MAX });
    }

    #[test]
    fn wide_range_reports_mismatch_without_listing_weeks() {
        let mut req = request("1");
        req.start_date = NaiveDate::from_ymd_opt(-262_000, 1, 1).unwrap();
        req.end_date = NaiveDate::from_ymd_opt(262_000, 1, 1).unwrap();
        match analyze(&req).unwrap_err() {
            AnalysisError::CountMismatch { expected, provided } => {
                assert!(expected > 27_000_000);
                assert_eq!(provided, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let req = request("200, 230, 180");
        assert_eq!(analyze(&req).unwrap(), analyze(&req).unwrap());
    }

    #[test]
    fn form_text_converts_to_request() {
        let form = AnalyzeForm {
            start_date: " 2024-01-01".to_string(),
            end_date: "2024-01-21 ".to_string(),
            actual_cpa: "200,230,180".to_string(),
            target_cpa: " 220.5 ".to_string(),
        };
        let req = request_from_form(&form).unwrap();
        assert_eq!(req.start_date, date(2024, 1, 1));
        assert_eq!(req.end_date, date(2024, 1, 21));
        assert_eq!(req.target_cpa, 220.5);
    }

    #[test]
    fn form_reports_field_errors() {
        let mut form = AnalyzeForm {
            start_date: "2024-01-01".to_string(),
            end_date: "21/01/2024".to_string(),
            actual_cpa: "200".to_string(),
            target_cpa: "220".to_string(),
        };
        assert_eq!(request_from_form(&form).unwrap_err().kind(), "invalid_date");

        form.end_date = "2024-01-21".to_string();
        form.target_cpa = "lots".to_string();
        assert_eq!(request_from_form(&form).unwrap_err().kind(), "invalid_target");
        form.target_cpa = "1e300".to_string();
        assert_eq!(request_from_form(&form).unwrap_err().kind(), "invalid_target");

        form.start_date = "2024-03-01".to_string();
        assert_eq!(
            request_from_form(&form).unwrap_err().kind(),
            "invalid_date_range"
        );
    }
}
