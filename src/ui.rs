use crate::chart::{format_axis_value, render_chart};
use crate::errors::{AnalysisError, Severity};
use crate::models::{Analysis, AnalyzeForm};

/// What to show under the form after an "Analyze Data" submit.
pub enum Outcome<'a> {
    Idle,
    Rendered(&'a Analysis),
    Rejected(&'a AnalysisError),
}

pub fn render_index(form: &AnalyzeForm, outcome: Outcome<'_>) -> String {
    let (feedback, results) = match outcome {
        Outcome::Idle => (
            String::new(),
            r#"<p class="hint">Pick a date range, enter one CPA value per week and press <strong>Analyze Data</strong>.</p>"#
                .to_string(),
        ),
        Outcome::Rendered(analysis) => (
            format!(
                r#"<div class="status" data-type="ok">Analyzed {} weeks ({} to {}).</div>"#,
                analysis.rows.len(),
                analysis.start_date,
                analysis.adjusted_end_date
            ),
            render_results(analysis),
        ),
        Outcome::Rejected(err) => (render_feedback(err), String::new()),
    };

    INDEX_HTML
        .replace("{{START_DATE}}", &escape_html(&form.start_date))
        .replace("{{END_DATE}}", &escape_html(&form.end_date))
        .replace("{{ACTUAL_CPA}}", &escape_html(&form.actual_cpa))
        .replace("{{TARGET_CPA}}", &escape_html(&form.target_cpa))
        .replace("{{FEEDBACK}}", &feedback)
        .replace("{{RESULTS}}", &results)
}

fn render_feedback(err: &AnalysisError) -> String {
    let kind = match err.severity() {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    format!(
        r#"<div class="status" data-type="{kind}" data-kind="{}" role="alert">{}</div>"#,
        err.kind(),
        escape_html(&err.to_string())
    )
}

fn render_results(analysis: &Analysis) -> String {
    let mut rows = String::new();
    for row in &analysis.rows {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.date,
            format_axis_value(row.actual_cpa),
            format_axis_value(row.target_cpa),
            format_axis_value(row.upper_bound),
            format_axis_value(row.lower_bound)
        ));
    }

    format!(
        r#"<div class="chart-card">{}</div>
      <table class="data">
        <thead><tr><th>Week ending</th><th>Actual CPA</th><th>Target CPA</th><th>Upper bound</th><th>Lower bound</th></tr></thead>
        <tbody>{rows}</tbody>
      </table>"#,
        render_chart(analysis)
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dynamic CPA Analysis</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #cfe3f0;
      --ink: #2b2a28;
      --accent: #1f5fa8;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e6f0f7 60%, #f4f7f9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .layout {
      width: min(1240px, 100%);
      margin: 0 auto;
      display: grid;
      grid-template-columns: minmax(260px, 320px) 1fr;
      gap: 24px;
      align-items: start;
    }

    .sidebar,
    .app {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 18px;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 3.4vw, 2.5rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    form {
      display: grid;
      gap: 14px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
    }

    input,
    textarea {
      font: inherit;
      font-size: 1rem;
      text-transform: none;
      letter-spacing: normal;
      color: var(--ink);
      border: 1px solid rgba(47, 72, 88, 0.18);
      border-radius: 12px;
      padding: 10px 12px;
      background: white;
    }

    textarea {
      min-height: 88px;
      resize: vertical;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(31, 95, 168, 0.3);
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .cpa-chart {
      width: 100%;
      height: auto;
      display: block;
    }

    table.data {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    table.data th,
    table.data td {
      padding: 8px 10px;
      text-align: right;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    table.data th:first-child,
    table.data td:first-child {
      text-align: left;
    }

    table.data th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
    }

    .status {
      font-size: 0.95rem;
      border-radius: 12px;
      padding: 10px 12px;
      color: #6b645d;
      background: rgba(47, 72, 88, 0.06);
    }

    .status[data-type="error"] {
      color: #c63b2b;
      background: rgba(198, 59, 43, 0.08);
    }

    .status[data-type="warning"] {
      color: #8a5a00;
      background: rgba(230, 160, 20, 0.12);
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
      background: rgba(45, 122, 75, 0.08);
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 860px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="layout">
    <aside class="sidebar">
      <h2>Input Parameters</h2>
      <form id="analyze-form" method="post" action="/analyze">
        <label>Select Start Date
          <input type="date" name="start_date" value="{{START_DATE}}" required />
        </label>
        <label>Select End Date
          <input type="date" name="end_date" value="{{END_DATE}}" required />
        </label>
        <label>Enter Actual CPA values (comma-separated)
          <textarea name="actual_cpa">{{ACTUAL_CPA}}</textarea>
        </label>
        <label>Enter Target CPA
          <input type="number" name="target_cpa" step="any" value="{{TARGET_CPA}}" required />
        </label>
        <button type="submit">Analyze Data</button>
      </form>
      {{FEEDBACK}}
    </aside>

    <main class="app">
      <header>
        <h1>Dynamic CPA Analysis with Typical Variation Zone</h1>
        <p class="subtitle">Weekly CPA against target, with a rolling two-week mean &plusmn; one standard deviation.</p>
      </header>
      {{RESULTS}}
    </main>
  </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AnalyzeForm {
        AnalyzeForm {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-21".to_string(),
            actual_cpa: "200, 230, 180".to_string(),
            target_cpa: "220".to_string(),
        }
    }

    #[test]
    fn idle_page_keeps_form_values_and_has_no_chart() {
        let html = render_index(&form(), Outcome::Idle);
        assert!(html.contains(r#"value="2024-01-01""#));
        assert!(html.contains(">200, 230, 180</textarea>"));
        assert!(html.contains("Analyze Data"));
        assert!(!html.contains("<svg"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn warning_is_rendered_inline() {
        let err = AnalysisError::CountMismatch {
            expected: 3,
            provided: 4,
        };
        let html = render_index(&form(), Outcome::Rejected(&err));
        assert!(html.contains(r#"data-type="warning""#));
        assert!(html.contains("exactly 3 values"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut form = form();
        form.actual_cpa = "</textarea><script>alert(1)</script>".to_string();
        let html = render_index(&form, Outcome::Idle);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;/textarea&gt;"));
    }
}
