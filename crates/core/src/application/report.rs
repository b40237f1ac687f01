// HTML Report Renderer
// Pure function from accumulated records to a standalone HTML page.

use crate::domain::{round4, ScoreRecord, SkipRecord};

/// Report rendering options
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Metric name shown in the header (e.g. the external model command)
    pub metric_name: String,
    /// Minimum acceptable score; lower rows are styled as bad
    pub threshold: f64,
    /// >0 embeds a `<meta http-equiv="refresh">` with this period
    pub auto_refresh_secs: u64,
}

const STYLE: &str = r#"  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 24px; color: #111; }
  h1 { margin: 0 0 4px 0; }
  .sub { color:#666; margin-bottom: 16px; }
  .cards { display: grid; grid-template-columns: repeat(auto-fit,minmax(180px,1fr)); gap: 12px; margin: 12px 0 20px; }
  .card { background:#f8f9fb; border:1px solid #e6e8ee; border-radius:12px; padding:14px; box-shadow: 0 1px 2px rgba(0,0,0,.03); }
  .kpi { font-size: 26px; font-weight: 700; }
  .kpi small { font-size: 12px; font-weight: 500; color:#555; margin-left: 6px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border-bottom: 1px solid #eee; padding: 8px 10px; vertical-align: top; }
  th { text-align: left; background:#fafbfc; position: sticky; top: 0; }
  .mono { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, "Liberation Mono", monospace; white-space: nowrap; }
  .score { text-align:right; font-weight: 700; }
  .score.ok { color: #0a773a; }
  .score.bad { color: #b00020; }
  .pill { display:inline-block; padding:2px 8px; border-radius:999px; font-size:12px; font-weight:600; }
  .pill.ok { background:#e9f7ef; color:#0a773a; }
  .pill.bad { background:#fdecea; color:#b00020; }
  details { margin: 10px 0 18px; }
  summary { cursor: pointer; font-weight: 600; }
  footer { color:#777; font-size:12px; margin-top:22px; }
"#;

/// Escape text for embedding in HTML element content
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn result_row(record: &ScoreRecord, threshold: f64) -> String {
    let class = if record.score >= threshold { "ok" } else { "bad" };
    format!(
        "<tr><td class=mono>{}</td><td>{}</td><td>{}</td><td>{}</td><td class='score {}'>{:.4}</td></tr>",
        escape_html(&record.file),
        escape_html(&record.source),
        escape_html(&record.mt_output),
        escape_html(record.reference.as_deref().unwrap_or("")),
        class,
        record.score,
    )
}

fn skip_row(record: &SkipRecord) -> String {
    format!(
        "<tr><td class=mono>{}</td><td>{}</td><td class=mono>{}</td></tr>",
        escape_html(&record.file),
        escape_html(&record.reason),
        escape_html(&format!("{:?}", record.lines)),
    )
}

/// Render the full report page from the accumulated logs.
pub fn render_report(
    results: &[ScoreRecord],
    skipped: &[SkipRecord],
    options: &ReportOptions,
    updated: &str,
) -> String {
    let total = results.len();
    let warn_count = results.iter().filter(|r| r.warning).count();
    let average = if total == 0 {
        0.0
    } else {
        round4(results.iter().map(|r| r.score).sum::<f64>() / total as f64)
    };

    let meta_refresh = if options.auto_refresh_secs > 0 {
        format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">\n",
            options.auto_refresh_secs
        )
    } else {
        String::new()
    };

    let rows: String = results
        .iter()
        .map(|r| result_row(r, options.threshold))
        .collect::<Vec<_>>()
        .join("\n");

    let warn_rows: String = results
        .iter()
        .filter(|r| r.warning)
        .map(|r| result_row(r, options.threshold))
        .collect::<Vec<_>>()
        .join("\n");

    let skipped_rows: String = skipped
        .iter()
        .map(skip_row)
        .collect::<Vec<_>>()
        .join("\n");

    let warnings_open = if warn_count > 0 { "open" } else { "" };
    let refresh_note = if options.auto_refresh_secs > 0 {
        " Auto-refresh is on."
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">{meta_refresh}<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Translation QA Report</title>
<style>
{STYLE}</style>
</head>
<body>
  <h1>Translation QA Report</h1>
  <div class=sub>Updated: {updated} &bull; Metric: <code>{metric}</code> &bull; Threshold: <b>{threshold}</b></div>

  <div class=cards>
    <div class=card><div class=kpi>{total}</div><div>Total evaluated</div></div>
    <div class=card><div class=kpi>{warn_count} <span class="pill bad">below</span></div><div>Below threshold</div></div>
    <div class=card><div class=kpi>{average:.4}</div><div>Average score</div></div>
  </div>

  <h2>All Results</h2>
  <table>
    <thead>
      <tr><th>File</th><th>Source</th><th>MT Output</th><th>Reference</th><th>Score</th></tr>
    </thead>
    <tbody>
      {rows}
    </tbody>
  </table>

  <details {warnings_open}>
    <summary>Warnings (below {threshold}) &mdash; {warn_count}</summary>
    <table>
      <thead><tr><th>File</th><th>Source</th><th>MT Output</th><th>Reference</th><th>Score</th></tr></thead>
      <tbody>
        {warn_rows}
      </tbody>
    </table>
  </details>

  <details>
    <summary>Skipped files &mdash; {skip_count}</summary>
    <table>
      <thead><tr><th>File</th><th>Reason</th><th>Lines</th></tr></thead>
      <tbody>
        {skipped_rows}
      </tbody>
    </table>
  </details>

  <footer>Generated automatically by scorewatch. Open this file directly in your browser.{refresh_note}</footer>
</body>
</html>
"#,
        meta_refresh = meta_refresh,
        metric = escape_html(&options.metric_name),
        threshold = options.threshold,
        total = total,
        warn_count = warn_count,
        average = average,
        rows = rows,
        warnings_open = warnings_open,
        warn_rows = warn_rows,
        skip_count = skipped.len(),
        skipped_rows = skipped_rows,
        refresh_note = refresh_note,
    )
}
