//! Server-rendered dashboard page.

use serde::{Deserialize, Serialize};
use tickerscope::api::AnalysisReport;
use tickerscope::models::{Interval, Lookback};
use tickerscope::services::{escape_html, render_fragment, Theme, PLOTLY_CDN};

pub const TITLE: &str = "📈 Stock Market Full Info + Prediction App";
pub const PROMPT_MESSAGE: &str = "👆 Enter a stock symbol first.";
pub const NO_DATA_MESSAGE: &str = "⚠️ No data found! Check the stock symbol or interval settings.";

/// Query string shared by `/`, `/api/analysis` and `/download`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl AnalysisParams {
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Theme from the query, falling back when absent or unrecognised.
    pub fn theme_or(&self, fallback: Theme) -> Theme {
        self.theme
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(fallback)
    }
}

pub enum Outcome<'a> {
    Prompt,
    Report(&'a AnalysisReport),
    NoData,
    Failed(String),
}

pub fn render_dashboard(params: &AnalysisParams, outcome: Outcome<'_>, theme: Theme) -> String {
    let body = match outcome {
        Outcome::Prompt => alert("warning", PROMPT_MESSAGE),
        Outcome::NoData => alert("error", NO_DATA_MESSAGE),
        Outcome::Failed(message) => alert("error", &format!("Something went wrong: {}", message)),
        Outcome::Report(report) => report_section(report, theme),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{cdn}\"></script>\n<style>{css}</style>\n\
         </head>\n<body style=\"background:{bg};color:{fg};\">\n\
         <h1 class=\"title\">{title}</h1><hr>\n{form}\n{body}\n</body>\n</html>\n",
        title = TITLE,
        cdn = PLOTLY_CDN,
        css = STYLE,
        bg = theme.background(),
        fg = theme.font_color(),
        form = selection_form(params, theme),
        body = body,
    )
}

fn selection_form(params: &AnalysisParams, theme: Theme) -> String {
    let symbol = params.symbol.as_deref().unwrap_or_default();
    let interval = params.interval.as_deref().unwrap_or(Interval::OneDay.as_str());
    let lookback = params.lookback.as_deref().unwrap_or_default();

    let themes = [Theme::Dark, Theme::Light]
        .iter()
        .map(|t| option(t.as_str(), capitalize(t.as_str()).as_str(), *t == theme))
        .collect::<String>();
    let intervals = Interval::ALL
        .iter()
        .map(|i| option(i.as_str(), i.as_str(), i.as_str().eq_ignore_ascii_case(interval)))
        .collect::<String>();
    let lookbacks = std::iter::once(option("", "default for timeframe", lookback.is_empty()))
        .chain(
            Lookback::ALL
                .iter()
                .map(|l| option(l.as_str(), l.as_str(), l.as_str().eq_ignore_ascii_case(lookback))),
        )
        .collect::<String>();

    format!(
        "<form method=\"get\" action=\"/\">\n\
         <label>Choose Theme: <select name=\"theme\">{themes}</select></label>\n\
         <label>Stock symbol (Example: AAPL, TCS.NS, INFY.NS): \
         <input type=\"text\" name=\"symbol\" value=\"{symbol}\"></label>\n\
         <label>Select Timeframe: <select name=\"interval\">{intervals}</select></label>\n\
         <label>History: <select name=\"lookback\">{lookbacks}</select></label>\n\
         <button type=\"submit\">Analyze</button>\n</form>",
        themes = themes,
        symbol = escape_html(symbol),
        intervals = intervals,
        lookbacks = lookbacks,
    )
}

fn report_section(report: &AnalysisReport, theme: Theme) -> String {
    let company_rows = report
        .company
        .summary_rows()
        .iter()
        .zip(["success", "info", "warning", "error"])
        .map(|((label, value), kind)| alert(kind, &format!("<b>{}:</b> {}", label, escape_html(value))))
        .collect::<String>();

    format!(
        "<h3 class=\"section\">🕯️ Candlestick Chart</h3>\n{chart}\n\
         <h3 class=\"section\">🏢 Company Information</h3>\n<div class=\"grid\">{company}</div>\n<hr>\n\
         <a class=\"download\" href=\"{href}\" download=\"{file}\" \
         title=\"Download the stock historical data CSV file\">📥 Download Historical Data</a>\n\
         <h3 class=\"section\">📈 Simple Stock Prediction (Basic)</h3>\n{trend}",
        chart = render_fragment(&report.figure(theme), "chart"),
        company = company_rows,
        href = escape_html(&download_href(report)),
        file = escape_html(&report.request.csv_file_name()),
        trend = alert("info", report.trend_label()),
    )
}

/// Link back to `/download` for the same selection.
pub fn download_href(report: &AnalysisReport) -> String {
    let params = AnalysisParams {
        symbol: Some(report.request.symbol.to_string()),
        interval: Some(report.request.interval.to_string()),
        lookback: Some(report.request.lookback.to_string()),
        theme: None,
    };
    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("/download?{}", query),
        Err(_) => "/download".to_string(),
    }
}

// `message` is inserted verbatim; callers escape user-controlled text.
fn alert(kind: &str, message: &str) -> String {
    format!("<div class=\"alert {}\">{}</div>", kind, message)
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        value,
        if selected { " selected" } else { "" },
        label
    )
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const STYLE: &str = "body{font-family:sans-serif;margin:0 2rem;}\
.title{text-align:center;color:#00BFFF;}\
.section{color:#FF5733;}\
form label{margin-right:1rem;}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:.5rem;}\
.alert{padding:.75rem 1rem;border-radius:.4rem;margin:.4rem 0;}\
.success{background:#1e4620;color:#d4edda;}\
.info{background:#1c3d5a;color:#d1ecf1;}\
.warning{background:#5c4a00;color:#fff3cd;}\
.error{background:#5a1c1c;color:#f8d7da;}\
.download{display:inline-block;padding:.5rem 1rem;border:1px solid #888;border-radius:.4rem;}";
