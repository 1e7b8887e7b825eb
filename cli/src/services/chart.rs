//! Plotly candlestick figures with moving-average overlays.
//!
//! The figure is plain Plotly JSON; rendering happens in the browser. `render_html`
//! produces a standalone page that loads Plotly from its CDN.

use crate::models::PriceSeries;
use crate::utils::MovingAverage;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Theme::Dark => "plotly_dark",
            Theme::Light => "plotly_white",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Theme::Dark => "#0e1117",
            Theme::Light => "white",
        }
    }

    pub fn font_color(&self) -> &'static str {
        match self {
            Theme::Dark => "white",
            Theme::Light => "black",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme `{}` (expected dark or light)", other)),
        }
    }
}

/// One overlay line on top of the candles.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub average: &'a MovingAverage,
    pub color: &'a str,
}

impl<'a> Overlay<'a> {
    pub fn new(average: &'a MovingAverage, color: &'a str) -> Self {
        Self { average, color }
    }
}

/// Builds the Plotly figure: candles first, then one line per overlay.
pub fn build_figure(series: &PriceSeries, overlays: &[Overlay<'_>], theme: Theme) -> Value {
    let x: Vec<String> = series
        .points()
        .iter()
        .map(|p| p.time.to_rfc3339_opts(SecondsFormat::Secs, true))
        .collect();

    let mut traces = vec![json!({
        "type": "candlestick",
        "name": "Candlestick",
        "x": x,
        "open": series.points().iter().map(|p| p.open).collect::<Vec<_>>(),
        "high": series.points().iter().map(|p| p.high).collect::<Vec<_>>(),
        "low": series.points().iter().map(|p| p.low).collect::<Vec<_>>(),
        "close": series.points().iter().map(|p| p.close).collect::<Vec<_>>(),
    })];

    for overlay in overlays {
        traces.push(json!({
            "type": "scatter",
            "mode": "lines",
            "name": format!("{} MA", overlay.average.window()),
            "x": x,
            "y": overlay.average,
            "line": {"color": overlay.color, "width": 2},
        }));
    }

    json!({
        "data": traces,
        "layout": {
            "template": theme.template(),
            "plot_bgcolor": theme.background(),
            "paper_bgcolor": theme.background(),
            "font": {"color": theme.font_color()},
            "xaxis": {"title": {"text": "Date"}, "rangeslider": {"visible": false}},
            "yaxis": {"title": {"text": "Price"}},
            "height": CHART_HEIGHT,
        },
    })
}

/// Chart `<div>` plus the script that draws it; the page must load Plotly.
pub fn render_fragment(figure: &Value, element_id: &str) -> String {
    // `</` inside JSON strings would close the script element early
    let payload = figure.to_string().replace("</", "<\\/");
    format!(
        "<div id=\"{id}\" style=\"width:100%;height:{h}px;\"></div>\n\
         <script>\n\
         (function() {{\n\
           var fig = {payload};\n\
           Plotly.newPlot(\"{id}\", fig.data, fig.layout, {{responsive: true}});\n\
         }})();\n\
         </script>",
        id = element_id,
        h = CHART_HEIGHT,
        payload = payload,
    )
}

/// Standalone HTML page for a figure.
pub fn render_html(title: &str, figure: &Value, theme: Theme) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<script src=\"{cdn}\"></script>\n</head>\n\
         <body style=\"background:{bg};color:{fg};font-family:sans-serif;\">\n\
         <h2>{title}</h2>\n{chart}\n</body>\n</html>\n",
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        bg = theme.background(),
        fg = theme.font_color(),
        chart = render_fragment(figure, "chart"),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
