use crate::models::{CountScope, DayCell, MonthCount, MonthView};

const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const CHART_WIDTH: usize = 360;
const CHART_HEIGHT: usize = 140;

pub fn render_index(view: &MonthView) -> String {
    INDEX_HTML
        .replace("{{TITLE}}", &view.title)
        .replace("{{GRID}}", &render_grid(view))
        .replace("{{COUNTER}}", &render_counter(view))
        .replace("{{CHART}}", &render_chart(&view.trend, view.quota))
}

fn render_grid(view: &MonthView) -> String {
    let mut html = String::new();
    for name in WEEKDAY_HEADERS {
        html.push_str(&format!(r#"<div class="calendar-head">{name}</div>"#));
    }
    for _ in 0..view.leading_blanks {
        html.push_str(r#"<div class="calendar-day blank"></div>"#);
    }
    for cell in &view.days {
        html.push_str(&render_cell(cell));
    }
    html
}

fn render_cell(cell: &DayCell) -> String {
    let mut classes = vec!["calendar-day"];
    if cell.is_weekend {
        classes.push("weekend");
    }
    if cell.is_today {
        classes.push("today");
    }
    if cell.is_on_site {
        classes.push("onsite");
    }
    format!(
        r#"<form method="post" action="/toggle/{key}"><button type="submit" class="{classes}" title="{key}">{day}</button></form>"#,
        key = cell.key,
        classes = classes.join(" "),
        day = cell.day,
    )
}

fn render_counter(view: &MonthView) -> String {
    let label = match view.scope {
        CountScope::Month => "On-site days this month",
        CountScope::AllTime => "On-site days",
    };
    match view.quota {
        Some(quota) => format!("{label}: {} / {quota}", view.on_site_count),
        None => format!("{label}: {}", view.on_site_count),
    }
}

/// Bar chart of the trailing months, with a dashed quota line when set.
fn render_chart(trend: &[MonthCount], quota: Option<u32>) -> String {
    if trend.is_empty() {
        return String::new();
    }

    let top = trend
        .iter()
        .map(|point| point.count)
        .chain(quota.map(|q| q as usize))
        .max()
        .unwrap_or(0)
        .max(1);
    let plot_height = CHART_HEIGHT - 24;
    let slot = CHART_WIDTH / trend.len();
    let bar_width = slot * 3 / 5;

    let mut svg = format!(
        r#"<svg class="trend" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="On-site trend">"#
    );
    for (index, point) in trend.iter().enumerate() {
        let height = point.count * plot_height / top;
        let x = index * slot + (slot - bar_width) / 2;
        let y = plot_height - height;
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{bar_width}" height="{height}" rx="3"><title>{label}: {count}</title></rect>"#,
            label = point.label,
            count = point.count,
        ));
        svg.push_str(&format!(
            r#"<text x="{cx}" y="{ty}" text-anchor="middle">{month}</text>"#,
            cx = x + bar_width / 2,
            ty = CHART_HEIGHT - 6,
            month = point.label.split(' ').next().unwrap_or_default(),
        ));
    }
    if let Some(quota) = quota {
        let y = plot_height - (quota as usize).min(top) * plot_height / top;
        svg.push_str(&format!(
            r#"<line class="quota" x1="0" y1="{y}" x2="{CHART_WIDTH}" y2="{y}" />"#
        ));
    }
    svg.push_str("</svg>");
    svg
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>On-site Calendar</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
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
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(520px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    h2 {
      margin: 0;
    }

    .nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .nav button {
      border: none;
      background: var(--accent-2);
      color: white;
      border-radius: 10px;
      padding: 6px 14px;
      cursor: pointer;
    }

    .calendar-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .calendar-grid form {
      margin: 0;
    }

    .calendar-head {
      text-align: center;
      font-size: 0.8rem;
      color: #5f5c57;
    }

    .calendar-day {
      width: 100%;
      aspect-ratio: 1;
      border: 1px solid rgba(47, 72, 88, 0.18);
      border-radius: 10px;
      background: white;
      cursor: pointer;
      font: inherit;
    }

    .calendar-day.blank {
      border: none;
      background: transparent;
    }

    .calendar-day.weekend {
      background: #eee9df;
      color: #8a857d;
    }

    .calendar-day.today {
      border: 2px solid var(--accent-2);
    }

    .calendar-day.onsite {
      background: var(--accent);
      color: white;
    }

    .counter {
      font-weight: 600;
    }

    .trend rect {
      fill: var(--accent-2);
    }

    .trend text {
      font-size: 11px;
      fill: #5f5c57;
    }

    .trend .quota {
      stroke: var(--accent);
      stroke-dasharray: 4 4;
    }
  </style>
</head>
<body>
  <main class="app">
    <div class="nav">
      <form method="post" action="/nav/prev"><button type="submit">&larr;</button></form>
      <h2>{{TITLE}}</h2>
      <form method="post" action="/nav/next"><button type="submit">&rarr;</button></form>
    </div>
    <div class="calendar-grid">{{GRID}}</div>
    <div class="counter">{{COUNTER}}</div>
    {{CHART}}
    <form method="post" action="/open"><button type="submit">Today</button></form>
  </main>
</body>
</html>
"#;
