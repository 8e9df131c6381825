// HTML rendering of the leaderboard and of the admin dashboard.

use std::fmt::Write;

use crate::board::admin::Notice;
use crate::board::*;

/// Headings of the leaderboard page.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub title: String,
    pub subtitle: String,
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

const STYLE: &str = r#"
    body { margin: 0; font-family: sans-serif; display: flex; min-height: 100vh; color: #1f2937; }
    nav { width: 14rem; padding: 1.5rem; background: #f3f4f6; }
    nav a { display: block; margin: 0.5rem 0; color: #1f2937; }
    main { flex: 1; padding: 1.5rem 2rem; }
    table { border-collapse: collapse; margin-bottom: 1.5rem; }
    th, td { border: 1px solid #d1d5db; padding: 0.35rem 0.75rem; text-align: left; }
    th { background: #e5e7eb; }
    .notice { padding: 0.6rem 1rem; margin: 0.5rem 0; border-radius: 0.3rem; }
    .success { background: #dcfce7; }
    .warning { background: #fef9c3; }
    .error { background: #fee2e2; }
    form { margin-bottom: 1rem; }
    label { display: block; margin: 0.4rem 0; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>{style}</style>
</head>
<body>
  <nav>
    <h2>Sports Event Standings</h2>
    <a href="/">User View</a>
    <a href="/admin">Admin View</a>
  </nav>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        body = body
    )
}

/// Renders rows as a table. When `styled`, filled podium cells get their highlight.
pub fn render_table(layout: Layout, rows: &[&Standing], styled: bool) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for col in layout.columns() {
        let _ = write!(out, "<th>{}</th>", escape(col));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for s in rows {
        let _ = write!(out, "<tr><td>{}</td>", escape(&s.event));
        if layout.is_categorized() {
            let _ = write!(
                out,
                "<td>{}</td>",
                escape(s.category.as_deref().unwrap_or(""))
            );
        }
        for place in Place::ALL {
            let value = s.get(place);
            match style(value, place).filter(|_| styled) {
                Some(cs) => {
                    let _ = write!(
                        out,
                        r#"<td style="{}">{}</td>"#,
                        cs.css(),
                        escape(value)
                    );
                }
                None => {
                    let _ = write!(out, "<td>{}</td>", escape(value));
                }
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// The read-only leaderboard: one table per category, or a single table for the flat layout.
pub fn render_leaderboard(table: &Table, info: &PageInfo) -> String {
    let mut body = format!(
        "<h1>🏆 {}</h1>\n<h3>{}</h3>\n<h3>View the latest standings for all events below.</h3>\n",
        escape(&info.title),
        escape(&info.subtitle)
    );
    match table.layout() {
        Layout::Categorized => {
            for (category, rows) in table.grouped() {
                let _ = writeln!(body, "<h3>{} Leaderboard</h3>", escape(category));
                body.push_str(&render_table(table.layout(), &rows, true));
            }
        }
        Layout::Flat => {
            let rows: Vec<&Standing> = table.rows().iter().collect();
            body.push_str(&render_table(table.layout(), &rows, true));
        }
    }
    page(&info.title, &body)
}

fn render_notice(notice: &Notice) -> String {
    let class = match notice {
        Notice::Success(_) => "success",
        Notice::Warning(_) => "warning",
        Notice::Error(_) => "error",
    };
    format!(
        "<div class=\"notice {}\">{}</div>\n",
        class,
        escape(notice.text())
    )
}

/// The password form, with the outcome of a previous attempt if any.
pub fn render_login(notice: Option<&Notice>) -> String {
    let mut body = String::from("<h1>Admin Dashboard - Manage Standings and Events</h1>\n");
    if let Some(n) = notice {
        body.push_str(&render_notice(n));
    }
    body.push_str(
        r#"<form method="post" action="/admin">
  <label>Enter admin password: <input type="password" name="password" /></label>
  <button type="submit">Enter</button>
</form>
"#,
    );
    page("Admin View", &body)
}

fn options(values: &[&str], selected: Option<&str>) -> String {
    let mut out = String::new();
    for v in values {
        let sel = if Some(*v) == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{v}"{sel}>{v}</option>"#,
            v = escape(v),
            sel = sel
        );
    }
    out
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}" />"#,
        name,
        escape(value)
    )
}

/// What the dashboard is currently showing.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub password: &'a str,
    pub selection: Selection,
    pub notices: Vec<Notice>,
}

/// The admin dashboard: current standings and the update, add and delete forms.
///
/// Every form carries the password so that each request is checked on its own.
pub fn render_dashboard(table: &Table, view: &DashboardView) -> String {
    let layout = table.layout();
    let pw = hidden("password", view.password);
    let mut body = String::from("<h1>Admin Dashboard - Manage Standings and Events</h1>\n");
    body.push_str(&render_notice(&Notice::Success("Access granted!".to_string())));
    for n in view.notices.iter() {
        body.push_str(&render_notice(n));
    }

    body.push_str("<p>Current Standings:</p>\n");
    let all: Vec<&Standing> = table.rows().iter().collect();
    body.push_str(&render_table(layout, &all, false));

    let categories = table.categories();
    let (sel_category, sel_event, selected_row) = match &view.selection {
        Selection::Row {
            index,
            category,
            event,
        } => (
            category.as_deref(),
            Some(event.as_str()),
            table.rows().get(*index),
        ),
        Selection::Nothing => (None, None, None),
    };
    let events = table.events(sel_category);

    // Selection
    body.push_str("<h2>Update Event Standings</h2>\n");
    let _ = write!(body, r#"<form method="post" action="/admin">{}"#, pw);
    if layout.is_categorized() {
        let _ = write!(
            body,
            r#"<label>Select Category: <select name="category">{}</select></label>"#,
            options(&categories, sel_category)
        );
    }
    let _ = write!(
        body,
        r#"<label>Select Event: <select name="event">{}</select></label><button type="submit">Select</button></form>
"#,
        options(&events, sel_event)
    );

    match selected_row {
        Some(row) => {
            let _ = write!(body, r#"<form method="post" action="/admin/update">{}"#, pw);
            if let Some(c) = row.category.as_deref() {
                body.push_str(&hidden("category", c));
            }
            body.push_str(&hidden("event", &row.event));
            for (name, place) in ["first", "second", "third"].iter().zip(Place::ALL) {
                let _ = write!(
                    body,
                    r#"<label>{}: <input type="text" name="{}" value="{}" /></label>"#,
                    place.column(),
                    name,
                    escape(row.get(place))
                );
            }
            body.push_str("<button type=\"submit\">Update Standings</button></form>\n");
        }
        None => body.push_str("<p>No events to select.</p>\n"),
    }

    // Add
    body.push_str("<h2>Add New Event</h2>\n");
    let _ = write!(
        body,
        r#"<form method="post" action="/admin/add">{}<label>Enter new event name: <input type="text" name="new_event" /></label>"#,
        pw
    );
    if layout.is_categorized() {
        let mut add_categories = categories.clone();
        for c in layout.default_categories() {
            if !add_categories.contains(&c) {
                add_categories.push(c);
            }
        }
        let _ = write!(
            body,
            r#"<label>Select Category: <select name="new_category">{}</select></label>"#,
            options(&add_categories, sel_category)
        );
    }
    body.push_str("<button type=\"submit\">Add Event</button></form>\n");

    // Delete
    body.push_str("<h2>Delete Event</h2>\n");
    if events.is_empty() {
        body.push_str("<p>No events to delete.</p>\n");
    } else {
        let _ = write!(body, r#"<form method="post" action="/admin/delete">{}"#, pw);
        if let Some(c) = sel_category {
            let _ = write!(
                body,
                "{}<p>Category: {}</p>",
                hidden("category", c),
                escape(c)
            );
        }
        let _ = write!(
            body,
            r#"<label>Select Event to Delete: <select name="event">{}</select></label><button type="submit">Delete Event</button></form>
"#,
            options(&events, sel_event)
        );
    }
    page("Admin View", &body)
}
