use rusqlite::types::ValueRef;

/// Render a single SQLite value as display text.
pub fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

/// Render a result set as text: a header line of column names, one line per
/// row, and a row-count footer.
pub fn render_rows(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&columns.join(" | "));
    for row in rows {
        out.push('\n');
        out.push_str(&row.join(" | "));
    }
    out.push_str(&format!(
        "\n({} row{})",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    ));
    out
}
