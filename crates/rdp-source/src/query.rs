//! SQL text construction for source queries.

/// Renders a projection query with bracket-quoted identifiers.
///
/// The ORDER BY clause is appended only when `order_by` is non-empty; an
/// empty clause is never emitted. Callers are responsible for identifiers
/// that need no escaping beyond bracket quoting.
pub fn build_select(table: &str, columns: &[String], order_by: &[String]) -> String {
    let mut sql = format!("SELECT {} FROM [{table}]", bracket_list(columns));
    if !order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&bracket_list(order_by));
    }
    sql
}

fn bracket_list(identifiers: &[String]) -> String {
    identifiers
        .iter()
        .map(|identifier| format!("[{identifier}]"))
        .collect::<Vec<_>>()
        .join(", ")
}
