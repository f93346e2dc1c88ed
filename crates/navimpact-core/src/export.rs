use crate::grant::Grant;

pub const GRANT_CSV_HEADERS: [&str; 7] =
    ["ID", "Title", "Funder", "Amount", "Deadline", "Status", "Category"];

/// Quotes one cell, doubling any embedded quote.
pub fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn to_csv<H, R, C>(headers: &[H], rows: R) -> String
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<C>>,
    C: AsRef<str>,
{
    let mut lines = vec![join_row(headers)];
    lines.extend(rows.into_iter().map(|row| join_row(&row)));
    lines.join("\n")
}

fn join_row<C: AsRef<str>>(cells: &[C]) -> String {
    cells
        .iter()
        .map(|c| csv_cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn grants_to_csv(grants: &[Grant]) -> String {
    to_csv(
        GRANT_CSV_HEADERS.as_slice(),
        grants.iter().map(|g| {
            vec![
                g.id.clone(),
                g.title.clone(),
                g.funder.clone(),
                g.amount.map(|a| a.to_string()).unwrap_or_default(),
                g.deadline.clone().unwrap_or_default(),
                g.status.clone(),
                g.category.clone(),
            ]
        }),
    )
}
