use crate::models::form::Form;
use crate::models::response::{self, Response};

/// Render responses as CSV: one header row of question texts in schema
/// order, then one row per response. Every cell is quoted and every row ends
/// with `\n`.
pub fn to_csv(form: &Form, responses: &[Response]) -> String {
    let mut csv = String::new();

    push_row(&mut csv, form.questions.iter().map(|q| q.text.clone()));
    for resp in responses {
        push_row(
            &mut csv,
            form.questions.iter().map(|q| {
                response::answer_for(q, &resp.answers)
                    .map(|a| a.value.to_cell())
                    .unwrap_or_default()
            }),
        );
    }

    csv
}

fn push_row(csv: &mut String, cells: impl Iterator<Item = String>) {
    let row: Vec<String> = cells.map(|cell| quote(&cell)).collect();
    csv.push_str(&row.join(","));
    csv.push('\n');
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Attachment filename for an export: `<title>_responses.csv`, `form` when
/// the title has nothing usable.
pub fn file_name(form: &Form) -> String {
    let stem: String = form
        .title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "form_responses.csv".to_string()
    } else {
        format!("{stem}_responses.csv")
    }
}
