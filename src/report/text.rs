use crate::model::confusion::ConfusionMatrix;
use crate::report::TotalSummary;

pub fn render_total_report(path: &str, summary: &TotalSummary, n_dropped: usize) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "File ({}) had {} events in it\n\n",
        path, summary.n_events
    ));
    if n_dropped > 0 {
        out.push_str(&format!(
            "{} events were dropped during evaluation (truncated voxel arrays)\n\n",
            n_dropped
        ));
    }
    out.push_str(&format!("Data came from root file: {}\n\n", summary.file));
    out.push_str(&format!("Checkpoint used was: {}\n\n", summary.checkpoint));
    out.push_str(&format_matrix(&summary.total));
    out.push('\n');
    out
}

/// Bracketed rows with every cell right-aligned to the widest count.
pub fn format_matrix(m: &ConfusionMatrix) -> String {
    let width = m
        .rows()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::from("[");
    for (i, row) in m.rows().enumerate() {
        if i > 0 {
            out.push_str("\n ");
        }
        out.push('[');
        let cells = row
            .iter()
            .map(|v| format!("{:>width$}", v))
            .collect::<Vec<_>>();
        out.push_str(&cells.join(" "));
        out.push(']');
    }
    out.push(']');
    out
}
