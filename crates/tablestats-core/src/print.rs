//! Fixed-width text rendering of the data table and moment matrices.
//!
//! Pure formatting: nothing here touches table state.

/// Width of one numeric cell.
const CELL_WIDTH: usize = 12;
/// Significant digits carried per cell.
const SIG_DIGITS: usize = 8;

/// Render `rows` as a labeled fixed-width table. The label column is sized
/// to the longest row label (or the corner text), numeric cells carry
/// `SIG_DIGITS` significant digits in `CELL_WIDTH` characters.
pub(crate) fn render_matrix(
    rows: &[Vec<f64>],
    corner: Option<&str>,
    row_labels: &[String],
    col_labels: &[String],
) -> String {
    debug_assert_eq!(rows.len(), row_labels.len());

    let label_width = row_labels
        .iter()
        .map(|label| label.len())
        .chain(corner.map(str::len))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{:<1$} ", corner.unwrap_or(""), label_width));
    for label in col_labels {
        out.push_str(&format!("{:>1$} ", label, CELL_WIDTH));
    }
    out.push('\n');

    for (row, label) in rows.iter().zip(row_labels) {
        out.push_str(&format!("{:<1$} ", label, label_width));
        for &value in row {
            out.push_str(&format_cell(value));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// %g-style cell formatting: scientific notation once the magnitude leaves
/// the compact range, fixed-point with 8 significant digits otherwise.
fn format_cell(value: f64) -> String {
    let magnitude = value.abs();
    let body = if !value.is_finite() {
        format!("{value}")
    } else if magnitude != 0.0 && !(1e-4..1e8).contains(&magnitude) {
        format!("{:.*e}", SIG_DIGITS - 1, value)
    } else {
        let integer_digits = if magnitude >= 1.0 {
            magnitude.log10().floor() as usize + 1
        } else {
            1
        };
        format!("{:.*}", SIG_DIGITS.saturating_sub(integer_digits), value)
    };
    format!("{:>1$}", body, CELL_WIDTH)
}
