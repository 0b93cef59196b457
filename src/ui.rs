//! Terminal table for `gvx list`.
//!
//! Columns size to their content and the widest column shrinks until the
//! table fits the terminal. Cells may carry ANSI colors; widths are measured
//! on the visible text.

use colored::*;

const INDENT: &str = "  ";
const MIN_COL_WIDTH: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        print!("{}", self.render(term_width as usize));
    }

    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(console::measure_text_width(&flatten(cell)));
            }
        }
        shrink_to_fit(&mut widths, max_width);

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{INDENT}{left}{}{right}\n", segments.join(mid))
        };
        let line = |cells: Vec<String>| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| {
                    let shown = console::truncate_str(cell, w, "...");
                    let pad = w.saturating_sub(console::measure_text_width(&shown));
                    format!(" {}{} ", shown, " ".repeat(pad))
                })
                .collect();
            format!("{INDENT}│{}│\n", padded.join("│"))
        };

        let mut out = border("┌", "┬", "┐");
        out.push_str(&line(
            self.headers.iter().map(|h| h.bold().to_string()).collect(),
        ));
        out.push_str(&border("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row.iter().map(|c| flatten(c)).collect()));
        }
        out.push_str(&border("└", "┴", "┘"));
        out
    }
}

/// Repeatedly narrow the widest column (down to a floor) until it fits.
fn shrink_to_fit(widths: &mut [usize], max_width: usize) {
    let overhead = INDENT.len() + 1 + 3 * widths.len();
    let budget = max_width.saturating_sub(overhead);

    while widths.iter().sum::<usize>() > budget {
        let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            return;
        };
        if widest <= MIN_COL_WIDTH {
            return;
        }
        widths[idx] -= 1;
    }
}

fn flatten(cell: &str) -> String {
    cell.replace(['\n', '\r', '\t'], " ")
}
