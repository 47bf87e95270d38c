//! Tabular console output.
//!
//! [`TableWriter`] buffers rows of [`Cell`]s and aligns them into columns when
//! flushed. Columns are separated by tabs and padded with tabs, so output is
//! aligned on 8-column tab stops and still splits cleanly on `\t`.
//!
//! In quiet mode only the first cell of each row is printed and the header
//! row is dropped, which makes the output suitable for piping ids into other
//! commands.

use std::io::{self, Write};

use crate::core::cell::Cell;

/// Tab stop width used for padding.
pub const TAB_WIDTH: usize = 8;
/// Minimum gap between a cell and the next column.
const PADDING: usize = 1;

/// One output session: create, write rows, flush once.
///
/// Rows that are never flushed are lost.
pub struct TableWriter<W: Write> {
    sink: W,
    buf: String,
    header_pending: bool,
    quiet: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(sink: W, quiet: bool) -> Self {
        Self {
            sink,
            buf: String::new(),
            header_pending: true,
            quiet,
        }
    }

    /// Buffer one row. The first row written is the header. An empty row
    /// emits nothing.
    pub fn write_row(&mut self, cells: &[Cell<'_>]) {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            line.push_str(&cell.render());
            if self.quiet {
                line.push('\n');
                break;
            }
            line.push(if i + 1 < cells.len() { '\t' } else { '\n' });
        }

        if self.header_pending {
            self.header_pending = false;
            if self.quiet {
                return;
            }
        }
        self.buf.push_str(&line);
    }

    /// Align buffered rows and write them to the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        let text = std::mem::take(&mut self.buf);
        if !text.is_empty() {
            self.sink.write_all(align(&text).as_bytes())?;
        }
        self.sink.flush()
    }
}

/// Lay out tab-separated lines as elastic columns.
///
/// A column block is a run of consecutive lines that all have a tab-terminated
/// cell in that column. Cells in a block share a width; the text after the
/// last tab of a line is never padded.
fn align(text: &str) -> String {
    let lines: Vec<Vec<&str>> = text
        .split_terminator('\n')
        .map(|line| line.split('\t').collect())
        .collect();
    let mut out = String::with_capacity(text.len());
    let mut widths = Vec::new();
    format_block(&lines, 0, lines.len(), &mut widths, &mut out);
    out
}

fn format_block(
    lines: &[Vec<&str>],
    mut line0: usize,
    line1: usize,
    widths: &mut Vec<usize>,
    out: &mut String,
) {
    let column = widths.len();
    let mut this = line0;
    while this < line1 {
        if column + 1 >= lines[this].len() {
            this += 1;
            continue;
        }

        write_lines(&lines[line0..this], widths, out);
        line0 = this;

        let mut width = 0;
        while this < line1 && column + 1 < lines[this].len() {
            width = width.max(text_width(lines[this][column]) + PADDING);
            this += 1;
        }

        widths.push(width);
        format_block(lines, line0, this, widths, out);
        widths.pop();
        line0 = this;
    }
    write_lines(&lines[line0..line1], widths, out);
}

fn write_lines(lines: &[Vec<&str>], widths: &[usize], out: &mut String) {
    for line in lines {
        for (j, cell) in line.iter().enumerate() {
            out.push_str(cell);
            if let Some(width) = widths.get(j) {
                write_padding(text_width(cell), *width, out);
            }
        }
        out.push('\n');
    }
}

fn write_padding(text_width: usize, cell_width: usize, out: &mut String) {
    let cell_width = cell_width.div_ceil(TAB_WIDTH) * TAB_WIDTH;
    let gap = cell_width.saturating_sub(text_width);
    for _ in 0..gap.div_ceil(TAB_WIDTH) {
        out.push('\t');
    }
}

fn text_width(cell: &str) -> usize {
    cell.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(cells: &[&'a str]) -> Vec<Cell<'a>> {
        cells.iter().map(|cell| Cell::Text(*cell)).collect()
    }

    fn render(quiet: bool, rows: &[Vec<Cell<'_>>]) -> String {
        let mut out = Vec::new();
        let mut writer = TableWriter::new(&mut out, quiet);
        for cells in rows {
            writer.write_row(cells);
        }
        writer.flush().expect("flush");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn header_and_rows_in_normal_mode() {
        let out = render(false, &[row(&["NAME", "AGE"]), row(&["alice", "30"])]);
        assert_eq!(out, "NAME\tAGE\nalice\t30\n");
    }

    #[test]
    fn quiet_mode_drops_header_and_extra_columns() {
        let out = render(true, &[row(&["NAME", "AGE"]), row(&["alice", "30"])]);
        assert_eq!(out, "alice\n");
    }

    #[test]
    fn quiet_mode_with_only_a_header_prints_nothing() {
        let out = render(true, &[row(&["NAME", "AGE"])]);
        assert_eq!(out, "");
    }

    #[test]
    fn header_is_only_the_first_row() {
        let out = render(
            true,
            &[
                row(&["ID"]),
                row(&["vm-1", "Running"]),
                row(&["vm-2", "Stopped"]),
            ],
        );
        assert_eq!(out, "vm-1\nvm-2\n");
    }

    #[test]
    fn empty_row_emits_nothing() {
        let rows = [row(&["ID"]), Vec::new(), row(&["vm-1"])];
        assert_eq!(render(true, &rows), "vm-1\n");
        assert_eq!(render(false, &rows), "ID\nvm-1\n");
    }

    #[test]
    fn empty_first_row_counts_as_header() {
        let rows = [Vec::new(), row(&["vm-1"])];
        assert_eq!(render(true, &rows), "vm-1\n");
    }

    #[test]
    fn integer_cells_render_in_decimal() {
        let out = render(
            false,
            &[
                row(&["CPUS", "MEMORY"]),
                vec![Cell::Int(42), Cell::Int(1024)],
            ],
        );
        assert_eq!(out, "CPUS\tMEMORY\n42\t1024\n");
    }

    #[test]
    fn wide_cells_widen_the_whole_column() {
        let out = render(false, &[row(&["ID", "NAME"]), row(&["0123456789ab", "vm"])]);
        assert_eq!(out, "ID\t\tNAME\n0123456789ab\tvm\n");
    }

    #[test]
    fn line_without_separator_ends_a_column_block() {
        let out = render(
            false,
            &[row(&["0123456789ab", "x"]), row(&["--"]), row(&["a", "b"])],
        );
        assert_eq!(out, "0123456789ab\tx\n--\na\tb\n");
    }

    #[test]
    fn second_flush_writes_nothing() {
        let mut out = Vec::new();
        let mut writer = TableWriter::new(&mut out, false);
        writer.write_row(&row(&["NAME"]));
        writer.write_row(&row(&["alice"]));
        writer.flush().expect("first flush");
        writer.flush().expect("second flush");
        assert_eq!(String::from_utf8(out).expect("utf8"), "NAME\nalice\n");
    }

    #[test]
    fn nothing_reaches_the_sink_before_flush() {
        let mut out = Vec::new();
        {
            let mut writer = TableWriter::new(&mut out, false);
            writer.write_row(&row(&["NAME"]));
            writer.write_row(&row(&["alice"]));
        }
        assert!(out.is_empty());
    }

    #[test]
    fn split_on_separator_recovers_cells() {
        let cells = ["vm-1", "Running", "2"];
        let out = render(false, &[row(&cells)]);
        let recovered: Vec<&str> = out.trim_end_matches('\n').split('\t').collect();
        assert_eq!(recovered, cells);
    }
}
