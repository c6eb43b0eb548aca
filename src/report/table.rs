/// Renders rows as a plain text grid:
///
/// ```text
/// +------+-----+
/// | Date | ... |
/// +======+=====+
/// | ...  | ... |
/// +------+-----+
/// ```
pub fn render_table<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let columns = header
        .len()
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for (i, h) in header.iter().enumerate() {
        widths[i] = widths[i].max(h.as_ref().chars().count());
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = |fill: char| {
        let mut line = String::from("+");
        for w in &widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    let render_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = w - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(pad + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = border('-');
    out.push_str(&render_row(header.iter().map(AsRef::as_ref).collect()));
    out.push_str(&border('='));
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
    }
    out.push_str(&border('-'));
    out
}

pub fn print_table<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) {
    print!("{}", render_table(header, rows));
}
