use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Display width of a cell. Hangul, CJK ideographs and punctuation,
/// full-width forms and emoji take two terminal columns.
fn width(cell: &str) -> usize {
    cell.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F         // Hangul Jamo initials
        | 0x2E80..=0x303E       // CJK radicals, ideographic space and punctuation
        | 0x3041..=0x33FF       // kana, compatibility Jamo, CJK symbols
        | 0x3400..=0x4DBF       // CJK extension A
        | 0x4E00..=0x9FFF       // CJK unified ideographs
        | 0xA000..=0xA4CF       // Yi
        | 0xA960..=0xA97F       // Hangul Jamo extended A
        | 0xAC00..=0xD7A3       // Hangul syllables
        | 0xF900..=0xFAFF       // CJK compatibility ideographs
        | 0xFE10..=0xFE19       // vertical forms
        | 0xFE30..=0xFE6F       // CJK compatibility and small forms
        | 0xFF00..=0xFF60       // full-width ASCII
        | 0xFFE0..=0xFFE6       // full-width signs
        | 0x1F300..=0x1F64F     // pictographs and emoticons
        | 0x1F900..=0x1F9FF     // supplemental pictographs
        | 0x20000..=0x2FFFD     // CJK extensions B..F
        | 0x30000..=0x3FFFD)
}

fn pad(cell: &str, to: usize) -> String {
    let mut out = cell.to_string();
    out.extend(std::iter::repeat(' ').take(to.saturating_sub(width(cell))));
    out
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in render_table(headers, &rows) {
        println!("{}", line.trim_end());
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(width(cell));
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect();
    lines.push(header_row.join("  "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(sep.join("  "));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
            .collect();
        lines.push(cells.join("  "));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hangul_counts_double_width() {
        assert_eq!(width("abc"), 3);
        assert_eq!(width("박찬진"), 6);
    }

    #[test]
    fn cjk_punctuation_and_fullwidth_signs_are_wide() {
        assert_eq!(width("\u{3000}"), 2);
        assert_eq!(width("、。"), 4);
        assert_eq!(width("￥￦"), 4);
        assert_eq!(width("ｱ"), 1);
    }

    #[test]
    fn columns_align_on_display_width() {
        let rows = vec![
            vec!["박찬진".to_string(), "손걸래, 세절기".to_string()],
            vec!["kim".to_string(), "x".to_string()],
        ];
        let lines = render_table(&["STUDENT", "AREA"], &rows);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "-------  --------------");

        // The second column starts at the same display offset on every line.
        let offset = |l: &str, cell: &str| width(&l[..l.find(cell).unwrap()]);
        assert_eq!(offset(&lines[0], "AREA"), 9);
        assert_eq!(offset(&lines[2], "손걸래"), 9);
        assert_eq!(offset(&lines[3], "x"), 9);
    }
}
