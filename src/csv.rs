//! Minimal CSV parsing for spreadsheet exports.
//!
//! Handles quoted fields, doubled-quote escapes and CRLF line endings, which
//! is all the spreadsheet CSV export produces. Rows that are completely empty
//! are dropped.

/// Parse CSV text into rows of fields.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut field));
            }
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if row.iter().any(|f| !f.is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush the trailing row even if the text does not end with a newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        if row.iter().any(|f| !f.is_empty()) {
            rows.push(row);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_rows() {
        let rows = parse_rows("a,b,c\nd,e,f\n");
        assert_eq!(
            rows,
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn parses_quoted_fields_with_commas_and_newlines() {
        let rows = parse_rows("id,review\n1,\"Loud, then quiet.\nThen loud.\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "Loud, then quiet.\nThen loud.");
    }

    #[test]
    fn unescapes_doubled_quotes() {
        let rows = parse_rows("1,\"a \"\"quoted\"\" word\"");
        assert_eq!(rows[0][1], "a \"quoted\" word");
    }

    #[test]
    fn tolerates_crlf_and_missing_trailing_newline() {
        let rows = parse_rows("a,b\r\nc,d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn drops_fully_empty_rows() {
        let rows = parse_rows("a,b\n\n,,\nc,d\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}
