//! Roster rows and CSV parsing

/// One data row of the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// 1-based line number in the roster text
    pub line: usize,
    pub raw_handle: Option<String>,
    pub raw_identifier: Option<String>,
}

impl RosterEntry {
    fn from_fields(line: usize, fields: Vec<String>) -> Self {
        let mut fields = fields.into_iter().map(|f| {
            let f = f.trim();
            (!f.is_empty()).then(|| f.to_string())
        });

        Self {
            line,
            raw_handle: fields.next().flatten(),
            raw_identifier: fields.next().flatten(),
        }
    }
}

/// Parse roster CSV text into rows
///
/// The first non-blank line is the header and is dropped, as are blank
/// lines. Columns past the second are ignored. Quoted fields may contain
/// commas and `""` escapes but not line breaks.
pub fn parse_roster(text: &str) -> Vec<RosterEntry> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .skip(1)
        .map(|(idx, line)| RosterEntry::from_fields(idx + 1, split_fields(line)))
        .collect()
}

fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: usize, handle: Option<&str>, identifier: Option<&str>) -> RosterEntry {
        RosterEntry {
            line,
            raw_handle: handle.map(str::to_string),
            raw_identifier: identifier.map(str::to_string),
        }
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("alice,7"), vec!["alice", "7"]);
        assert_eq!(split_fields("alice,"), vec!["alice", ""]);
        assert_eq!(split_fields(""), vec![""]);
        assert_eq!(split_fields("\"a, b\",\"1\""), vec!["a, b", "1"]);
        assert_eq!(split_fields("\"say \"\"hi\"\"\",2"), vec!["say \"hi\"", "2"]);
        assert_eq!(split_fields(" \"bob\" ,3"), vec!["bob ", "3"]);
        assert_eq!(split_fields("o\"neil,4"), vec!["o\"neil", "4"]);
    }

    #[test]
    fn test_parse_roster_skips_header_and_blank_lines() {
        let text = "username,fid\r\nalice,\r\n\r\n  \nbob,42\n";
        assert_eq!(
            parse_roster(text),
            vec![entry(2, Some("alice"), None), entry(5, Some("bob"), Some("42"))]
        );
    }

    #[test]
    fn test_parse_roster_empty_and_header_only() {
        assert!(parse_roster("").is_empty());
        assert!(parse_roster("username,fid").is_empty());
        assert!(parse_roster("\n\nusername,fid\n\n").is_empty());
    }

    #[test]
    fn test_parse_roster_keeps_malformed_rows() {
        let text = "username,fid\n,\n\"\",\"\"\n,,extra\ncarol\n";
        assert_eq!(
            parse_roster(text),
            vec![
                entry(2, None, None),
                entry(3, None, None),
                entry(4, None, None),
                entry(5, Some("carol"), None),
            ]
        );
    }

    #[test]
    fn test_parse_roster_google_export_quoting() {
        let text = "\"username\",\"fid\"\n\"alice\",\"\"\n\"\",\"42\"\n";
        assert_eq!(
            parse_roster(text),
            vec![entry(2, Some("alice"), None), entry(3, None, Some("42"))]
        );
    }
}
