/// Splits a line-delimited candidate source into identities.
///
/// Lines are trimmed; blank lines are dropped. Duplicates and order are kept.
pub fn parse_candidates(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Renders accepted identities one per line, each newline-terminated.
pub fn render_accepted(identities: &[String]) -> String {
    let mut out = String::with_capacity(identities.iter().map(|id| id.len() + 1).sum());
    for identity in identities {
        out.push_str(identity);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_lines_are_trimmed() {
        assert_eq!(parse_candidates("A\r\nB\r\n"), vec!["A", "B"]);
    }

    #[test]
    fn empty_set_renders_nothing() {
        assert_eq!(render_accepted(&[]), "");
    }
}
