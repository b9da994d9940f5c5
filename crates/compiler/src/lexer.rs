//! Tokenizer for RPN text.

/// Tokenize a single line of RPN text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line. Tokens are separated
/// by spaces, tabs or commas.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    // Strip comment
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() {
        assert!(tokenize_line("").is_empty());
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize_line("   \t  ").is_empty());
    }

    #[test]
    fn comment_only() {
        assert!(tokenize_line("; this is a comment").is_empty());
    }

    #[test]
    fn command_with_comment() {
        assert_eq!(tokenize_line("ADD ; add two values"), vec!["ADD"]);
    }

    #[test]
    fn const_with_arguments() {
        assert_eq!(
            tokenize_line("CONST int64 2"),
            vec!["CONST", "int64", "2"]
        );
    }

    #[test]
    fn commas_separate_tokens() {
        assert_eq!(
            tokenize_line("CONST,float64,\t-1.5"),
            vec!["CONST", "float64", "-1.5"]
        );
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(tokenize_line("  read Theta"), vec!["read", "Theta"]);
    }
}
