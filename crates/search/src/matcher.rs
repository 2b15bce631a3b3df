/// Returns true when every character of `query` appears in `target` in the
/// same relative order, ignoring case. Gaps between matched characters are
/// allowed, so `"adp"` matches `"Add Property"`.
///
/// The walk is a single greedy pass over `target`: the query position only
/// advances on a match, and the first available match is never worse than a
/// later one for a yes/no answer.
///
/// Case folding maps one char to one char, so a query with more
/// chars than the target never matches. Characters whose lowercase form is
/// several chars, such as `İ`, are compared as written, and `ß` does not
/// match `SS`.
pub fn matches(query: &str, target: &str) -> bool {
    let mut pending = query.chars().map(fold).peekable();

    for ch in target.chars().map(fold) {
        match pending.peek() {
            Some(&wanted) if wanted == ch => {
                pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    pending.peek().is_none()
}

/// Like [`matches`], but reports the byte offsets in `target` of the
/// characters consumed by the greedy walk. Used to highlight matched
/// characters in the palette list.
pub fn match_indices(query: &str, target: &str) -> Option<Vec<usize>> {
    let mut pending = query.chars().map(fold).peekable();
    let mut indices = Vec::new();

    for (offset, ch) in target.char_indices() {
        match pending.peek() {
            Some(&wanted) if wanted == fold(ch) => {
                pending.next();
                indices.push(offset);
            }
            Some(_) => {}
            None => break,
        }
    }

    pending.peek().is_none().then_some(indices)
}

/// Lowercase form of `ch` when it is a single char, otherwise `ch` itself.
fn fold(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("", ""));
        assert!(matches("", "anything"));
        assert!(matches("", "Add Property"));
    }

    #[test]
    fn non_empty_query_never_matches_empty_target() {
        assert!(!matches("a", ""));
        assert!(!matches(" ", ""));
    }

    #[test]
    fn subsequence_with_gaps_matches() {
        assert!(matches("adp", "Add Property"));
        assert!(matches("hlo", "hello"));
        assert!(matches("hello", "hello"));
    }

    #[test]
    fn wrong_relative_order_fails() {
        assert!(!matches("ehllo", "hello"));
        assert!(!matches("pa", "Add Property"));
    }

    #[test]
    fn longer_query_than_target_fails() {
        assert!(!matches("helloo", "hello"));
        assert!(!matches("abc", "ab"));
    }

    #[test]
    fn case_is_ignored_on_both_sides() {
        assert!(matches("ADD", "add property"));
        assert!(matches("add", "ADD PROPERTY"));
        assert!(matches("AsK gO", "ask go"));
        assert_eq!(matches("GO", "ask go"), matches("go", "ASK GO"));
    }

    #[test]
    fn contiguous_substrings_match() {
        let target = "Ask Go AI assistant for help";
        for (start, end) in [(0, 3), (4, 6), (7, 19), (20, 28)] {
            assert!(matches(&target[start..end], target));
        }
    }

    #[test]
    fn punctuation_is_matched_literally() {
        assert!(matches("a.*b", "a.*b"));
        assert!(!matches("a.*b", "aXXb"));
        assert!(matches("(x)", "f(x) = y"));
    }

    #[test]
    fn unicode_characters_participate() {
        assert!(matches("\u{e9}t\u{e9}", "\u{c9}T\u{c9}"));
        assert!(matches("\u{1F600}", "smile \u{1F600}"));
    }

    #[test]
    fn case_folding_never_lengthens_the_query() {
        assert!(!matches("i\u{307}", "\u{130}"));
        assert!(matches("\u{130}", "\u{130}"));
        assert!(matches("\u{130}", "x\u{130}y"));
        assert!(!matches("ss", "\u{df}"));
        assert!(!matches("\u{df}", "SS"));
        assert!(matches("\u{df}", "\u{1e9e}"));
        assert_eq!(match_indices("i\u{307}", "\u{130}"), None);
    }

    #[test]
    fn match_indices_reports_greedy_positions() {
        assert_eq!(match_indices("adp", "Add Property"), Some(vec![0, 1, 4]));
        assert_eq!(match_indices("", "hello"), Some(vec![]));
        assert_eq!(match_indices("ehllo", "hello"), None);
    }

    #[test]
    fn match_indices_agrees_with_matches() {
        let cases = [
            ("go", "Ask Go"),
            ("assist", "Ask Go AI assistant for help"),
            ("xyz", "Add Property"),
            ("", ""),
            ("a", ""),
        ];
        for (query, target) in cases {
            assert_eq!(
                match_indices(query, target).is_some(),
                matches(query, target),
                "{query:?} vs {target:?}"
            );
        }
    }
}
