/// Returns the byte length of the part of `content` matching `prefix`,
/// ignoring case. Returns `None` on the first mismatching char.
fn match_len(content: &str, prefix: &str) -> Option<usize> {
    let mut chars = content.char_indices();
    let mut end = 0;

    for expected in prefix.chars() {
        let (i, c) = chars.next()?;

        if c != expected && !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }

        end = i + c.len_utf8();
    }

    Some(end)
}

/// Resolves the prefix used by `content` from a list of `candidates`.
///
/// Longer candidates are tried first, candidates of equal length keep their
/// order. The comparison ignores case and the matched prefix absorbs all
/// following whitespace. Candidates are trimmed, blank candidates never
/// match. The returned slice is taken from `content`, so it
/// keeps the case of the message.
pub fn resolve_prefix<'a, S>(candidates: &[S], content: &'a str) -> Option<&'a str>
where
    S: AsRef<str>,
{
    if content.is_empty() {
        return None;
    }

    let mut sorted: Vec<&str> = candidates
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();
    // `sort_by` is stable.
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    for candidate in sorted {
        if let Some(end) = match_len(content, candidate) {
            let rest = &content[end..];
            let end = end + (rest.len() - rest.trim_start().len());

            return Some(&content[..end]);
        }
    }

    None
}

/// Builds the ordered candidate list for a message.
///
/// Mention prefixes come first, followed by the guild prefixes (or `default`
/// if the guild has none configured) and finally the user prefixes.
pub fn candidates(
    mentions: &[String],
    guild: Option<&[String]>,
    default: &[String],
    user: Option<&[String]>,
) -> Vec<String> {
    let mut list = mentions.to_vec();

    match guild {
        Some(prefixes) if !prefixes.is_empty() => list.extend_from_slice(prefixes),
        _ => list.extend_from_slice(default),
    }

    if let Some(prefixes) = user {
        list.extend_from_slice(prefixes);
    }

    list
}

#[cfg(test)]
mod tests {
    use super::{candidates, match_len, resolve_prefix};

    #[test]
    fn test_match_len() {
        assert_eq!(match_len("n!ping", "n!"), Some(2));
        assert_eq!(match_len("N!ping", "n!"), Some(2));
        assert_eq!(match_len("n", "n!"), None);
        assert_eq!(match_len("x!ping", "n!"), None);
        // Multi-byte chars are mapped back to byte offsets.
        assert_eq!(match_len("ÄÖping", "äö"), Some(4));
    }

    #[test]
    fn test_resolve_prefix_whitespace() {
        let prefixes = ["n!", "nokari"];
        assert_eq!(resolve_prefix(&prefixes, "Nokari   ping"), Some("Nokari   "));
        assert_eq!(resolve_prefix(&prefixes, "n!ping"), Some("n!"));
        assert_eq!(resolve_prefix(&prefixes, "n! \n ping"), Some("n! \n "));
    }

    #[test]
    fn test_resolve_prefix_longest() {
        assert_eq!(resolve_prefix(&["a", "ab"], "abc"), Some("ab"));
        assert_eq!(resolve_prefix(&["ab", "a"], "abc"), Some("ab"));
        assert_eq!(resolve_prefix(&["a", "ab"], "acb"), Some("a"));
    }

    #[test]
    fn test_resolve_prefix_tie_keeps_order() {
        // Equal length, both match when ignoring case.
        assert_eq!(resolve_prefix(&["N!", "n!"], "n!ping"), Some("n!"));
        assert_eq!(resolve_prefix(&["x!", "n!"], "n!ping"), Some("n!"));
    }

    #[test]
    fn test_resolve_prefix_trims_candidates() {
        assert_eq!(resolve_prefix(&["  n! "], "n!  ping"), Some("n!  "));
        // Padding doesn't make a candidate longer.
        assert_eq!(resolve_prefix(&["a   ", "ab"], "abc"), Some("ab"));
    }

    #[test]
    fn test_resolve_prefix_skips_blank() {
        assert_eq!(resolve_prefix(&["  ", "n!"], "hello"), None);
        assert_eq!(resolve_prefix(&["", "n!"], "n!ping"), Some("n!"));
    }

    #[test]
    fn test_resolve_prefix_none() {
        let prefixes = ["n!", "nokari"];
        assert_eq!(resolve_prefix(&prefixes, ""), None);
        assert_eq!(resolve_prefix(&prefixes, "hello"), None);
        assert_eq!(resolve_prefix(&prefixes, "n"), None);
        assert_eq!(resolve_prefix::<&str>(&[], "n!ping"), None);
    }

    #[test]
    fn test_candidates() {
        let mentions = vec![String::from("<@1>"), String::from("<@!1>")];
        let default = vec![String::from("nokari"), String::from("n!")];
        let guild = vec![String::from("?")];
        let user = vec![String::from("hey ")];

        assert_eq!(
            candidates(&mentions, None, &default, Some(user.as_slice())),
            ["<@1>", "<@!1>", "nokari", "n!", "hey "]
        );
        assert_eq!(
            candidates(&mentions, Some(guild.as_slice()), &default, None),
            ["<@1>", "<@!1>", "?"]
        );
        assert_eq!(candidates(&[], Some(&[][..]), &default, None), ["nokari", "n!"]);
    }
}
