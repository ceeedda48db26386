use interfaces_github_starred::index::FeedEntry;

/// Returns the entries of `new_entries` whose `html_url` is not in `old_entries`.
///
/// With no previous state every entry is new. Entries that only exist in
/// `old_entries` (unstarred repos) are ignored, and the result keeps the order
/// of `new_entries`.
pub fn new_entries(new_entries: &[FeedEntry], old_entries: Option<&[FeedEntry]>) -> Vec<FeedEntry> {
    let Some(old_entries) = old_entries else {
        return new_entries.to_vec();
    };

    new_entries
        .iter()
        .filter(|new_entry| {
            !old_entries
                .iter()
                .any(|old_entry| old_entry.html_url() == new_entry.html_url())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> FeedEntry {
        FeedEntry::new(
            format!("owner/{name}"),
            format!("https://github.com/owner/{name}"),
            None,
            "2024-01-01T00:00:00Z",
        )
        .unwrap()
    }

    fn urls(entries: &[FeedEntry]) -> Vec<&str> {
        entries.iter().map(FeedEntry::html_url).collect()
    }

    #[test]
    fn test_first_run_everything_is_new() {
        let new = vec![entry("a"), entry("b"), entry("c")];
        assert_eq!(new_entries(&new, None), new);
    }

    #[test]
    fn test_first_run_with_empty_feed() {
        assert!(new_entries(&[], None).is_empty());
    }

    #[test]
    fn test_added_star_is_detected() {
        let old = vec![entry("a")];
        let new = vec![entry("a"), entry("b")];

        let diff = new_entries(&new, Some(old.as_slice()));
        assert_eq!(urls(&diff), vec!["https://github.com/owner/b"]);
    }

    #[test]
    fn test_removed_stars_are_ignored() {
        let old = vec![entry("a"), entry("gone")];
        let new = vec![entry("a")];

        assert!(new_entries(&new, Some(old.as_slice())).is_empty());
    }

    #[test]
    fn test_empty_previous_state_is_not_absent() {
        let new = vec![entry("a")];
        assert_eq!(new_entries(&new, Some(&[][..])), new);
    }

    #[test]
    fn test_order_follows_new_entries() {
        let old = vec![entry("m")];
        let new = vec![entry("z"), entry("m"), entry("b"), entry("y")];

        let diff = new_entries(&new, Some(old.as_slice()));
        assert_eq!(
            urls(&diff),
            vec![
                "https://github.com/owner/z",
                "https://github.com/owner/b",
                "https://github.com/owner/y",
            ]
        );
    }

    #[test]
    fn test_matching_is_by_url_only() {
        let old = vec![FeedEntry::new("renamed/a", "https://github.com/owner/a", Some("old".into()), "x").unwrap()];
        let new = vec![entry("a")];

        assert!(new_entries(&new, Some(old.as_slice())).is_empty());
    }

    #[test]
    fn test_diff_is_exact_set_difference() {
        let old = vec![entry("a"), entry("c"), entry("e")];
        let new = vec![entry("a"), entry("b"), entry("c"), entry("d")];

        let diff = new_entries(&new, Some(old.as_slice()));
        for e in &diff {
            assert!(!old.iter().any(|o| o.html_url() == e.html_url()));
        }
        for n in &new {
            let in_old = old.iter().any(|o| o.html_url() == n.html_url());
            let in_diff = diff.iter().any(|d| d.html_url() == n.html_url());
            assert_eq!(in_diff, !in_old);
        }
    }
}
