use interfaces_github_starred::index::FeedEntry;
use interfaces_omnivore_save_url::index::Label;

/// A tag fires when any keyword is a substring of the lowercased description or URL.
#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

/// Ordered rule table. Output tags follow this order.
pub const TAG_RULES: &[TagRule] = &[
    TagRule { keywords: &["javascript", "typescript", ".js", ".ts"], tag: "javascript" },
    TagRule { keywords: &["vim", "nvim", "neovim"], tag: "vim" },
    TagRule { keywords: &["openai"], tag: "ai" },
    TagRule { keywords: &["llm"], tag: "ai" },
    TagRule { keywords: &["python", ".py"], tag: "python" },
    TagRule { keywords: &["zig"], tag: "zig" },
    TagRule { keywords: &["cloudflare"], tag: "Cloudflare" },
    TagRule { keywords: &["rust", ".rs"], tag: "rust" },
    TagRule { keywords: &["deno"], tag: "deno" },
    TagRule { keywords: &[".go"], tag: "golang" },
    TagRule { keywords: &["svelte"], tag: "svelte" },
    TagRule { keywords: &["react"], tag: "react" },
];

/// Guesses topic labels for an entry from its description and URL.
///
/// Each tag name appears at most once, so an entry matching both the
/// `openai` and `llm` rules gets a single `ai` label rather than two.
pub fn guess_tags(entry: &FeedEntry) -> Vec<Label> {
    let description = entry.description().map(str::to_lowercase);
    let url = entry.html_url().to_lowercase();

    let includes_word = |word: &str| {
        description.as_deref().is_some_and(|d| d.contains(word)) || url.contains(word)
    };

    let mut tags: Vec<&'static str> = Vec::new();
    for rule in TAG_RULES {
        // two rules share the "ai" tag
        if tags.contains(&rule.tag) {
            continue;
        }
        if rule.keywords.iter().any(|&word| includes_word(word)) {
            tags.push(rule.tag);
        }
    }

    tags.into_iter().map(Label::named).collect()
}
