/// Lowercase ASCII slug: alphanumerics kept, everything else collapsed
/// into single hyphens, trimmed at both ends.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_hyphen = true;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Candidate sequence for slug collision resolution: the base itself,
/// then base-1, base-2 and so on. An empty base yields "item".
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    let base = if base.is_empty() { "item" } else { base };

    std::iter::once(base.to_string())
        .chain((1u32..).map(move |n| format!("{}-{}", base, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  E-Commerce Site!  "), "e-commerce-site");
        assert_eq!(slugify("Rust 2024 Edition"), "rust-2024-edition");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("___"), "");
    }

    #[test]
    fn slugify_empty_when_no_alphanumerics() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slug_candidates_counts_up_from_base() {
        let candidates: Vec<String> = slug_candidates("my-project").take(4).collect();
        assert_eq!(
            candidates,
            vec!["my-project", "my-project-1", "my-project-2", "my-project-3"]
        );
    }

    #[test]
    fn slug_candidates_fall_back_for_empty_base() {
        let candidates: Vec<String> = slug_candidates("").take(2).collect();
        assert_eq!(candidates, vec!["item", "item-1"]);
    }

    #[test]
    fn slug_candidates_first_free_wins() {
        let taken = ["report", "report-1"];
        let chosen = slug_candidates("report")
            .find(|c| !taken.contains(&c.as_str()))
            .unwrap();
        assert_eq!(chosen, "report-2");
    }
}
