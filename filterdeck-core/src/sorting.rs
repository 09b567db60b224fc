use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a string for index ordering
/// - Unicode NFD decomposition with combining marks dropped ("É" sorts as "e")
/// - Lowercase
/// - Collapse internal whitespace
pub fn normalize_for_sorting(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sort keys by their normalized form, falling back to the raw key for ties
pub fn sort_keys(keys: &mut [String]) {
    keys.sort_by(|a, b| {
        normalize_for_sorting(a)
            .cmp(&normalize_for_sorting(b))
            .then_with(|| a.cmp(b))
    });
}
