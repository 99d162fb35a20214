//! Deterministic substitute content used when the model path fails.
//!
//! Keyword tables are ordered slices: the first rule whose keyword occurs
//! (case-insensitively) in the input wins, so rule order is the tie-break.

pub mod audit;
pub mod ecommerce;

pub struct Rule<T> {
    /// Lowercase substrings; any one matching selects the rule.
    pub keywords: &'static [&'static str],
    pub output: T,
}

pub fn first_match<'r, T>(rules: &'r [Rule<T>], text: &str) -> Option<&'r T> {
    let haystack = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k)))
        .map(|rule| &rule.output)
}

/// Appends defaults until `target` is reached, starting the rotation at the
/// current length and skipping anything already present. `last_resort` is
/// tried once if the defaults run out.
pub fn pad_unique(items: &mut Vec<String>, target: usize, defaults: &[&str], last_resort: &str) {
    let start = items.len() % defaults.len().max(1);
    for candidate in defaults.iter().cycle().skip(start).take(defaults.len()) {
        if items.len() >= target {
            return;
        }
        push_unique(items, candidate);
    }
    if items.len() < target {
        push_unique(items, last_resort);
    }
}

pub fn push_unique(items: &mut Vec<String>, candidate: &str) {
    if !items.iter().any(|s| s == candidate) {
        items.push(candidate.to_string());
    }
}
