use regex::{Captures, Regex};

use crate::vocabulary::Vocabulary;

/// Every currency amount in order, verbatim: symbol, grouped integer part and
/// decimal part concatenated (whitespace after the symbol is dropped).
pub fn extract_salary(text: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let Some(pattern) = vocabulary.salary_pattern() else {
        return Vec::new();
    };
    complete_amounts(pattern, text).collect()
}

/// First currency amount only, used for requirements.
pub fn first_salary(text: &str, vocabulary: &Vocabulary) -> Option<String> {
    let pattern = vocabulary.salary_pattern()?;
    complete_amounts(pattern, text).next()
}

/// Amounts whose digits are not cut short by a following letter or digit
/// ("$5,00,000abc" yields nothing rather than "$5,00").
fn complete_amounts<'t>(pattern: &'t Regex, text: &'t str) -> impl Iterator<Item = String> + 't {
    pattern
        .captures_iter(text)
        .filter(move |caps| {
            let end = caps.get(0).map_or(0, |m| m.end());
            !text[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
        })
        .map(|caps| render(&caps))
}

fn render(caps: &Captures<'_>) -> String {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .collect()
}
