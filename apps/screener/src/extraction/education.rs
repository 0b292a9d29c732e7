use crate::extraction::record::{sorted_unique, Education};
use crate::vocabulary::Vocabulary;

/// Qualification keywords (canonical spelling, dots optional) and
/// institution names found in the text.
pub fn extract_education(text: &str, vocabulary: &Vocabulary) -> Education {
    let degrees = sorted_unique(
        vocabulary
            .degree_patterns()
            .iter()
            .filter(|p| p.pattern.is_match(text))
            .map(|p| p.canonical.as_str()),
    );

    let institutes = sorted_unique(
        vocabulary
            .institute_pattern()
            .into_iter()
            .chain(vocabulary.school_pattern())
            .flat_map(|pattern| pattern.find_iter(text))
            .map(|m| m.as_str()),
    );

    Education {
        degrees,
        institutes,
    }
}
