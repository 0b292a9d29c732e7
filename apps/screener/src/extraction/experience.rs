use crate::extraction::record::Experience;
use crate::vocabulary::Vocabulary;

/// Every "<magnitude> <unit>" expression in order. Duplicates are kept and the
/// unit keeps the spelling found in the text.
pub fn extract_experience(text: &str, vocabulary: &Vocabulary) -> Vec<Experience> {
    let Some(pattern) = vocabulary.experience_pattern() else {
        return Vec::new();
    };
    pattern
        .captures_iter(text)
        .map(|caps| Experience::new(&caps[1], &caps[2]))
        .collect()
}

/// First experience expression only, used for requirements.
pub fn first_experience(text: &str, vocabulary: &Vocabulary) -> Option<Experience> {
    let pattern = vocabulary.experience_pattern()?;
    pattern
        .captures(text)
        .map(|caps| Experience::new(&caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::builtin().unwrap()
    }

    #[test]
    fn test_two_years() {
        assert_eq!(
            extract_experience("2 years", &vocab()),
            vec![Experience::new("2", "years")]
        );
    }

    #[test]
    fn test_unit_spelling_preserved() {
        assert_eq!(
            extract_experience("2.5 yrs", &vocab()),
            vec![Experience::new("2.5", "yrs")]
        );
        assert_eq!(extract_experience("2 yrs", &vocab())[0].to_string(), "2 yrs");
    }

    #[test]
    fn test_case_and_spacing() {
        assert_eq!(
            extract_experience("6Months at Acme, 3 YEARS at Initech", &vocab()),
            vec![Experience::new("6", "Months"), Experience::new("3", "YEARS")]
        );
    }

    #[test]
    fn test_duplicates_kept() {
        let found = extract_experience("1 year here, 1 year there", &vocab());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_partial_unit_dropped() {
        assert!(extract_experience("saw 2 monsters and 10 yearbooks", &vocab()).is_empty());
    }

    #[test]
    fn test_bare_number_dropped() {
        assert!(extract_experience("Team of 12 engineers", &vocab()).is_empty());
    }

    #[test]
    fn test_first_experience_keeps_only_first() {
        assert_eq!(
            first_experience("3-5 yrs, ideally 4 years", &vocab()),
            Some(Experience::new("5", "yrs"))
        );
        assert_eq!(first_experience("", &vocab()), None);
    }
}
