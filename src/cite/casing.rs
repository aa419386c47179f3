//! Title casing helpers.

/// Function words kept lowercase inside a title-cased phrase
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the", "to",
    "up", "yet",
];

/// Capitalize only the first word; all-caps tokens of two or more letters
/// (acronyms) are kept as written
pub fn sentence_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if is_acronym(word) {
                word.to_string()
            } else if i == 0 {
                capitalize_first(&word.to_lowercase())
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize every word except minor words in the middle of the phrase
pub fn title_case(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i != 0 && i != last && MINOR_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize_first(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// Uppercase the first alphabetic character, leaving the rest alone
fn capitalize_first(word: &str) -> String {
    match word.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((idx, c)) => {
            let mut out = String::with_capacity(word.len());
            out.push_str(&word[..idx]);
            out.extend(c.to_uppercase());
            out.push_str(&word[idx + c.len_utf8()..]);
            out
        }
        None => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("A Study Of Things"), "A study of things");
        assert_eq!(
            sentence_case("Understanding DNA Repair In COVID-19 Patients"),
            "Understanding DNA repair in COVID-19 patients"
        );
        assert_eq!(sentence_case("\"quoted\" Title"), "\"Quoted\" title");
        assert_eq!(sentence_case("NASA Missions"), "NASA missions");
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(
            title_case("journal of the american chemical society"),
            "Journal of the American Chemical Society"
        );
        assert_eq!(title_case("nature"), "Nature");
        assert_eq!(title_case("the lancet"), "The Lancet");
        assert_eq!(title_case("what we live by"), "What We Live By");
    }

    #[test]
    fn test_title_case_keeps_inner_capitals() {
        assert_eq!(title_case("PLoS ONE"), "PLoS ONE");
        assert_eq!(title_case("journal of AOAC international"), "Journal of AOAC International");
    }
}
