//! Contact-field mining over extracted resume text.

use std::sync::LazyLock;

use regex::Regex;

use intervia_types::candidate::CandidateInfo;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid phone regex")
});

/// Mine name, email, and phone from resume text.
///
/// Email and phone are first-match regex hits anywhere in the text. The
/// name is the first non-empty line of 2 to 4 purely alphabetic words
/// that is not itself an email or phone line; resumes conventionally
/// lead with the candidate's name.
pub fn mine_contact_fields(text: &str) -> CandidateInfo {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().to_string());

    let name = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !EMAIL_RE.is_match(line) && !PHONE_RE.is_match(line))
        .find(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            (2..=4).contains(&words.len())
                && words
                    .iter()
                    .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
        })
        .map(str::to_string);

    CandidateInfo { name, email, phone }
}
