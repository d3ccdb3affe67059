//! Outreach email template and the fixed response fragments that accompany it.

/// Keywords mentioned in the draft's interest sentence.
pub const DRAFT_KEYWORD_LIMIT: usize = 3;

/// Characters of aggregate text echoed back as `professorInfo`.
pub const SUMMARY_CHAR_LIMIT: usize = 500;

pub const MATCHING_POINTS: [&str; 3] = [
    "Research interests alignment",
    "Academic background",
    "Technical skills",
];

/// Outreach email template. Replace `{greeting}` and `{interest_clause}` before use.
pub const EMAIL_DRAFT_TEMPLATE: &str = "{greeting}\n\n\
I am writing to express my interest in pursuing a PhD under your supervision. \
I came across your research work{interest_clause} and found it fascinating.\n\n\
I would appreciate the opportunity to discuss potential research opportunities in your lab.\n\n\
Best regards,\n[Your name]";

/// Fills the outreach template from the professor's name and detected keywords.
pub fn compose_email_draft(professor_name: &str, keywords: &[String]) -> String {
    let greeting = match surname(professor_name) {
        Some(surname) => format!("Dear Professor {surname},"),
        None => "Dear Professor,".to_string(),
    };

    let top: Vec<&str> = keywords
        .iter()
        .take(DRAFT_KEYWORD_LIMIT)
        .map(String::as_str)
        .collect();
    let interest_clause = if top.is_empty() {
        String::new()
    } else {
        format!(" in {}", top.join(", "))
    };

    EMAIL_DRAFT_TEMPLATE
        .replace("{greeting}", &greeting)
        .replace("{interest_clause}", &interest_clause)
}

/// Titles and degrees that may surround a name in a page heading.
const NAME_AFFIXES: &[&str] = &[
    "dr", "prof", "professor", "mr", "mrs", "ms", "phd", "ph.d", "md", "m.d", "msc", "mba",
    "jr", "sr", "ii", "iii", "facm", "fieee",
];

/// Heading words that mark a site or page title rather than a person.
const NON_NAME_WORDS: &[&str] = &[
    "home", "homepage", "page", "website", "site", "welcome", "lab", "laboratory", "group",
    "department", "dept", "university", "faculty", "profile", "people", "research", "about",
    "school", "college", "institute", "center", "centre",
];

/// Surname from a heading such as `Dr. Jane Q. Smith, Ph.D.`.
/// `None` unless what remains after affixes looks like a two to four word personal name.
fn surname(heading: &str) -> Option<&str> {
    // "Jane Smith, Ph.D." and "Jane Smith | CS Dept" keep only the leading part
    let head = heading
        .split(" - ")
        .next()?
        .split(" – ")
        .next()?
        .split([',', '|', '(', ':'])
        .next()?;

    let words: Vec<&str> = head
        .split_whitespace()
        .filter(|word| {
            let bare = word.trim_end_matches('.').to_lowercase();
            !NAME_AFFIXES.contains(&bare.as_str())
        })
        .collect();

    if !(2..=4).contains(&words.len()) {
        return None;
    }
    let plausible = words.iter().all(|word| {
        let bare = word.trim_end_matches('.');
        bare.chars().next().is_some_and(char::is_uppercase)
            && bare.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
            && !NON_NAME_WORDS.contains(&bare.to_lowercase().as_str())
    });
    if !plausible {
        return None;
    }
    words.last().copied().map(|word| word.trim_end_matches('.'))
}

/// First `SUMMARY_CHAR_LIMIT` characters of `text` followed by `...`.
pub fn summarize(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_CHAR_LIMIT).collect();
    format!("{head}...")
}
