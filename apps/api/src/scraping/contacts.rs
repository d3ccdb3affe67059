//! Contact resolution — email de-obfuscation/extraction and LinkedIn profile lookup.
//!
//! Plain addresses are taken as written; written-out forms (`at`, `[dot]`, ` @ `)
//! are recognized token by token and never rewrite the surrounding prose.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::professor::ContactInfo;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("email pattern should compile")
});

static LINKEDIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?linkedin\.com/(?:in|pub)/[a-zA-Z0-9-]+(?:/[a-zA-Z0-9-]+)*/?",
    )
    .expect("linkedin pattern should compile")
});

/// Bracketed joints are unambiguous anywhere, spaced or not: `jane(at)uni[dot]edu`.
static BRACKETED_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\[({]\s*at\s*[\])}]").expect("bracketed at pattern should compile")
});

static BRACKETED_DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\[({]\s*dot\s*[\])}]").expect("bracketed dot pattern should compile")
});

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("token pattern should compile"));

static LOCAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+$").expect("local part pattern should compile")
});

static DOMAIN_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$").expect("domain pattern should compile")
});

static TLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{2,}$").expect("tld pattern should compile"));

const LEADING_PUNCTUATION: &[char] = &['(', '[', '{', '<', '"', '\''];
const TRAILING_PUNCTUATION: &[char] = &[')', ']', '}', '>', '"', '\'', ',', ';', ':', '!', '?', '.'];

/// How an `@` or `.` was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joint {
    /// Bare word: `at`, `DOT`. Also common prose, so it needs corroboration.
    Spelled,
    /// Bracketed or a lone symbol: `[at]`, `(dot)`, `@`, `.`.
    Marked,
}

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    At(Joint),
    Dot(Joint),
    Word(&'a str),
}

fn classify(raw: &str) -> Token<'_> {
    match raw {
        "at" | "AT" | "At" => Token::At(Joint::Spelled),
        "[at]" | "@" => Token::At(Joint::Marked),
        "dot" | "DOT" | "Dot" => Token::Dot(Joint::Spelled),
        "[dot]" | "." => Token::Dot(Joint::Marked),
        _ => Token::Word(
            raw.trim_start_matches(LEADING_PUNCTUATION)
                .trim_end_matches(TRAILING_PUNCTUATION),
        ),
    }
}

/// Addresses written out to dodge scrapers, e.g. `jane dot smith AT uni DOT edu`,
/// as `(byte offset, canonical address)`.
///
/// A bare `at` only counts when the domain also uses a written-out dot, so prose
/// like `professor at cs.example.edu` is left alone. A candidate whose domain runs
/// into another `at` is discarded and scanning resumes at the next token.
fn find_obfuscated_emails(text: &str) -> Vec<(usize, String)> {
    let tokens: Vec<(usize, Token<'_>)> = TOKEN
        .find_iter(text)
        .map(|m| (m.start(), classify(m.as_str())))
        .collect();

    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match obfuscated_address(&tokens, i) {
            Some((address, next)) => {
                found.push((tokens[i].0, address));
                i = next;
            }
            None => i += 1,
        }
    }
    found
}

/// Parses `local (dot local)* at domain (dot domain)*` starting at token `start`.
/// Returns the canonical address and the index of the first unconsumed token.
fn obfuscated_address(tokens: &[(usize, Token<'_>)], start: usize) -> Option<(String, usize)> {
    let mut i = start;

    let mut local = Vec::new();
    loop {
        let Token::Word(word) = tokens.get(i)?.1 else {
            return None;
        };
        if !LOCAL_WORD.is_match(word) {
            return None;
        }
        local.push(word);
        i += 1;
        match tokens.get(i)?.1 {
            Token::Dot(_) => i += 1,
            _ => break,
        }
    }

    let Token::At(at_joint) = tokens.get(i)?.1 else {
        return None;
    };
    i += 1;

    let mut domain = Vec::new();
    let mut written_dots = 0;
    loop {
        let Token::Word(word) = tokens.get(i)?.1 else {
            return None;
        };
        if !DOMAIN_WORD.is_match(word) {
            return None;
        }
        domain.push(word);
        i += 1;
        match tokens.get(i).map(|t| t.1) {
            Some(Token::Dot(_)) => {
                written_dots += 1;
                i += 1;
            }
            Some(Token::At(_)) => return None,
            _ => break,
        }
    }

    if at_joint == Joint::Spelled && written_dots == 0 {
        return None;
    }
    let domain = domain.join(".");
    let tld = domain.rsplit('.').next()?;
    if !domain.contains('.') || !TLD.is_match(tld) {
        return None;
    }

    let address = format!("{}@{}", local.join("."), domain).to_lowercase();
    Some((address, i))
}

/// Canonical email addresses in order of first occurrence, without duplicates.
///
/// Plain addresses are matched as written. Obfuscated ones are canonicalized
/// only inside the window that forms the address; surrounding text is untouched.
pub fn extract_emails(text: &str) -> Vec<String> {
    let prepared = BRACKETED_AT.replace_all(text, " [at] ");
    let prepared = BRACKETED_DOT.replace_all(&prepared, " [dot] ");

    let mut hits: Vec<(usize, String)> = EMAIL_PATTERN
        .find_iter(&prepared)
        .map(|m| (m.start(), m.as_str().to_lowercase()))
        .collect();
    hits.extend(find_obfuscated_emails(&prepared));
    hits.sort_by_key(|(pos, _)| *pos);

    let mut seen = HashSet::new();
    hits.into_iter()
        .map(|(_, email)| email)
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// First LinkedIn profile URL in `text`, returned verbatim.
pub fn extract_linkedin_url(text: &str) -> Option<String> {
    LINKEDIN_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
}

pub fn resolve_contacts(text: &str) -> ContactInfo {
    let mut emails = extract_emails(text).into_iter();
    ContactInfo {
        email: emails.next(),
        additional_emails: emails.collect(),
        linkedin_url: extract_linkedin_url(text),
    }
}

/// Contact-bearing anchor targets: `mailto:` addresses and LinkedIn links.
pub fn contact_hrefs(hrefs: &[String]) -> Vec<String> {
    hrefs
        .iter()
        .filter_map(|href| {
            if let Some(address) = href
                .strip_prefix("mailto:")
                .or_else(|| href.strip_prefix("MAILTO:"))
            {
                let address = address.split('?').next().unwrap_or_default();
                Some(address.to_string())
            } else if href.contains("linkedin.com/") {
                Some(href.clone())
            } else {
                None
            }
        })
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelled_out_email_is_canonicalized() {
        assert_eq!(
            extract_emails("john DOT doe AT university DOT edu"),
            vec!["john.doe@university.edu".to_string()]
        );
    }

    #[test]
    fn test_bracketed_email_is_canonicalized() {
        assert_eq!(
            extract_emails("Contact: jane [at] cs [dot] example [dot] edu"),
            vec!["jane@cs.example.edu".to_string()]
        );
    }

    #[test]
    fn test_braces_and_parens_are_stripped() {
        assert_eq!(
            extract_emails("write to {bob} (at) lab.org"),
            vec!["bob@lab.org".to_string()]
        );
    }

    #[test]
    fn test_plain_emails_in_order_and_lowercased() {
        let text = "Office: Jane.Smith@Example.EDU, lab: lab-admin@example.edu. Phone 555.";
        assert_eq!(
            extract_emails(text),
            vec![
                "jane.smith@example.edu".to_string(),
                "lab-admin@example.edu".to_string()
            ]
        );
    }

    #[test]
    fn test_duplicate_emails_keep_first_position() {
        let text = "a@x.org b@x.org A@X.ORG a@x.org";
        assert_eq!(
            extract_emails(text),
            vec!["a@x.org".to_string(), "b@x.org".to_string()]
        );
    }

    #[test]
    fn test_obfuscated_address_is_lowercased() {
        assert_eq!(
            extract_emails("Email Jane AT Mail DOT Example DOT com Today"),
            vec!["jane@mail.example.com".to_string()]
        );
    }

    #[test]
    fn test_at_inside_words_is_not_replaced() {
        assert!(extract_emails("Data Science").is_empty());
        assert!(extract_emails("attention: the cat sat at home").is_empty());
    }

    #[test]
    fn test_prose_before_spelled_address_is_not_absorbed() {
        assert_eq!(
            extract_emails("Email me at jane dot smith at example dot edu for details"),
            vec!["jane.smith@example.edu".to_string()]
        );
    }

    #[test]
    fn test_prose_at_before_hostname_is_not_an_address() {
        assert_eq!(
            extract_emails("I am a professor at cs.example.edu. Reach jane@example.edu"),
            vec!["jane@example.edu".to_string()]
        );
    }

    #[test]
    fn test_unspaced_brackets_and_spaced_symbols() {
        assert_eq!(
            extract_emails("jane(at)cs[dot]example(dot)edu or bob @ lab . org"),
            vec!["jane@cs.example.edu".to_string(), "bob@lab.org".to_string()]
        );
    }

    #[test]
    fn test_plain_and_obfuscated_keep_text_order() {
        assert_eq!(
            extract_emails("first x DOT y AT uni DOT edu, then plain@uni.edu"),
            vec!["x.y@uni.edu".to_string(), "plain@uni.edu".to_string()]
        );
    }

    #[test]
    fn test_linkedin_url_verbatim() {
        let text = "Find me on https://www.linkedin.com/in/jane-smith-42/ or twitter.";
        assert_eq!(
            extract_linkedin_url(text),
            Some("https://www.linkedin.com/in/jane-smith-42/".to_string())
        );
    }

    #[test]
    fn test_linkedin_pub_without_scheme() {
        assert_eq!(
            extract_linkedin_url("linkedin.com/pub/john-doe/1/2/3 more"),
            Some("linkedin.com/pub/john-doe/1/2/3".to_string())
        );
    }

    #[test]
    fn test_no_linkedin_is_none() {
        assert_eq!(extract_linkedin_url("no social links here"), None);
        assert!(resolve_contacts("nothing").linkedin_url.is_none());
    }

    #[test]
    fn test_resolve_contacts_primary_and_additional() {
        let contacts = resolve_contacts("x@a.edu then y@a.edu then z@a.edu");
        assert_eq!(contacts.email.as_deref(), Some("x@a.edu"));
        assert_eq!(contacts.additional_emails, vec!["y@a.edu", "z@a.edu"]);
    }

    #[test]
    fn test_contact_hrefs_picks_mailto_and_linkedin() {
        let hrefs = vec![
            "/teaching".to_string(),
            "mailto:jane@example.edu?subject=Hi".to_string(),
            "https://linkedin.com/in/jane".to_string(),
        ];
        assert_eq!(
            contact_hrefs(&hrefs),
            vec!["jane@example.edu", "https://linkedin.com/in/jane"]
        );
    }
}
