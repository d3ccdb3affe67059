//! Field extractors — ordered locator strategies per profile field.
//!
//! Each field owns a list of `FieldLocator`s tried in priority order; the first
//! non-empty result wins and later locators are never consulted.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::models::professor::ProfessorInfo;
use crate::scraping::contacts::{contact_hrefs, extract_emails};
use crate::scraping::document::{element_text, next_sibling_of_kind, parent_element, PageDocument};

/// One heuristic for finding a field's value on a page.
pub trait FieldLocator: Send + Sync {
    fn locate(&self, page: &PageDocument) -> Option<String>;
}

/// How a section's anchor element is found.
pub enum Anchor {
    Css(Selector),
    /// Element of one of `tags` whose text contains `needle`.
    Heading {
        tags: &'static [&'static str],
        needle: &'static str,
    },
}

impl Anchor {
    fn find<'a>(&self, page: &'a PageDocument) -> Option<ElementRef<'a>> {
        match self {
            Anchor::Css(selector) => page.select_first(selector),
            Anchor::Heading { tags, needle } => page.find_containing(tags, needle),
        }
    }
}

/// Text of the first element matching a CSS selector.
pub struct CssText(pub Selector);

impl FieldLocator for CssText {
    fn locate(&self, page: &PageDocument) -> Option<String> {
        page.select_first(&self.0)
            .map(element_text)
            .filter(|text| !text.is_empty())
    }
}

/// Content following an anchor: its next sibling of an allowed kind, else its parent's text.
pub struct SectionText {
    pub anchor: Anchor,
    pub sibling_kinds: &'static [&'static str],
}

impl FieldLocator for SectionText {
    fn locate(&self, page: &PageDocument) -> Option<String> {
        let anchor = self.anchor.find(page)?;
        next_sibling_of_kind(anchor, self.sibling_kinds)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .or_else(|| {
                parent_element(anchor)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
            })
    }
}

/// First paragraph-like chunk mentioning any of `keywords` (case-insensitive).
pub struct ParagraphMentioning(pub &'static [&'static str]);

impl FieldLocator for ParagraphMentioning {
    fn locate(&self, page: &PageDocument) -> Option<String> {
        page.paragraphs().into_iter().find(|para| {
            let lowered = para.to_lowercase();
            self.0.iter().any(|kw| lowered.contains(kw))
        })
    }
}

/// First canonical email on the page.
pub struct FirstEmail;

impl FieldLocator for FirstEmail {
    fn locate(&self, page: &PageDocument) -> Option<String> {
        extract_emails(&page.text()).into_iter().next()
    }
}

/// First address behind a `mailto:` anchor.
pub struct MailtoEmail;

impl FieldLocator for MailtoEmail {
    fn locate(&self, page: &PageDocument) -> Option<String> {
        extract_emails(&contact_hrefs(&page.hrefs()).join(" "))
            .into_iter()
            .next()
    }
}

/// Runs locators in order and returns the first non-empty hit.
pub fn first_match(locators: &[Box<dyn FieldLocator>], page: &PageDocument) -> String {
    locators
        .iter()
        .find_map(|locator| locator.locate(page))
        .unwrap_or_default()
}

pub struct ProfileExtractor {
    pub name: Vec<Box<dyn FieldLocator>>,
    pub title: Vec<Box<dyn FieldLocator>>,
    pub department: Vec<Box<dyn FieldLocator>>,
    pub email: Vec<Box<dyn FieldLocator>>,
    pub research: Vec<Box<dyn FieldLocator>>,
    pub publications: Vec<Box<dyn FieldLocator>>,
}

impl ProfileExtractor {
    /// Locators tuned for common academic homepage layouts.
    pub fn academic() -> Self {
        Self {
            name: css_locators(&["h1", ".faculty-name", ".profile-name", "[itemprop=\"name\"]"]),
            title: css_locators(&[".faculty-title", ".profile-title", "[itemprop=\"jobTitle\"]"]),
            department: css_locators(&[
                ".department",
                ".faculty-department",
                "[itemprop=\"department\"]",
            ]),
            email: vec![Box::new(FirstEmail), Box::new(MailtoEmail)],
            research: section_locators(
                &["#research", ".research-interests", ".research"],
                "Research",
                &["p", "div"],
                &["research", "interests"],
            ),
            publications: section_locators(
                &["#publications", ".publications"],
                "Publications",
                &["ul", "ol", "div"],
                &["publication", "paper"],
            ),
        }
    }

    /// Pure function of the page: the same document always yields the same profile.
    pub fn extract(&self, page: &PageDocument) -> ProfessorInfo {
        ProfessorInfo {
            name: first_match(&self.name, page),
            title: first_match(&self.title, page),
            department: first_match(&self.department, page),
            email: first_match(&self.email, page),
            research: first_match(&self.research, page),
            publications: first_match(&self.publications, page),
        }
    }
}

/// Heading levels searched for section titles, in priority order.
const HEADING_LEVELS: [&[&str]; 2] = [&["h2"], &["h3"]];

static ACADEMIC_EXTRACTOR: LazyLock<ProfileExtractor> = LazyLock::new(ProfileExtractor::academic);

pub fn extract_profile(page: &PageDocument) -> ProfessorInfo {
    ACADEMIC_EXTRACTOR.extract(page)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("built-in selector {css:?} is invalid: {e:?}"))
}

fn css_locators(selectors: &[&str]) -> Vec<Box<dyn FieldLocator>> {
    selectors
        .iter()
        .map(|css| Box::new(CssText(selector(css))) as Box<dyn FieldLocator>)
        .collect()
}

fn section_locators(
    selectors: &[&str],
    heading: &'static str,
    sibling_kinds: &'static [&'static str],
    paragraph_keywords: &'static [&'static str],
) -> Vec<Box<dyn FieldLocator>> {
    let mut locators: Vec<Box<dyn FieldLocator>> = selectors
        .iter()
        .map(|css| {
            Box::new(SectionText {
                anchor: Anchor::Css(selector(css)),
                sibling_kinds,
            }) as Box<dyn FieldLocator>
        })
        .collect();
    for tags in HEADING_LEVELS {
        locators.push(Box::new(SectionText {
            anchor: Anchor::Heading {
                tags,
                needle: heading,
            },
            sibling_kinds,
        }));
    }
    locators.push(Box::new(ParagraphMentioning(paragraph_keywords)));
    locators
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> PageDocument {
        PageDocument::parse(Url::parse("https://cs.example.edu/~jane/").unwrap(), html)
    }

    #[test]
    fn test_name_from_h1() {
        let profile = extract_profile(&page("<body><h1>Jane Smith</h1><p>Welcome.</p></body>"));
        assert_eq!(profile.name, "Jane Smith");
    }

    #[test]
    fn test_name_priority_h1_before_itemprop() {
        let profile = extract_profile(&page(
            r#"<body><span itemprop="name">J. Smith</span><h1>Jane Smith</h1></body>"#,
        ));
        assert_eq!(profile.name, "Jane Smith");
    }

    #[test]
    fn test_empty_h1_falls_through_to_next_locator() {
        let profile = extract_profile(&page(
            r#"<body><h1>   </h1><div class="profile-name">Jane Smith</div></body>"#,
        ));
        assert_eq!(profile.name, "Jane Smith");
    }

    #[test]
    fn test_title_and_department() {
        let profile = extract_profile(&page(
            r#"<body><div class="faculty-title">Associate Professor</div>
               <div class="department">Computer Science</div></body>"#,
        ));
        assert_eq!(profile.title, "Associate Professor");
        assert_eq!(profile.department, "Computer Science");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let profile = extract_profile(&page("<body><p>Nothing useful.</p></body>"));
        assert_eq!(profile, ProfessorInfo::default());
    }

    #[test]
    fn test_research_from_heading_sibling() {
        let profile = extract_profile(&page(
            "<body><h2>Research Interests</h2><p>Program synthesis and verification.</p></body>",
        ));
        assert_eq!(profile.research, "Program synthesis and verification.");
    }

    #[test]
    fn test_research_falls_back_to_parent_text() {
        let profile = extract_profile(&page(
            "<body><section><h3>Research</h3><ul><li>Compilers</li></ul></section></body>",
        ));
        assert_eq!(profile.research, "Research Compilers");
    }

    #[test]
    fn test_publications_from_id_sibling_list() {
        let profile = extract_profile(&page(
            r#"<body><h2 id="publications">Selected Papers</h2>
               <ol><li>Paper A (2023)</li><li>Paper B (2021)</li></ol></body>"#,
        ));
        assert_eq!(profile.publications, "Paper A (2023) Paper B (2021)");
    }

    #[test]
    fn test_paragraph_fallback_for_research() {
        let profile = extract_profile(&page(
            "<body><p>Hello there.</p><p>My interests span compilers and PL.</p></body>",
        ));
        assert_eq!(profile.research, "My interests span compilers and PL.");
    }

    #[test]
    fn test_paragraph_fallback_for_publications() {
        let profile = extract_profile(&page(
            "<body><p>About me.</p><p>Our paper on caching won an award.</p></body>",
        ));
        assert_eq!(profile.publications, "Our paper on caching won an award.");
    }

    #[test]
    fn test_email_field_is_canonicalized() {
        let profile = extract_profile(&page("<body><p>jane DOT smith AT example DOT edu</p></body>"));
        assert_eq!(profile.email, "jane.smith@example.edu");
    }

    #[test]
    fn test_email_falls_back_to_mailto_anchor() {
        let profile = extract_profile(&page(
            r#"<body><h1>Jane Smith</h1><a href="mailto:Jane@Example.edu?subject=PhD">Email</a></body>"#,
        ));
        assert_eq!(profile.email, "jane@example.edu");
    }

    #[test]
    fn test_email_in_text_wins_over_mailto() {
        let profile = extract_profile(&page(
            r#"<body><p>jane@example.edu</p><a href="mailto:office@example.edu">Office</a></body>"#,
        ));
        assert_eq!(profile.email, "jane@example.edu");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let doc = page(
            r#"<body><h1>Jane Smith</h1><div class="faculty-title">Professor</div>
               <h2>Research</h2><p>Robotics.</p><p>jane@example.edu</p></body>"#,
        );
        assert_eq!(extract_profile(&doc), extract_profile(&doc));
    }

    #[test]
    fn test_first_successful_locator_wins_without_merging() {
        let doc = page(
            r#"<body><div class="research-interests">Short.</div>
               <h2>Research</h2><p>A much longer and more specific research description.</p></body>"#,
        );
        let profile = extract_profile(&doc);
        // `.research-interests` has no sibling of an allowed kind, so its parent (body) text is used.
        assert!(profile.research.starts_with("Short."));
    }
}
