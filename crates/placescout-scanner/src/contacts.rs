//! Contact pattern extraction from external websites.
//!
//! Scans the full page markup as one text blob for email addresses and
//! social profile links. This is a best-effort signal extractor: anything
//! shaped like an address or a profile link is accepted.

use once_cell::sync::Lazy;
use placescout_core::{ContactFacts, SocialPlatform};
use regex::Regex;
use std::collections::HashSet;

/// Compiled regex patterns (initialized once at startup)
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Za-z0-9_.%+-]+@[A-Za-z0-9_.-]+\.[A-Za-z]{2,}")
        .expect("Email regex is hardcoded and valid")
});

static FACEBOOK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://)?(?:www\.)?facebook\.com/[^/\s"']+"#)
        .expect("Facebook regex is hardcoded and valid")
});

static INSTAGRAM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://)?(?:www\.)?instagram\.com/[^/\s"']+"#)
        .expect("Instagram regex is hardcoded and valid")
});

static TWITTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://)?(?:www\.)?twitter\.com/[^/\s"']+"#)
        .expect("Twitter regex is hardcoded and valid")
});

static LINKEDIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://)?(?:www\.)?linkedin\.com/(?:company|in)/[^/\s"']+"#)
        .expect("LinkedIn regex is hardcoded and valid")
});

fn social_pattern(platform: SocialPlatform) -> &'static Regex {
    match platform {
        SocialPlatform::Facebook => &FACEBOOK_PATTERN,
        SocialPlatform::Instagram => &INSTAGRAM_PATTERN,
        SocialPlatform::Twitter => &TWITTER_PATTERN,
        SocialPlatform::Linkedin => &LINKEDIN_PATTERN,
    }
}

/// Extract emails and social profile links from page markup.
///
/// Duplicates are collapsed on the exact matched text, so differently
/// cased copies of the same address are both kept.
pub fn extract_contacts(markup: &str) -> ContactFacts {
    let mut facts = ContactFacts {
        emails: unique_matches(&EMAIL_PATTERN, markup),
        ..ContactFacts::default()
    };

    for platform in SocialPlatform::ALL {
        *facts.social_media.get_mut(platform) = unique_matches(social_pattern(platform), markup);
    }

    facts
}

/// All matches of `pattern`, first occurrence order, exact duplicates removed.
fn unique_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}
