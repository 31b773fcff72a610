// Capability detection on a group's about page

use crate::error::Result;
use crate::result::PermissionProfile;
use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Phrases the about page uses to describe what anonymous visitors may do.
///
/// Each capability is detected independently as `audience`, followed by at
/// most `window` characters, followed by the capability phrase. The window
/// keeps a match from spanning two unrelated permission sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseSet {
    pub audience: String,
    pub view: String,
    pub join: String,
    pub post: String,
    pub window: usize,
}

impl Default for PhraseSet {
    fn default() -> Self {
        Self {
            audience: "Anyone on the web".to_string(),
            view: "can view conversations".to_string(),
            join: "can join group".to_string(),
            post: "can post".to_string(),
            window: 50,
        }
    }
}

impl PhraseSet {
    pub fn compile(&self) -> Result<PhraseMatcher> {
        Ok(PhraseMatcher {
            view: self.pattern(&self.view)?,
            join: self.pattern(&self.join)?,
            post: self.pattern(&self.post)?,
        })
    }

    fn pattern(&self, capability: &str) -> Result<Regex> {
        let source = format!(
            "{}.{{0,{}}}?{}",
            regex::escape(&self.audience),
            self.window,
            regex::escape(capability)
        );
        Ok(Regex::new(&source)?)
    }
}

#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    view: Regex,
    join: Regex,
    post: Regex,
}

#[derive(Debug, Clone, Copy, Default)]
struct Capabilities {
    view: bool,
    join: bool,
    post: bool,
}

impl Capabilities {
    fn all(&self) -> bool {
        self.view && self.join && self.post
    }

    fn union(self, other: Capabilities) -> Capabilities {
        Capabilities {
            view: self.view || other.view,
            join: self.join || other.join,
            post: self.post || other.post,
        }
    }
}

impl PhraseMatcher {
    /// Profile of a group whose about page was served without a login.
    ///
    /// The raw markup is scanned first; the rendered text is scanned as well
    /// unless every capability already matched, so inline tags between the
    /// audience and the capability phrase do not hide a match.
    pub fn classify_public(&self, markup: &str) -> PermissionProfile {
        let mut found = self.scan(markup);
        if !found.all() {
            found = found.union(self.scan(&visible_text(markup)));
        }
        PermissionProfile::public().with_capabilities(found.view, found.join, found.post)
    }

    fn scan(&self, haystack: &str) -> Capabilities {
        Capabilities {
            view: self.view.is_match(haystack),
            join: self.join.is_match(haystack),
            post: self.post.is_match(haystack),
        }
    }
}

fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let joined = document.root_element().text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
