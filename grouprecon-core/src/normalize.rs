use crate::dedup::SeenSet;
use crate::filter::LineStage;
use grouprecon_scanner::GroupUrl;
use tracing::trace;

/// What two group URLs must share to count as duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    /// The whole line, suffix included.
    #[default]
    Full,
    /// The group root, `scheme://host/a/{domain}/g/{group}`.
    Canonical,
}

/// Validates group URLs and emits each distinct one once, in first-seen order.
#[derive(Debug, Default)]
pub struct UrlNormalizer {
    mode: NormalizeMode,
    seen: SeenSet,
}

impl UrlNormalizer {
    pub fn new(mode: NormalizeMode) -> Self {
        Self {
            mode,
            seen: SeenSet::new(),
        }
    }

    pub fn mode(&self) -> NormalizeMode {
        self.mode
    }

    pub fn normalize(&mut self, line: &str) -> Option<String> {
        let url = match GroupUrl::parse(line) {
            Ok(url) => url,
            Err(e) => {
                trace!("Dropping '{}': {}", line, e);
                return None;
            }
        };

        let key = match self.mode {
            NormalizeMode::Full => line.trim().to_string(),
            NormalizeMode::Canonical => url.canonical(),
        };
        self.seen.first_sighting(&key).then_some(key)
    }
}

impl LineStage for UrlNormalizer {
    fn accept(&mut self, line: &str) -> Option<String> {
        self.normalize(line)
    }
}
