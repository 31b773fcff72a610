use crate::dedup::SeenSet;
use crate::filter::LineStage;
use grouprecon_scanner::GroupUrl;
use tracing::trace;

/// Emits each custom domain the first time a group URL names it.
#[derive(Debug, Default)]
pub struct DomainExtractor {
    seen: SeenSet,
}

impl DomainExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&mut self, line: &str) -> Option<String> {
        let url = match GroupUrl::parse(line) {
            Ok(url) => url,
            Err(e) => {
                trace!("Dropping '{}': {}", line, e);
                return None;
            }
        };

        let domain = url.domain();
        self.seen.first_sighting(domain).then(|| domain.to_string())
    }

    pub fn domains_seen(&self) -> usize {
        self.seen.len()
    }
}

impl LineStage for DomainExtractor {
    fn accept(&mut self, line: &str) -> Option<String> {
        self.extract(line)
    }
}
