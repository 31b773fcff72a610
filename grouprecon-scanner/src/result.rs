use serde::{Deserialize, Serialize};

/// Access posture of one group as seen by an anonymous visitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionProfile {
    pub is_public: bool,
    pub can_view: bool,
    pub can_join: bool,
    pub can_post: bool,
    pub requires_auth: bool,
}

impl PermissionProfile {
    /// The about page was withheld behind a login.
    pub fn requires_auth() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    /// The about page was served; capability flags start cleared.
    pub fn public() -> Self {
        Self {
            is_public: true,
            ..Self::default()
        }
    }

    pub fn with_capabilities(mut self, can_view: bool, can_join: bool, can_post: bool) -> Self {
        self.can_view = can_view;
        self.can_join = can_join;
        self.can_post = can_post;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_auth_clears_capabilities() {
        let profile = PermissionProfile::requires_auth();
        assert!(profile.requires_auth);
        assert!(!profile.is_public);
        assert!(!profile.can_view && !profile.can_join && !profile.can_post);
    }

    #[test]
    fn test_public_with_capabilities() {
        let profile = PermissionProfile::public().with_capabilities(true, false, true);
        assert!(profile.is_public);
        assert!(profile.can_view);
        assert!(!profile.can_join);
        assert!(profile.can_post);
        assert!(!profile.requires_auth);
    }
}
