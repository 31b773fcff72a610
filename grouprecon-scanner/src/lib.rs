pub mod archive;
pub mod classify;
pub mod error;
pub mod group_url;
pub mod prober;
pub mod quota;
pub mod result;

pub use archive::{ArchiveClient, ArchiveConfig, ArchiveFetcher, ArchivePage, ArchiveRecord};
pub use classify::{PhraseMatcher, PhraseSet};
pub use error::ScanError;
pub use group_url::{GroupIdentity, GroupUrl, GroupUrlError};
pub use prober::{GroupProber, ProberConfig};
pub use quota::HourlyQuota;
pub use result::PermissionProfile;
