//! # Share Targets
//!
//! The fixed set of platforms a profile card can be shared to. Every target
//! uses the same share text; only the prompt shown after copying differs.

use std::fmt;

use serde::Serialize;

use crate::profile::UserProfile;

/// Platforms offered in the share dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Xiaohongshu,
    Douyin,
    #[value(name = "wechat")]
    WeChat,
    Weibo,
}

impl ShareTarget {
    /// Every target, in dialog order.
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::Xiaohongshu,
        ShareTarget::Douyin,
        ShareTarget::WeChat,
        ShareTarget::Weibo,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ShareTarget::Xiaohongshu => "Xiaohongshu",
            ShareTarget::Douyin => "Douyin",
            ShareTarget::WeChat => "WeChat",
            ShareTarget::Weibo => "Weibo",
        }
    }

    /// Prompt shown once the share text is on the clipboard.
    pub fn copy_prompt(self) -> String {
        format!(
            "Content copied, paste it into {} to share",
            self.display_name()
        )
    }

    /// Share text for this target.
    pub fn share_text(self, profile: &UserProfile, share_url: &str) -> String {
        build_share_text(profile, share_url)
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// `"{name} - {title}\n{description}\n\nDetails: {url}"`.
pub fn build_share_text(profile: &UserProfile, share_url: &str) -> String {
    format!(
        "{} - {}\n{}\n\nDetails: {}",
        profile.name, profile.title, profile.description, share_url
    )
}
