//! Mobile app download links.

use serde::Serialize;

pub const IOS_STORE_URL: &str = "https://apps.apple.com/fr/app/transat/id6602883801?l=en-GB";
pub const ANDROID_STORE_URL: &str =
    "https://play.google.com/store/apps/details?id=com.yohann69.transat2_0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    /// Detect the platform from a `User-Agent` header value.
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ["iphone", "ipad", "ipod"].iter().any(|d| ua.contains(d)) {
            Platform::Ios
        } else if ua.contains("android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }

    pub fn store_url(&self) -> Option<&'static str> {
        match self {
            Platform::Ios => Some(IOS_STORE_URL),
            Platform::Android => Some(ANDROID_STORE_URL),
            Platform::Other => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreLinks {
    pub ios: &'static str,
    pub android: &'static str,
}

/// Payload served at `GET /api/downloads`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadInfo {
    pub detected_platform: Platform,
    pub links: StoreLinks,
}

impl DownloadInfo {
    pub fn for_user_agent(user_agent: &str) -> Self {
        Self {
            detected_platform: Platform::detect(user_agent),
            links: StoreLinks {
                ios: IOS_STORE_URL,
                android: ANDROID_STORE_URL,
            },
        }
    }
}
