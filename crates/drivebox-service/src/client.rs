//! Client details derived from request headers.
//!
//! Detection is a first-match scan over small token tables. It recognises
//! the common desktop and mobile browsers and nothing more.

use serde::{Deserialize, Serialize};

use drivebox_entity::activity::RequesterInfo;

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_DEVICE: &str = "unknown";

/// Order matters: mobile platforms embed desktop tokens.
static OPERATING_SYSTEMS: &[(&str, &str)] = &[
    ("Windows Phone", "Windows Phone"),
    ("Windows", "Windows"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Android", "Android"),
    ("CrOS", "Chrome OS"),
    ("Mac OS X", "Mac OS"),
    ("Macintosh", "Mac OS"),
    ("Linux", "Linux"),
];

/// Order matters: Chromium derivatives also carry `Chrome/` and `Safari/`.
static BROWSERS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("SamsungBrowser/", "Samsung Internet"),
    ("Firefox/", "Firefox"),
    ("FxiOS/", "Firefox"),
    ("CriOS/", "Chrome"),
    ("Chrome/", "Chrome"),
    ("Safari/", "Safari"),
    ("Trident/", "IE"),
    ("MSIE ", "IE"),
];

static VENDORS: &[(&str, &str)] = &[
    ("iPhone", "Apple"),
    ("iPad", "Apple"),
    ("Pixel", "Google"),
    ("SM-", "Samsung"),
    ("Huawei", "Huawei"),
    ("Xiaomi", "Xiaomi"),
];

/// Where a request came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
    pub operating_system: String,
    pub browser: String,
    pub device_type: String,
    pub device_model: String,
    pub device_vendor: String,
}

impl ClientInfo {
    /// Build client info from the caller address and `User-Agent` header.
    pub fn new(ip_address: impl Into<String>, user_agent: Option<&str>) -> Self {
        let ua = user_agent.unwrap_or_default();
        Self {
            ip_address: ip_address.into(),
            user_agent: ua.to_string(),
            operating_system: first_match(ua, OPERATING_SYSTEMS).unwrap_or(UNKNOWN_NAME).to_string(),
            browser: first_match(ua, BROWSERS).unwrap_or(UNKNOWN_NAME).to_string(),
            device_type: device_type(ua).unwrap_or(UNKNOWN_DEVICE).to_string(),
            device_model: device_model(ua).unwrap_or_else(|| UNKNOWN_DEVICE.to_string()),
            device_vendor: first_match(ua, VENDORS).unwrap_or(UNKNOWN_DEVICE).to_string(),
        }
    }

    /// Client info for internal callers with no request.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_DEVICE, None)
    }

    /// Requester fields stored on activity records.
    pub fn requester(&self) -> RequesterInfo {
        RequesterInfo {
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
            device: self.device_type.clone(),
            operating_system: self.operating_system.clone(),
            browser: self.browser.clone(),
        }
    }
}

fn first_match(ua: &str, table: &[(&'static str, &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(token, _)| ua.contains(token))
        .map(|(_, name)| *name)
}

fn device_type(ua: &str) -> Option<&'static str> {
    if ua.contains("iPad") || ua.contains("Tablet") {
        Some("tablet")
    } else if ua.contains("Mobi") || ua.contains("iPhone") {
        Some("mobile")
    } else if ua.contains("Android") {
        Some("tablet")
    } else {
        None
    }
}

fn device_model(ua: &str) -> Option<String> {
    if ua.contains("iPhone") {
        return Some("iPhone".to_string());
    }
    if ua.contains("iPad") {
        return Some("iPad".to_string());
    }
    if !ua.contains("Android") {
        return None;
    }
    // "(Linux; Android 14; Pixel 8 Build/AP1A)" -> "Pixel 8"
    let start = ua.find('(')? + 1;
    let end = start + ua[start..].find(')')?;
    let last = ua[start..end].rsplit(';').next()?.trim();
    let model = last.split(" Build/").next().unwrap_or(last).trim();
    if model.is_empty() || model.starts_with("Android") || model == "K" {
        None
    } else {
        Some(model.to_string())
    }
}
