use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category assigned to settings keys the classifier does not recognize.
pub const GENERAL_CATEGORY: &str = "general";

/// Static key -> category table for the settings store. The category is a
/// pure function of the key and is recomputed on every write; it is never
/// accepted from user input.
const SETTING_CATEGORIES: &[(&str, &str)] = &[
    ("siteName", "general"),
    ("siteTagline", "general"),
    ("siteDescription", "general"),
    ("footerText", "general"),
    ("contactEmail", "contact"),
    ("contactPhone", "contact"),
    ("contactAddress", "contact"),
    ("workingHours", "contact"),
    ("facebookUrl", "social"),
    ("instagramUrl", "social"),
    ("youtubeUrl", "social"),
    ("telegramUrl", "social"),
    ("primaryColor", "appearance"),
    ("secondaryColor", "appearance"),
    ("enableDarkMode", "appearance"),
    ("enableAnimations", "appearance"),
];

pub fn category_for_key(key: &str) -> &'static str {
    SETTING_CATEGORIES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, category)| *category)
        .unwrap_or(GENERAL_CATEGORY)
}

/// Fully-typed site settings the public pages render from. Everything is a
/// string except the two boolean toggles, which travel over the wire as the
/// literal strings "true"/"false".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_tagline: String,
    pub site_description: String,
    pub footer_text: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub contact_address: String,
    pub working_hours: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub telegram_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub enable_dark_mode: bool,
    pub enable_animations: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Ummez Academy".to_string(),
            site_tagline: "Knowledge opens every door".to_string(),
            site_description: "A modern school combining a classical curriculum \
                               with contemporary teaching methods."
                .to_string(),
            footer_text: "© Ummez Academy. All rights reserved.".to_string(),
            contact_email: "info@ummez.academy".to_string(),
            contact_phone: "+998 71 200-00-00".to_string(),
            contact_address: "Tashkent, Mirzo Ulugbek district".to_string(),
            working_hours: "Mon-Sat 08:00-18:00".to_string(),
            facebook_url: String::new(),
            instagram_url: String::new(),
            youtube_url: String::new(),
            telegram_url: String::new(),
            primary_color: "#1e3a8a".to_string(),
            secondary_color: "#f59e0b".to_string(),
            enable_dark_mode: false,
            enable_animations: true,
        }
    }
}

impl SiteSettings {
    /// Flatten back to the wire representation used by POST /api/settings.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("siteName".into(), self.site_name.clone());
        map.insert("siteTagline".into(), self.site_tagline.clone());
        map.insert("siteDescription".into(), self.site_description.clone());
        map.insert("footerText".into(), self.footer_text.clone());
        map.insert("contactEmail".into(), self.contact_email.clone());
        map.insert("contactPhone".into(), self.contact_phone.clone());
        map.insert("contactAddress".into(), self.contact_address.clone());
        map.insert("workingHours".into(), self.working_hours.clone());
        map.insert("facebookUrl".into(), self.facebook_url.clone());
        map.insert("instagramUrl".into(), self.instagram_url.clone());
        map.insert("youtubeUrl".into(), self.youtube_url.clone());
        map.insert("telegramUrl".into(), self.telegram_url.clone());
        map.insert("primaryColor".into(), self.primary_color.clone());
        map.insert("secondaryColor".into(), self.secondary_color.clone());
        map.insert("enableDarkMode".into(), self.enable_dark_mode.to_string());
        map.insert(
            "enableAnimations".into(),
            self.enable_animations.to_string(),
        );
        map
    }
}

/// Merge a fetched key/value map over the defaults, field by field.
///
/// Total and idempotent: unknown keys are ignored, missing keys keep their
/// default, and the two boolean toggles only flip on the exact literals
/// "true"/"false" (anything else keeps the current value).
pub fn merge_settings(fetched: &HashMap<String, String>) -> SiteSettings {
    let mut settings = SiteSettings::default();

    let mut assign = |key: &str, slot: &mut String| {
        if let Some(value) = fetched.get(key) {
            *slot = value.clone();
        }
    };
    assign("siteName", &mut settings.site_name);
    assign("siteTagline", &mut settings.site_tagline);
    assign("siteDescription", &mut settings.site_description);
    assign("footerText", &mut settings.footer_text);
    assign("contactEmail", &mut settings.contact_email);
    assign("contactPhone", &mut settings.contact_phone);
    assign("contactAddress", &mut settings.contact_address);
    assign("workingHours", &mut settings.working_hours);
    assign("facebookUrl", &mut settings.facebook_url);
    assign("instagramUrl", &mut settings.instagram_url);
    assign("youtubeUrl", &mut settings.youtube_url);
    assign("telegramUrl", &mut settings.telegram_url);
    assign("primaryColor", &mut settings.primary_color);
    assign("secondaryColor", &mut settings.secondary_color);

    let mut coerce = |key: &str, slot: &mut bool| match fetched.get(key).map(String::as_str) {
        Some("true") => *slot = true,
        Some("false") => *slot = false,
        _ => {}
    };
    coerce("enableDarkMode", &mut settings.enable_dark_mode);
    coerce("enableAnimations", &mut settings.enable_animations);

    settings
}

/// Seed row for the statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticDefault {
    pub key: &'static str,
    pub value: i32,
    pub label: &'static str,
    pub suffix: &'static str,
}

/// The five fixed statistics keys. The API never adds or removes rows; POST
/// only updates values for these keys and PUT restores this exact set.
pub const STATISTIC_DEFAULTS: &[StatisticDefault] = &[
    StatisticDefault {
        key: "students",
        value: 850,
        label: "Students",
        suffix: "+",
    },
    StatisticDefault {
        key: "teachers",
        value: 45,
        label: "Teachers",
        suffix: "",
    },
    StatisticDefault {
        key: "classrooms",
        value: 32,
        label: "Classrooms",
        suffix: "",
    },
    StatisticDefault {
        key: "books",
        value: 12000,
        label: "Library books",
        suffix: "+",
    },
    StatisticDefault {
        key: "computers",
        value: 120,
        label: "Computers",
        suffix: "",
    },
];

/// Section keys the about page is assembled from, in display order.
pub const ABOUT_SECTION_KEYS: &[&str] = &[
    "hero", "vision", "mission", "overview", "features", "timeline",
];

#[derive(Debug, Clone)]
pub struct AboutSectionDefault {
    pub section: &'static str,
    pub title: &'static str,
    pub content: &'static str,
}

pub const ABOUT_SECTION_DEFAULTS: &[AboutSectionDefault] = &[
    AboutSectionDefault {
        section: "hero",
        title: "About Ummez Academy",
        content: "A school where every student is known by name.",
    },
    AboutSectionDefault {
        section: "vision",
        title: "Our vision",
        content: "Raising a generation that thinks independently and acts responsibly.",
    },
    AboutSectionDefault {
        section: "mission",
        title: "Our mission",
        content: "Deliver a world-class education rooted in local values.",
    },
    AboutSectionDefault {
        section: "overview",
        title: "The academy at a glance",
        content: "Founded in 2015, the academy serves students from grade 1 through 11.",
    },
    AboutSectionDefault {
        section: "features",
        title: "What makes us different",
        content: "Small classes, daily sport, and a bilingual curriculum.",
    },
    AboutSectionDefault {
        section: "timeline",
        title: "Milestones",
        content: "2015 founding, 2018 new campus, 2022 first graduating class.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_classify_as_general() {
        assert_eq!(category_for_key("enableDarkMode"), "appearance");
        assert_eq!(category_for_key("contactEmail"), "contact");
        assert_eq!(category_for_key("somethingNew"), GENERAL_CATEGORY);
    }

    #[test]
    fn merge_starts_from_defaults_and_overwrites() {
        let mut fetched = HashMap::new();
        fetched.insert("siteName".to_string(), "Royal Academy".to_string());
        fetched.insert("enableDarkMode".to_string(), "true".to_string());
        fetched.insert("unknownKey".to_string(), "ignored".to_string());

        let merged = merge_settings(&fetched);
        assert_eq!(merged.site_name, "Royal Academy");
        assert!(merged.enable_dark_mode);
        // Fields absent from the fetched map keep their defaults.
        assert_eq!(merged.contact_email, SiteSettings::default().contact_email);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut fetched = HashMap::new();
        fetched.insert("siteTagline".to_string(), "New tagline".to_string());
        fetched.insert("enableAnimations".to_string(), "false".to_string());

        let once = merge_settings(&fetched);
        let twice = merge_settings(&once.to_map());
        // Round-tripping through the wire map and merging again is stable.
        assert_eq!(once.site_tagline, twice.site_tagline);
        assert_eq!(once.enable_animations, twice.enable_animations);
    }

    #[test]
    fn merge_never_throws_on_garbage_booleans() {
        let mut fetched = HashMap::new();
        fetched.insert("enableDarkMode".to_string(), "yes please".to_string());
        let merged = merge_settings(&fetched);
        assert_eq!(merged.enable_dark_mode, SiteSettings::default().enable_dark_mode);
    }

    #[test]
    fn statistic_defaults_cover_the_fixed_key_set() {
        let keys: Vec<&str> = STATISTIC_DEFAULTS.iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec!["students", "teachers", "classrooms", "books", "computers"]
        );
    }
}
