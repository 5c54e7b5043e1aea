use log::Level;

pub const THEME_STORAGE_KEY: &str = "coachkolla-theme";
pub const DESIGN_URL: &str = "assets/design.json";

/// Section ids in page order. Scroll spy links join on these.
pub const SECTION_IDS: [&str; 5] = ["home", "about", "programs", "faq", "contact"];

pub const PARALLAX_FACTOR: f64 = 0.15;
pub const PARALLAX_MAX_OFFSET: f64 = 80.0;
pub const PARALLAX_EPSILON: f64 = 0.5;
pub const PARALLAX_SCALE: f64 = 1.02;

/// The header turns solid this many pixels before the hero's bottom edge.
pub const HEADER_OFFSET: f64 = 80.0;
pub const SIDE_NAV_THRESHOLD: f64 = 200.0;

pub const SUBMIT_DELAY_MS: u32 = 900;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpyOptions {
    pub link_selector: &'static str,
    pub root_margin: &'static str,
    pub threshold: f64,
}

pub const PRIMARY_SPY: SpyOptions = SpyOptions {
    link_selector: ".nav-link",
    root_margin: "0px 0px -60% 0px",
    threshold: 0.2,
};

pub const SIDE_SPY: SpyOptions = SpyOptions {
    link_selector: ".side-nav-link",
    root_margin: "0px 0px -60% 0px",
    threshold: 0.25,
};

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// User-facing text. The live site is Icelandic.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteCopy {
    pub name_label: &'static str,
    pub email_label: &'static str,
    pub goal_label: &'static str,
    pub message_label: &'static str,
    pub consent_label: &'static str,
    pub missing_prefix: &'static str,
    pub sending: &'static str,
    pub sent: &'static str,
    pub failed: &'static str,
    pub hero_title: &'static str,
    pub hero_title_size: &'static str,
    pub hero_primary_label: &'static str,
    pub hero_primary_href: &'static str,
    pub hero_secondary_label: &'static str,
    pub hero_secondary_href: &'static str,
}

impl SiteCopy {
    pub fn icelandic() -> Self {
        Self {
            name_label: "Nafn",
            email_label: "Netfang",
            goal_label: "Markmið",
            message_label: "Skilaboð",
            consent_label: "Samþykki",
            missing_prefix: "Vantar",
            sending: "Sendi…",
            sent: "Takk! Ég hef samband sem fyrst.",
            failed: "Villa kom upp. Reyndu aftur.",
            hero_title: "Coach Kolla",
            hero_title_size: "clamp(2rem,5vw,4rem)",
            hero_primary_label: "Skrá mig í fjarþjálfun",
            hero_primary_href: "#contact",
            hero_secondary_label: "Sjá prógrömm",
            hero_secondary_href: "#programs",
        }
    }

    #[cfg(test)]
    pub fn english() -> Self {
        Self {
            name_label: "Name",
            email_label: "Email",
            goal_label: "Goal",
            message_label: "Message",
            consent_label: "Consent",
            missing_prefix: "Missing",
            sending: "Sending…",
            sent: "Thanks! I'll be in touch soon.",
            failed: "Something went wrong. Please try again.",
            hero_secondary_label: "See programs",
            hero_primary_label: "Sign me up for online coaching",
            ..Self::icelandic()
        }
    }
}

impl Default for SiteCopy {
    fn default() -> Self {
        Self::icelandic()
    }
}
