pub const SAFETY_CATEGORIES: &[&str] = &[
    "Emergency Response",
    "Fire Safety",
    "Personal Security",
    "Health & Hygiene",
    "Road Safety",
    "Home Safety",
    "Workplace Safety",
    "Environmental Safety",
    "Cyber Security",
    "First Aid",
];

pub const SAFETY_THEMES: &[&str] = &[
    "Emergency Preparedness",
    "Prevention First",
    "Stay Alert",
    "Safety First",
    "Be Prepared",
    "Protect Yourself",
    "Secure Environment",
    "Health Conscious",
    "Safe Living",
    "Risk Management",
];

const DEFAULT_TIPS: &[&str] = &[
    "Stay alert and aware of your surroundings",
    "Keep emergency contacts readily available",
    "Follow safety protocols and guidelines",
    "Report any safety concerns immediately",
];

const CATEGORY_TIPS: &[(&str, &[&str])] = &[
    (
        "Emergency Response",
        &[
            "Keep emergency numbers handy",
            "Know your evacuation routes",
            "Have a first aid kit ready",
            "Create an emergency contact list",
        ],
    ),
    (
        "Fire Safety",
        &[
            "Install smoke detectors",
            "Keep fire extinguishers accessible",
            "Plan escape routes",
            "Never leave cooking unattended",
        ],
    ),
    (
        "Personal Security",
        &[
            "Stay aware of surroundings",
            "Travel in groups when possible",
            "Keep valuables secure",
            "Share your location with trusted contacts",
        ],
    ),
    (
        "Health & Hygiene",
        &[
            "Wash hands frequently",
            "Maintain social distance",
            "Wear masks in crowded places",
            "Stay hydrated and eat well",
        ],
    ),
];

/// Tips for a category label, or the generic list when the category has none.
pub fn tips_for(category: &str) -> &'static [&'static str] {
    CATEGORY_TIPS
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, tips)| *tips)
        .unwrap_or(DEFAULT_TIPS)
}

/// First category label mentioned anywhere in the message, ignoring case.
pub fn category_in(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    SAFETY_CATEGORIES
        .iter()
        .copied()
        .find(|category| message.contains(&category.to_lowercase()))
}

pub fn render_tips(category: &str) -> String {
    let mut response = format!("🔒 {} Tips:\n\n", category);
    for tip in tips_for(category) {
        response.push_str(&format!("• {}\n", tip));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_has_own_tips() {
        assert_eq!(tips_for("Fire Safety")[0], "Install smoke detectors");
    }

    #[test]
    fn category_without_tips_gets_defaults() {
        assert_eq!(tips_for("Cyber Security"), DEFAULT_TIPS);
    }

    #[test]
    fn finds_category_case_insensitively() {
        assert_eq!(category_in("any FIRE SAFETY advice?"), Some("Fire Safety"));
        assert_eq!(category_in("what about my car"), None);
    }

    #[test]
    fn renders_bulleted_list() {
        let rendered = render_tips("Personal Security");
        assert!(rendered.starts_with("🔒 Personal Security Tips:\n\n• Stay aware of surroundings\n"));
        assert_eq!(rendered.matches("• ").count(), 4);
    }
}
