// Emergency resources directory for Oman
// Maps detected crisis types to a flat name -> contact bundle

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::CrisisType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Emergency,
    Hospitals,
    MentalHealth,
    Support,
}

static EMERGENCY: &[(&str, &str)] = &[
    ("general_emergency", "999"),
    ("police", "999"),
    ("ambulance", "999"),
    ("fire", "999"),
];

static HOSPITALS: &[(&str, &str)] = &[
    ("sultan_qaboos_hospital", "+968 24211411"),
    ("royal_hospital", "+968 24599000"),
    ("khoula_hospital", "+968 24560441"),
    ("nizwa_hospital", "+968 25431800"),
];

static MENTAL_HEALTH: &[(&str, &str)] = &[
    ("mental_health_hotline", "مكتوب قريباً"),
    ("psychological_services", "وزارة الصحة - الخدمات النفسية"),
    ("crisis_intervention", "قسم الطوارئ النفسية"),
    ("social_services", "وزارة التنمية الاجتماعية"),
];

static SUPPORT: &[(&str, &str)] = &[
    ("family_guidance", "مراكز الإرشاد الأسري"),
    ("youth_centers", "مراكز الشباب"),
    ("women_centers", "مراكز المرأة"),
    ("community_centers", "المراكز المجتمعية"),
];

/// Types that pull in mental-health services and hospitals
const CLINICAL_TYPES: [CrisisType; 3] = [
    CrisisType::Suicide,
    CrisisType::SelfHarm,
    CrisisType::SevereDepression,
];

pub type ResourceBundle = BTreeMap<String, String>;

impl ResourceCategory {
    pub fn contacts(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResourceCategory::Emergency => EMERGENCY,
            ResourceCategory::Hospitals => HOSPITALS,
            ResourceCategory::MentalHealth => MENTAL_HEALTH,
            ResourceCategory::Support => SUPPORT,
        }
    }

    /// Look up a single contact in this category
    pub fn contact(&self, name: &str) -> Option<&'static str> {
        self.contacts()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }
}

fn merge(bundle: &mut ResourceBundle, category: ResourceCategory) {
    for (name, contact) in category.contacts() {
        bundle.insert((*name).to_string(), (*contact).to_string());
    }
}

/// Resources relevant to the detected crisis types
pub fn resolve(detected: &[CrisisType]) -> ResourceBundle {
    let mut bundle = ResourceBundle::new();

    merge(&mut bundle, ResourceCategory::Emergency);

    if detected.iter().any(|t| CLINICAL_TYPES.contains(t)) {
        merge(&mut bundle, ResourceCategory::MentalHealth);
        merge(&mut bundle, ResourceCategory::Hospitals);
    }

    if detected.contains(&CrisisType::Violence) {
        if let Some(police) = ResourceCategory::Emergency.contact("police") {
            bundle.insert("police".to_string(), police.to_string());
        }
    }

    merge(&mut bundle, ResourceCategory::Support);

    bundle
}

/// Resolve from type names exchanged as strings. Unknown names add nothing.
pub fn resolve_names<S: AsRef<str>>(names: &[S]) -> ResourceBundle {
    let detected: Vec<CrisisType> = names
        .iter()
        .filter_map(|name| {
            let parsed = CrisisType::from_name_lenient(name.as_ref());
            if parsed.is_none() {
                tracing::debug!(name = name.as_ref(), "Ignoring unknown crisis type");
            }
            parsed
        })
        .collect();
    resolve(&detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_includes_emergency_and_support() {
        let bundle = resolve(&[]);
        assert_eq!(bundle.get("general_emergency").map(String::as_str), Some("999"));
        assert!(bundle.contains_key("community_centers"));
        assert!(!bundle.contains_key("royal_hospital"));
        assert!(!bundle.contains_key("crisis_intervention"));
    }

    #[test]
    fn test_clinical_types_add_hospitals() {
        for t in CLINICAL_TYPES {
            let bundle = resolve(&[t]);
            assert!(bundle.contains_key("sultan_qaboos_hospital"), "{}", t);
            assert!(bundle.contains_key("psychological_services"), "{}", t);
        }
    }

    #[test]
    fn test_violence_keeps_police() {
        let bundle = resolve(&[CrisisType::Violence]);
        assert_eq!(bundle.get("police").map(String::as_str), Some("999"));
        assert!(!bundle.contains_key("khoula_hospital"));
    }

    #[test]
    fn test_bundle_size() {
        let all = EMERGENCY.len() + HOSPITALS.len() + MENTAL_HEALTH.len() + SUPPORT.len();
        assert_eq!(resolve(&CrisisType::ALL).len(), all);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let bundle = resolve_names(&["not_a_type", "self_harm"]);
        assert!(bundle.contains_key("royal_hospital"));

        let bundle = resolve_names(&["panic"]);
        assert_eq!(bundle, resolve(&[]));
    }
}
