// End-to-end crisis assessment scenarios
//
// Covers the built-in Arabic tables and exact scoring boundaries using
// purpose-built tables.

use sanad::config::EngineConfig;
use sanad::crisis::{CrisisDetector, CrisisLevel, CrisisTables, CrisisType, ResponseTemplate};
use sanad::session::{InMemorySessionStore, SessionSignal, SessionStore};
use std::sync::Arc;

fn builtin_detector() -> CrisisDetector {
    CrisisDetector::new(EngineConfig::default()).expect("built-in tables compile")
}

fn detector_with(tables: CrisisTables) -> CrisisDetector {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
    CrisisDetector::with_tables(tables, EngineConfig::default(), store).unwrap()
}

const SAMPLES: &[&str] = &[
    "أريد أن أموت، قررت إنهاء حياتي الليلة",
    "أشعر بالقلق من الامتحان",
    "أسمع أصوات ويراقبونني في كل مكان",
    "راح أكسر كل شي وأفجر فيهم",
    "لا أمل أبداً وأنا فاشل أمام الجميع",
    "ضايق صدري مرة وقلبي مكسور",
    "",
];

#[test]
fn test_suicide_plan_requires_immediate_intervention() {
    let detector = builtin_detector();
    let a = detector.assess("أريد أن أموت، قررت إنهاء حياتي الليلة", None);

    assert!(a.detected_types.contains(&CrisisType::Suicide));
    assert!(a.total_score >= 2.0);
    assert_eq!(a.crisis_level, CrisisLevel::Critical);
    assert!(a.requires_escalation);
    assert!(a.requires_immediate_intervention);
    assert!(a.emergency_resources.contains_key("general_emergency"));
    assert!(a.emergency_resources.contains_key("sultan_qaboos_hospital"));
    assert_eq!(a.response_template(), ResponseTemplate::CriticalSuicide);
}

#[test]
fn test_dying_of_laughter_is_not_suicide() {
    let detector = builtin_detector();
    let a = detector.assess("كنت أموت من الضحك اليوم", None);

    assert!(!a.detected_types.contains(&CrisisType::Suicide));
    assert_eq!(a.total_score, 0.0);
    assert_eq!(a.crisis_level, CrisisLevel::Low);
}

#[test]
fn test_exam_anxiety_is_low() {
    let detector = builtin_detector();
    let a = detector.assess("أشعر بالقلق من الامتحان", None);

    assert_eq!(a.total_score, 0.0);
    assert_eq!(a.crisis_level, CrisisLevel::Low);
    assert!(!a.requires_escalation);
    assert!(!a.requires_immediate_intervention);
    assert_eq!(a.session_pattern_risk, 0.0);
}

#[test]
fn test_dialect_violence_threat() {
    let detector = builtin_detector();
    let a = detector.assess("راح أكسر كل شي وأفجر فيهم", None);

    assert!(a.detected_types.contains(&CrisisType::Violence));
    assert!(a.evidence.dialect.contains(&"راح أكسر كل شي".to_string()));
    assert!(a.evidence.dialect.contains(&"أفجر فيهم".to_string()));
    assert_eq!(a.emergency_resources.get("police").map(String::as_str), Some("999"));
}

#[test]
fn test_flags_follow_level() {
    let detector = builtin_detector();
    for text in SAMPLES {
        let a = detector.assess(text, None);
        assert_eq!(a.requires_escalation, a.crisis_level >= CrisisLevel::High, "{}", text);
        assert_eq!(
            a.requires_immediate_intervention,
            a.crisis_level == CrisisLevel::Critical,
            "{}",
            text
        );
    }
}

#[test]
fn test_scores_non_negative_and_resources_present() {
    let detector = builtin_detector();
    for text in SAMPLES {
        let a = detector.assess(text, None);
        assert!(a.total_score >= 0.0, "{}", text);
        assert!(a.evidence.type_scores.values().all(|s| *s > 0.0), "{}", text);
        assert!(a.emergency_resources.contains_key("general_emergency"), "{}", text);
    }
}

#[test]
fn test_stateless_assessment_is_deterministic() {
    let detector = builtin_detector();
    for text in SAMPLES {
        assert_eq!(detector.assess(text, None), detector.assess(text, None), "{}", text);
    }
}

#[test]
fn test_suicide_boundary_inclusive() {
    // 0.5 * 4.0 == 2.0 exactly
    let detector = detector_with(
        CrisisTables::empty()
            .with_pattern("قررت", CrisisType::Suicide, 4.0)
            .unwrap(),
    );
    let a = detector.assess("قررت", None);
    assert_eq!(a.total_score, 2.0);
    assert_eq!(a.crisis_level, CrisisLevel::Critical);
    assert_eq!(a.evidence.rule.as_deref(), Some("suicide_critical"));

    let detector = detector_with(
        CrisisTables::empty()
            .with_pattern("قررت", CrisisType::Suicide, 3.998)
            .unwrap(),
    );
    let a = detector.assess("قررت", None);
    assert!(a.total_score < 2.0);
    assert_eq!(a.crisis_level, CrisisLevel::High);
}

#[test]
fn test_violence_rule_below_generic_critical() {
    let detector = detector_with(
        CrisisTables::empty()
            .with_pattern("سأحرقهم", CrisisType::Violence, 5.2)
            .unwrap(),
    );
    let a = detector.assess("سأحرقهم", None);

    assert!((a.total_score - 2.6).abs() < 1e-9);
    assert_eq!(a.crisis_level, CrisisLevel::Critical);
    assert_eq!(a.evidence.rule.as_deref(), Some("violence_critical"));
    assert_eq!(a.response_template(), ResponseTemplate::CriticalViolence);
}

#[test]
fn test_escalating_session_through_detector() {
    // Pattern weights chosen so the fused totals are 0.2, 0.6 and 1.1
    let detector = detector_with(
        CrisisTables::empty()
            .with_pattern("أولى", CrisisType::Psychosis, 0.4)
            .unwrap()
            .with_pattern("ثانية", CrisisType::Psychosis, 1.2)
            .unwrap()
            .with_pattern("ثالثة", CrisisType::Psychosis, 2.2)
            .unwrap(),
    );

    let first = detector.assess("أولى", Some("s1"));
    let second = detector.assess("ثانية", Some("s1"));
    let third = detector.assess("ثالثة", Some("s1"));

    assert_eq!(first.session_pattern_risk, 0.0);
    assert_eq!(second.session_pattern_risk, 0.0);
    assert_eq!(third.session_pattern_risk, 0.5);
    assert_eq!(third.session_signal, SessionSignal::Escalating);

    // The same text without a session carries no session risk
    assert_eq!(detector.assess("ثالثة", None).session_pattern_risk, 0.0);
}

#[test]
fn test_persistent_session_through_detector() {
    // Totals 1.2, 0.3, 1.5
    let detector = detector_with(
        CrisisTables::empty()
            .with_pattern("أولى", CrisisType::SubstanceAbuse, 2.4)
            .unwrap()
            .with_pattern("ثانية", CrisisType::SubstanceAbuse, 0.6)
            .unwrap()
            .with_pattern("ثالثة", CrisisType::SubstanceAbuse, 3.0)
            .unwrap(),
    );

    detector.assess("أولى", Some("s2"));
    detector.assess("ثانية", Some("s2"));
    let third = detector.assess("ثالثة", Some("s2"));

    assert_eq!(third.session_pattern_risk, 0.3);
    assert_eq!(third.session_signal, SessionSignal::Persistent);
}

#[test]
fn test_session_history_stays_bounded() {
    let detector = builtin_detector();
    for _ in 0..25 {
        detector.assess("لا أمل", Some("long"));
    }
    let history = detector.sessions().store().history("long").unwrap();
    assert_eq!(history.len(), 10);
}
