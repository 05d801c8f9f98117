// Response composer
// Static Arabic replies keyed by crisis level

use serde::{Deserialize, Serialize};

use super::types::{CrisisLevel, CrisisType};

const CRITICAL_SUICIDE: &str = "\
🚨 أفهم أنك تمر بوقت صعب جداً، لكن حياتك مهمة وقيمة.

يرجى التواصل فوراً مع:
📞 الطوارئ: 999
🏥 مستشفى السلطان قابوس: 24211411
🆘 أو توجه لأقرب قسم طوارئ

لست وحدك. هناك أشخاص يريدون مساعدتك.";

const CRITICAL_VIOLENCE: &str = "\
⚠️ أرى أنك تشعر بغضب شديد. دعنا نجد طرق آمنة للتعامل مع هذه المشاعر.

يرجى:
📞 الاتصال بـ 999 إذا كنت في خطر
🚶‍♂️ أخذ مساحة آمنة من الموقف
🧘‍♂️ التنفس بعمق وهدوء

أتفهم غضبك، لكن سلامتك وسلامة الآخرين أهم.";

const CRITICAL_GENERAL: &str = "\
🆘 أشعر بقلق شديد عليك. يرجى طلب المساعدة المهنية فوراً.

📞 اتصل بـ 999 أو توجه لأقرب مستشفى
👨‍⚕️ تحدث مع طبيب أو أخصائي نفسي
👨‍👩‍👧‍👦 أخبر شخص تثق به من عائلتك

وضعك يمكن تحسينه بالمساعدة المناسبة.";

const HIGH: &str = "\
💛 أقدر ثقتك في مشاركة مشاعرك. ما تمر به صعب، لكن هناك حلول ومساعدة.

🔗 موارد المساعدة:
📞 خط المساعدة النفسية (قريباً)
🏥 مراكز الصحة النفسية
👨‍👩‍👧‍👦 التحدث مع شخص تثق به

🤲 تذكر أن الله معك في كل لحظة، والفرج قادم بإذن الله.";

const MEDIUM: &str = "\
💙 أفهم أنك تواجه تحديات. هذا طبيعي في الحياة، والمهم كيف نتعامل معها.

💡 اقتراحات مفيدة:
🗣️ التحدث مع شخص تثق به
🤲 الدعاء والذكر للراحة النفسية
📚 قراءة القرآن للسكينة
🚶‍♂️ المشي والرياضة الخفيفة

أنا هنا لدعمك في هذه الرحلة.";

const LOW: &str = "\
💚 أسعدني أنك تشاركني أفكارك. التعبير عن المشاعر خطوة إيجابية.

دعنا نتحدث أكثر عما تشعر به وكيف يمكنني مساعدتك.";

/// Which canned reply applies to a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTemplate {
    CriticalSuicide,
    CriticalViolence,
    CriticalGeneral,
    High,
    Medium,
    Low,
}

impl ResponseTemplate {
    /// Pick the template for a level; critical turns sub-select by type
    pub fn select(level: CrisisLevel, detected: &[CrisisType]) -> Self {
        match level {
            CrisisLevel::Critical if detected.contains(&CrisisType::Suicide) => {
                ResponseTemplate::CriticalSuicide
            }
            CrisisLevel::Critical if detected.contains(&CrisisType::Violence) => {
                ResponseTemplate::CriticalViolence
            }
            CrisisLevel::Critical => ResponseTemplate::CriticalGeneral,
            CrisisLevel::High => ResponseTemplate::High,
            CrisisLevel::Medium => ResponseTemplate::Medium,
            CrisisLevel::Low => ResponseTemplate::Low,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            ResponseTemplate::CriticalSuicide => CRITICAL_SUICIDE,
            ResponseTemplate::CriticalViolence => CRITICAL_VIOLENCE,
            ResponseTemplate::CriticalGeneral => CRITICAL_GENERAL,
            ResponseTemplate::High => HIGH,
            ResponseTemplate::Medium => MEDIUM,
            ResponseTemplate::Low => LOW,
        }
    }
}

pub fn compose(level: CrisisLevel, detected: &[CrisisType]) -> &'static str {
    ResponseTemplate::select(level, detected).text()
}

/// Caution line for the response generator's system prompt. `None` at low.
pub fn prompt_advisory(level: CrisisLevel) -> Option<String> {
    match level {
        CrisisLevel::Low => None,
        _ => Some(format!(
            "## تنبيه:\nمستوى الأزمة: {} - تعامل بحذر إضافي",
            level.as_str()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_prefers_suicide_template() {
        let t = ResponseTemplate::select(
            CrisisLevel::Critical,
            &[CrisisType::Suicide, CrisisType::Violence],
        );
        assert_eq!(t, ResponseTemplate::CriticalSuicide);
        assert!(t.text().contains("24211411"));
    }

    #[test]
    fn test_critical_violence_and_generic() {
        assert_eq!(
            ResponseTemplate::select(CrisisLevel::Critical, &[CrisisType::Violence]),
            ResponseTemplate::CriticalViolence
        );
        assert_eq!(
            ResponseTemplate::select(CrisisLevel::Critical, &[CrisisType::Psychosis]),
            ResponseTemplate::CriticalGeneral
        );
    }

    #[test]
    fn test_lower_levels_ignore_type() {
        assert_eq!(compose(CrisisLevel::High, &[CrisisType::Suicide]), HIGH);
        assert_eq!(compose(CrisisLevel::Medium, &[]), MEDIUM);
        assert_eq!(compose(CrisisLevel::Low, &[CrisisType::Violence]), LOW);
    }

    #[test]
    fn test_critical_templates_carry_emergency_number() {
        for t in [
            ResponseTemplate::CriticalSuicide,
            ResponseTemplate::CriticalViolence,
            ResponseTemplate::CriticalGeneral,
        ] {
            assert!(t.text().contains("999"), "{:?}", t);
        }
    }

    #[test]
    fn test_prompt_advisory() {
        assert!(prompt_advisory(CrisisLevel::Low).is_none());
        let note = prompt_advisory(CrisisLevel::High).unwrap();
        assert!(note.contains("high"));
    }
}
