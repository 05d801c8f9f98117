// Crisis lexicon, pattern and dialect tables
//
// The built-in tables are static; CrisisTables compiles them once and can be
// extended with deployment-specific entries before the detector is built.

use regex::{Regex, RegexBuilder};

use super::types::CrisisType;
use crate::errors::{ensure_positive, CrisisError, CrisisResult};

struct KeywordSet {
    crisis_type: CrisisType,
    keywords: &'static [&'static str],
}

struct PatternDef {
    pattern: &'static str,
    crisis_type: CrisisType,
    weight: f64,
}

// ── Standard-register keywords ──────────────────────────────────────

static CRISIS_KEYWORDS: &[KeywordSet] = &[
    KeywordSet {
        crisis_type: CrisisType::Suicide,
        keywords: &[
            // Direct
            "أريد أن أموت", "بدي أموت", "نفسي أموت", "أقتل نفسي",
            "سأقتل نفسي", "أنتحر", "انتحار", "أنهي حياتي", "إنهاء حياتي",
            "لا أريد أن أعيش", "مللت من الحياة", "الموت أحسن",
            "أستحق الموت", "العالم أحسن بدوني", "أذهب للأبد",
            // Indirect ideation
            "لا فائدة من وجودي", "محد يحتاجني", "عبء على الجميع",
            "أرتاح لو مت", "أتمنى أنام ولا أصحى", "خلصت من الدنيا",
            "نهاية المطاف", "آخر خيار", "حل نهائي", "راحة أبدية",
            // Planning
            "أخطط لـ", "قررت أن", "لن أكون هنا", "وداعاً للجميع",
            "آخر رسالة", "توديع", "وصية", "انتهى كل شيء",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::SelfHarm,
        keywords: &[
            "أؤذي نفسي", "أجرح نفسي", "أقطع نفسي", "أضرب نفسي",
            "أحرق نفسي", "أعذب نفسي", "أكسر", "أخدش",
            "سكين", "شفرة", "حرق", "ضرب", "عض", "خدش",
            "أستحق الألم", "أعاقب نفسي", "أستحق العذاب",
            "ألم جسدي", "أشعر بالألم", "دم", "جروح", "ندوب",
            "أريد أن أشعر بشيء", "ألم حقيقي", "ألم أستطيع رؤيته",
            "طريقة للتحكم", "الألم الوحيد", "أتحكم في ألمي",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::Violence,
        keywords: &[
            "سأقتل", "أريد أن أؤذي", "سأضرب", "سأدمر",
            "أنتقم", "سأؤذي من", "أقتله", "أكسر رأسه",
            "أفجر", "أحرق", "أدمر كل شيء", "أنهي الجميع",
            "لا أستطيع التحكم", "سأفقد السيطرة", "غضب شديد",
            "أعمى من الغضب", "سأفعل شيئاً سيئاً", "أفقد عقلي",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::SevereDepression,
        keywords: &[
            // Hopelessness
            "لا أمل", "لا فائدة", "مستحيل", "ميؤوس منه",
            "الظلام فقط", "لا ضوء", "نفق مظلم", "لا مخرج",
            "مسدود الأفق", "لا حل", "انتهى كل شيء",
            // Worthlessness
            "لا قيمة لي", "فاشل", "عديم الفائدة", "لا أستحق",
            "أسوأ شخص", "لا أصلح لشيء", "عبء على الجميع",
            // Isolation
            "وحيد تماماً", "محد يفهمني", "محد يحبني", "منبوذ",
            "لا أحد يهتم", "معزول", "منفرد", "وحش",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::Psychosis,
        keywords: &[
            "أسمع أصوات", "أرى أشياء", "يراقبونني", "يتجسسون",
            "مؤامرة ضدي", "يطاردونني", "صوت يقول لي",
            "أشياء غريبة", "لست حقيقي", "العالم ليس حقيقي",
            "أفكاري مختلطة", "لا أفهم نفسي", "كلام غير منطقي",
            "رسائل خفية", "معاني مخفية", "علامات",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::SubstanceAbuse,
        keywords: &[
            "أفرط في", "إدمان", "مخدرات", "كحول", "حبوب",
            "لا أستطيع التوقف", "أحتاج المزيد", "انسحاب",
            "جرعة زائدة", "تسمم", "أعراض", "اعتماد",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::EatingDisorder,
        keywords: &[
            "أتقيأ عمداً", "أتقيأ بعد الأكل", "أجوع نفسي", "لا آكل أبداً",
            "أكره جسمي", "سمين جداً", "أخاف من الأكل", "أحسب كل سعرة",
        ],
    },
];

// ── Weighted regex patterns ─────────────────────────────────────────

static CRISIS_PATTERNS: &[PatternDef] = &[
    // Suicide
    PatternDef {
        pattern: r"(أريد|بدي|نفسي).*(أموت|أقتل نفسي|أنتحر)",
        crisis_type: CrisisType::Suicide,
        weight: 0.9,
    },
    PatternDef {
        pattern: r"(سأقتل|راح أقتل).*(نفسي|روحي)",
        crisis_type: CrisisType::Suicide,
        weight: 0.95,
    },
    PatternDef {
        pattern: r"(لا أريد|ما بدي).*(أعيش|أكمل|أستمر)",
        crisis_type: CrisisType::Suicide,
        weight: 0.8,
    },
    // Stated decision or plan
    PatternDef {
        pattern: r"(قررت|أخطط|ناوي|عازم)\s*(أن\s*)?(إنهاء|أنهي|أنتحر|أقتل نفسي)",
        crisis_type: CrisisType::Suicide,
        weight: 1.5,
    },
    // Intent tied to a time frame
    PatternDef {
        pattern: r"(إنهاء حياتي|أنهي حياتي|أنتحر).*(الليلة|اليوم|بكرة|غداً|الحين)",
        crisis_type: CrisisType::Suicide,
        weight: 1.0,
    },
    // Self-harm
    PatternDef {
        pattern: r"(أؤذي|أجرح|أقطع).*(نفسي|روحي)",
        crisis_type: CrisisType::SelfHarm,
        weight: 0.85,
    },
    PatternDef {
        pattern: r"(شفرة|سكين|حرق).*(نفس|جسم)",
        crisis_type: CrisisType::SelfHarm,
        weight: 0.8,
    },
    // Violence
    PatternDef {
        pattern: r"(سأقتل|راح أقتل|أقتل).*(كل|جميع|الناس)",
        crisis_type: CrisisType::Violence,
        weight: 0.9,
    },
    PatternDef {
        pattern: r"(أؤذي|أضرب|أكسر).*(أحد|شخص|واحد)",
        crisis_type: CrisisType::Violence,
        weight: 0.7,
    },
    // Severe depression
    PatternDef {
        pattern: r"(لا أمل|لا فائدة|مستحيل).*(نهائياً|أبداً|تماماً)",
        crisis_type: CrisisType::SevereDepression,
        weight: 0.7,
    },
    PatternDef {
        pattern: r"(عبء|فاشل|عديم).*(الجميع|الكل|الناس)",
        crisis_type: CrisisType::SevereDepression,
        weight: 0.6,
    },
];

// ── Omani dialect idioms ────────────────────────────────────────────

static DIALECT_EXPRESSIONS: &[KeywordSet] = &[
    KeywordSet {
        crisis_type: CrisisType::Suicide,
        keywords: &[
            "خلاص تعبت من الدنيا", "ما عد أقدر أكمل",
            "أرتاح لو رحت", "مللت من كل شي", "ما لي فايدة",
            "الموت أحسن لي", "خلصت من هالحياة",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::SelfHarm,
        keywords: &[
            "أعذب روحي", "أوجع نفسي", "أضر بروحي",
            "أستاهل الألم", "ألم أحسه بجسمي",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::SevereDepression,
        keywords: &[
            "محطم نفسياً واجد", "ضايق صدري مرة", "قلبي مكسور",
            "حالتي زينة ما هي", "نفسيتي في الأرض", "دايخ من الهموم",
        ],
    },
    KeywordSet {
        crisis_type: CrisisType::Violence,
        keywords: &[
            "راح أكسر كل شي", "أفجر فيهم", "أورجيهم",
            "أخليهم يندمون", "ما راح أسكت",
        ],
    },
];

/// Per-type phrase lists, indexed by `CrisisType`. Phrases are stored lowercased.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    phrases: [Vec<String>; CrisisType::ALL.len()],
}

impl PhraseTable {
    fn from_sets(sets: &[KeywordSet]) -> Self {
        let mut table = Self::default();
        for set in sets {
            table.extend(set.crisis_type, set.keywords.iter().copied());
        }
        table
    }

    /// Add phrases for a type. Blank and duplicate phrases are ignored.
    pub fn extend<I, S>(&mut self, crisis_type: CrisisType, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = &mut self.phrases[crisis_type.index()];
        for phrase in phrases {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if !phrase.is_empty() && !list.contains(&phrase) {
                list.push(phrase);
            }
        }
    }

    pub fn phrases(&self, crisis_type: CrisisType) -> &[String] {
        &self.phrases[crisis_type.index()]
    }

    /// Iterate non-empty (type, phrases) pairs in `CrisisType::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (CrisisType, &[String])> {
        CrisisType::ALL
            .iter()
            .map(move |t| (*t, self.phrases(*t)))
            .filter(|(_, p)| !p.is_empty())
    }

    pub fn len(&self) -> usize {
        self.phrases.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A compiled pattern tagged with its crisis type and severity weight
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub regex: Regex,
    pub crisis_type: CrisisType,
    pub weight: f64,
}

impl PatternEntry {
    /// Compile a case-insensitive pattern. Fails on bad syntax or a non-positive weight.
    pub fn compile(pattern: &str, crisis_type: CrisisType, weight: f64) -> CrisisResult<Self> {
        ensure_positive(&format!("pattern '{}'", pattern), weight)?;
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CrisisError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            regex,
            crisis_type,
            weight,
        })
    }
}

/// The three immutable tables the channel matchers scan
#[derive(Debug, Clone, Default)]
pub struct CrisisTables {
    pub lexicon: PhraseTable,
    pub patterns: Vec<PatternEntry>,
    pub dialect: PhraseTable,
}

impl CrisisTables {
    /// Compile the built-in Arabic / Omani tables
    pub fn builtin() -> CrisisResult<Self> {
        let patterns = CRISIS_PATTERNS
            .iter()
            .map(|def| PatternEntry::compile(def.pattern, def.crisis_type, def.weight))
            .collect::<CrisisResult<Vec<_>>>()?;

        Ok(Self {
            lexicon: PhraseTable::from_sets(CRISIS_KEYWORDS),
            patterns,
            dialect: PhraseTable::from_sets(DIALECT_EXPRESSIONS),
        })
    }

    /// Tables with no entries, for callers that supply their own vocabulary
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, crisis_type: CrisisType, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lexicon.extend(crisis_type, keywords);
        self
    }

    pub fn with_dialect<I, S>(mut self, crisis_type: CrisisType, idioms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dialect.extend(crisis_type, idioms);
        self
    }

    pub fn with_pattern(
        mut self,
        pattern: &str,
        crisis_type: CrisisType,
        weight: f64,
    ) -> CrisisResult<Self> {
        self.patterns
            .push(PatternEntry::compile(pattern, crisis_type, weight)?);
        Ok(self)
    }
}
