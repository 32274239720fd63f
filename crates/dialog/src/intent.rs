//! Intent detection and entity extraction over free operator text.
//!
//! Only extracts, never mutates dialog state. Keyword tables accept both
//! Russian and English shop vocabulary; numbers take either decimal
//! separator.

use once_cell::sync::Lazy;
use regex::Regex;

use cnc_core::{CutMode, InsertMaterial, Material, Operation};

/// What the operator is trying to do with this message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Plain statement carrying job data.
    ProvideData,
    /// "no, feed 0.3" - push back on a parameter.
    Correction,
    /// "where?", "what next" - frustrated nudge.
    Feedback,
    /// Anything with a question mark.
    Question,
    /// "yes", "ok" - accept what was offered.
    Affirmation,
    /// A slash command; the payload is the command name.
    Command(String),
}

/// Parameter an operator pushed back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectedParameter {
    Feed,
    Speed,
    Depth,
    Tool,
}

impl CorrectedParameter {
    pub fn label(&self) -> &'static str {
        match self {
            CorrectedParameter::Feed => "feed",
            CorrectedParameter::Speed => "rpm",
            CorrectedParameter::Depth => "depth of cut",
            CorrectedParameter::Tool => "tool",
        }
    }
}

/// A parsed correction: which parameter, and the new value if one was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub parameter: CorrectedParameter,
    pub value: Option<f64>,
}

/// Everything extracted from one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    pub material: Option<(Material, f64)>,
    pub operation: Option<(Operation, f64)>,
    pub modes: Vec<CutMode>,
    /// Single diameter mention, with confidence.
    pub diameter_mm: Option<(f64, f64)>,
    /// "from X to Y" goal; start is always greater than target.
    pub goal: Option<(f64, f64)>,
    pub surface_roughness_um: Option<f64>,
    pub length_mm: Option<f64>,
    /// Insert material mention ("ceramic insert", "поставлю керамику").
    pub insert: Option<(InsertMaterial, f64)>,
    pub correction: Option<Correction>,
}

impl Entities {
    /// Did the message carry anything that changes the job description?
    pub fn has_job_data(&self) -> bool {
        self.material.is_some()
            || self.operation.is_some()
            || self.diameter_mm.is_some()
            || self.goal.is_some()
            || !self.modes.is_empty()
            || self.surface_roughness_um.is_some()
            || self.insert.is_some()
    }
}

/// Parse result: intent, its confidence, and extracted entities.
#[derive(Debug, Clone)]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f64,
    pub entities: Entities,
    pub original: String,
}

static MATERIAL_PATTERNS: Lazy<Vec<(Regex, Material)>> = Lazy::new(|| {
    // Stainless before steel: the Russian long form contains "сталь".
    [
        (r"нерж|stainless|inox", Material::StainlessSteel),
        (r"алюмин|aluminum|aluminium", Material::Aluminum),
        (r"титан|titanium", Material::Titanium),
        (r"латун|brass", Material::Brass),
        (r"медь|меди|copper", Material::Copper),
        (r"чугун|cast[ -]?iron", Material::CastIron),
        (r"сталь|стали|steel", Material::Steel),
    ]
    .into_iter()
    .map(|(pattern, material)| (compile(pattern), material))
    .collect()
});

static OPERATION_PATTERNS: Lazy<Vec<(Regex, Operation)>> = Lazy::new(|| {
    [
        (r"расточ|boring|\bbore\b", Operation::Boring),
        (r"токар|обточ|turn|lathe", Operation::Turning),
        (r"фрезер|mill", Operation::Milling),
        (r"сверл|drill", Operation::Drilling),
    ]
    .into_iter()
    .map(|(pattern, operation)| (compile(pattern), operation))
    .collect()
});

static INSERT_PATTERNS: Lazy<Vec<(Regex, InsertMaterial)>> = Lazy::new(|| {
    [
        (r"твердосплав|carbide", InsertMaterial::Carbide),
        (r"быстрорез|\bhss\b", InsertMaterial::Hss),
        (r"керамик|ceramic", InsertMaterial::Ceramic),
        (r"эльбор|\bcbn\b", InsertMaterial::Cbn),
        (r"алмаз|diamond", InsertMaterial::Diamond),
    ]
    .into_iter()
    .map(|(pattern, insert)| (compile(pattern), insert))
    .collect()
});

static SEMI_FINISH: Lazy<Regex> = Lazy::new(|| compile(r"получистов|semi[ -]?finish"));
static FINISH: Lazy<Regex> = Lazy::new(|| compile(r"чистов|finish"));
static ROUGH: Lazy<Regex> = Lazy::new(|| compile(r"чернов|rough"));

static GOAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:с|от|from)\s*(\d+(?:[.,]\d+)?)\s*(?:до|to|на|→|->)\s*(\d+(?:[.,]\d+)?)",
        r"(\d+(?:[.,]\d+)?)\s*(?:→|->)\s*(\d+(?:[.,]\d+)?)",
        r"(\d+(?:[.,]\d+)?)\s*-\s*(\d+(?:[.,]\d+)?)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static ROUGHNESS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:ra|чистот\w*|roughness)\s*[=:]?\s*(\d+(?:[.,]\d+)?)"));

static LENGTH: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:length|длин\w*)\s*[=:]?\s*(\d+(?:[.,]\d+)?)"));

static DIAMETER_MARKED: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:ø|диаметр\w*|diameter|dia)\s*[=:]?\s*(\d+(?:[.,]\d+)?)"));

static NUMBER: Lazy<Regex> = Lazy::new(|| compile(r"\d+(?:[.,]\d+)?"));

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\d+(?:[.,]\d+)?\s*(?:rpm|об/?мин)?\s*$"));

static FEEDBACK: Lazy<Regex> =
    Lazy::new(|| compile(r"\bгде\b|что дальше|so where|what next|and now"));

static CORRECTION: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"не подходит|не так|неправильно|исправь|не то|друг(?:ая|ой|ое)|^нет\b|^no\b|wrong|not right|too (?:high|low|big|small|much|fast|slow)|doesn.?t (?:fit|work)|\bchange\b|слишком",
    )
});

static AFFIRMATION: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"^(?:да|ага|верно|правильно|подходит|ок|окей|хорошо|понял|ясно|yes|yep|ok|okay|good|fine|looks good|sounds good)\b",
    )
});

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("static pattern compiles")
}

fn parse_num(s: &str) -> Option<f64> {
    s.replace(',', ".").parse().ok()
}

/// Plausible workpiece diameter, mm.
fn diameter_ok(value: f64) -> bool {
    (0.1..=10_000.0).contains(&value)
}

/// Regex-table intent parser. Stateless; one per process is plenty.
#[derive(Debug, Default)]
pub struct IntentParser;

impl IntentParser {
    pub fn new() -> IntentParser {
        IntentParser
    }

    pub fn parse(&self, text: &str) -> IntentResult {
        let original = text.to_string();
        let lower = text.trim().to_lowercase();

        let (intent, confidence) = self.detect_intent(&lower);
        let mut entities = self.extract_entities(&lower);
        if matches!(intent, Intent::Correction) {
            entities.correction = self.parse_correction(&lower);
        }

        IntentResult {
            intent,
            confidence,
            entities,
            original,
        }
    }

    /// Is the whole message just a number (an rpm answer)?
    pub fn bare_number(&self, text: &str) -> Option<f64> {
        if BARE_NUMBER.is_match(text.trim()) {
            NUMBER.find(text).and_then(|m| parse_num(m.as_str()))
        } else {
            None
        }
    }

    fn detect_intent(&self, text: &str) -> (Intent, f64) {
        if let Some(rest) = text.strip_prefix('/') {
            let name = rest.split_whitespace().next().unwrap_or("").to_string();
            return (Intent::Command(name), 0.95);
        }
        if text.contains('?') {
            return (Intent::Question, 0.8);
        }
        if FEEDBACK.is_match(text) {
            return (Intent::Feedback, 0.9);
        }
        if CORRECTION.is_match(text) {
            return (Intent::Correction, 0.85);
        }
        if AFFIRMATION.is_match(text) {
            return (Intent::Affirmation, 0.7);
        }
        (Intent::ProvideData, 0.6)
    }

    fn extract_entities(&self, text: &str) -> Entities {
        let mut entities = Entities::default();

        for (pattern, material) in MATERIAL_PATTERNS.iter() {
            if pattern.is_match(text) {
                entities.material = Some((*material, 0.9));
                break;
            }
        }
        for (pattern, operation) in OPERATION_PATTERNS.iter() {
            if pattern.is_match(text) {
                entities.operation = Some((*operation, 0.9));
                break;
            }
        }

        for (pattern, insert) in INSERT_PATTERNS.iter() {
            if pattern.is_match(text) {
                entities.insert = Some((*insert, 0.9));
                break;
            }
        }

        if SEMI_FINISH.is_match(text) {
            entities.modes.push(CutMode::SemiFinishing);
        } else if FINISH.is_match(text) {
            entities.modes.push(CutMode::Finishing);
        }
        if ROUGH.is_match(text) {
            entities.modes.push(CutMode::Roughing);
        }

        // Ra and length are matched (and blanked) first so their numbers
        // are not mistaken for diameters.
        if let Some(caps) = ROUGHNESS.captures(text) {
            if let Some(ra) = parse_num(&caps[1]) {
                if (0.01..=50.0).contains(&ra) {
                    entities.surface_roughness_um = Some(ra);
                }
            }
        }
        if let Some(caps) = LENGTH.captures(text) {
            if let Some(len) = parse_num(&caps[1]) {
                if len > 0.0 {
                    entities.length_mm = Some(len);
                }
            }
        }
        let stripped = ROUGHNESS.replace_all(text, " ");
        let stripped = LENGTH.replace_all(&stripped, " ").into_owned();

        if let Some((start, target)) = self.extract_goal(&stripped) {
            entities.goal = Some((start, target));
            entities.diameter_mm = Some((target, 0.9));
        } else if let Some(dia) = self.extract_diameter(&stripped) {
            entities.diameter_mm = Some((dia, 0.8));
        }

        entities
    }

    fn extract_goal(&self, text: &str) -> Option<(f64, f64)> {
        for pattern in GOAL_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(text) {
                let start = parse_num(&caps[1])?;
                let target = parse_num(&caps[2])?;
                // Only a shrinking pair is a removal goal; anything else
                // falls through to plain diameter extraction.
                if diameter_ok(start) && diameter_ok(target) && start > target {
                    return Some((start, target));
                }
            }
        }
        None
    }

    fn extract_diameter(&self, text: &str) -> Option<f64> {
        if let Some(caps) = DIAMETER_MARKED.captures(text) {
            let value = parse_num(&caps[1])?;
            if diameter_ok(value) {
                return Some(value);
            }
        }
        NUMBER
            .find_iter(text)
            .filter_map(|m| parse_num(m.as_str()))
            .find(|v| diameter_ok(*v))
    }

    fn parse_correction(&self, text: &str) -> Option<Correction> {
        let parameter = if text.contains("подач") || text.contains("feed") {
            CorrectedParameter::Feed
        } else if text.contains("оборот")
            || text.contains("скорост")
            || text.contains("rpm")
            || text.contains("speed")
        {
            CorrectedParameter::Speed
        } else if text.contains("глубин") || text.contains("depth") {
            CorrectedParameter::Depth
        } else if text.contains("инструмент") || text.contains("tool") {
            CorrectedParameter::Tool
        } else {
            return None;
        };

        let value = NUMBER.find(text).and_then(|m| parse_num(m.as_str()));
        Some(Correction { parameter, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> IntentResult {
        IntentParser::new().parse(text)
    }

    #[test]
    fn extracts_material_operation_and_diameter() {
        let r = parse("turning aluminum diameter 50");
        assert_eq!(r.intent, Intent::ProvideData);
        assert_eq!(r.entities.material, Some((Material::Aluminum, 0.9)));
        assert_eq!(r.entities.operation, Some((Operation::Turning, 0.9)));
        assert_eq!(r.entities.diameter_mm, Some((50.0, 0.8)));
    }

    #[test]
    fn extracts_goal_and_roughness() {
        let r = parse("титан с 200 до 150 чистота 0.8");
        assert_eq!(r.entities.material, Some((Material::Titanium, 0.9)));
        assert_eq!(r.entities.goal, Some((200.0, 150.0)));
        assert_eq!(r.entities.diameter_mm, Some((150.0, 0.9)));
        assert_eq!(r.entities.surface_roughness_um, Some(0.8));
    }

    #[test]
    fn english_goal_with_arrow() {
        let r = parse("steel 60 -> 50");
        assert_eq!(r.entities.goal, Some((60.0, 50.0)));
        let r = parse("steel from 60 to 50");
        assert_eq!(r.entities.goal, Some((60.0, 50.0)));
    }

    #[test]
    fn growing_pair_is_not_a_goal() {
        let r = parse("steel 45 - 50");
        assert_eq!(r.entities.goal, None);
        assert_eq!(r.entities.diameter_mm, Some((45.0, 0.8)));
    }

    #[test]
    fn roughness_number_is_not_a_diameter() {
        let r = parse("steel Ra 0.8");
        assert_eq!(r.entities.surface_roughness_um, Some(0.8));
        assert_eq!(r.entities.diameter_mm, None);
    }

    #[test]
    fn length_is_separate_from_diameter() {
        let r = parse("steel diameter 50 length 120");
        assert_eq!(r.entities.diameter_mm, Some((50.0, 0.8)));
        assert_eq!(r.entities.length_mm, Some(120.0));
    }

    #[test]
    fn stainless_wins_over_steel() {
        let r = parse("нержавеющая сталь токарка 75");
        assert_eq!(r.entities.material, Some((Material::StainlessSteel, 0.9)));
        assert_eq!(r.entities.operation, Some((Operation::Turning, 0.9)));
    }

    #[test]
    fn semi_finishing_is_not_double_counted() {
        let r = parse("semi-finishing pass");
        assert_eq!(r.entities.modes, vec![CutMode::SemiFinishing]);
        let r = parse("фрезеровка стали 45 чистовая");
        assert_eq!(r.entities.modes, vec![CutMode::Finishing]);
    }

    #[test]
    fn insert_material_is_extracted() {
        let r = parse("I'll use a ceramic insert");
        assert_eq!(r.entities.insert, Some((InsertMaterial::Ceramic, 0.9)));
        assert!(r.entities.has_job_data());

        let r = parse("поставлю керамику");
        assert_eq!(r.entities.insert, Some((InsertMaterial::Ceramic, 0.9)));

        // "hss" only matches as a whole word.
        let r = parse("steel 45");
        assert_eq!(r.entities.insert, None);
    }

    #[test]
    fn correction_with_value() {
        let r = parse("нет, подача 0.3 слишком большая");
        assert_eq!(r.intent, Intent::Correction);
        let c = r.entities.correction.unwrap();
        assert_eq!(c.parameter, CorrectedParameter::Feed);
        assert_eq!(c.value, Some(0.3));
    }

    #[test]
    fn correction_in_english() {
        let r = parse("no, the feed is too high, make it 0.15");
        assert_eq!(r.intent, Intent::Correction);
        let c = r.entities.correction.unwrap();
        assert_eq!(c.parameter, CorrectedParameter::Feed);
        assert_eq!(c.value, Some(0.15));
    }

    #[test]
    fn intents_in_priority_order() {
        assert!(matches!(parse("/help").intent, Intent::Command(c) if c == "help"));
        assert_eq!(parse("а что по скорости?").intent, Intent::Question);
        assert_eq!(parse("что дальше").intent, Intent::Feedback);
        assert_eq!(parse("да, верно").intent, Intent::Affirmation);
        assert_eq!(parse("steel 45").intent, Intent::ProvideData);
    }

    #[test]
    fn affirmation_keywords_do_not_fire_inside_words() {
        // "подача" contains "да"; anchored patterns must not see it.
        assert_eq!(parse("подача 0.2").intent, Intent::ProvideData);
    }

    #[test]
    fn bare_number_detection() {
        let p = IntentParser::new();
        assert_eq!(p.bare_number("1200"), Some(1200.0));
        assert_eq!(p.bare_number(" 950,5 "), Some(950.5));
        assert_eq!(p.bare_number("1200 rpm"), Some(1200.0));
        assert_eq!(p.bare_number("set 1200"), None);
    }

    #[test]
    fn comma_decimals_parse() {
        let r = parse("сталь 52,5");
        assert_eq!(r.entities.diameter_mm, Some((52.5, 0.8)));
    }
}
