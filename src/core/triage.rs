//! Triage Classifier
//!
//! Information Hiding:
//! - How a reply is judged to be a triage outcome is hidden behind `Classifier`
//! - The default keyword matcher can be swapped for a structured-output
//!   contract without touching the save workflow

use serde::{Deserialize, Serialize};

/// Keywords that mark a reply as a triage outcome.
pub const DEFAULT_KEYWORDS: [&str; 7] = ["고위험", "중간", "낮음", "즉시", "병원", "탈수", "응급"];

/// Marker of an emergency contact link in a reply.
pub const CALL_LINK_MARKER: &str = "tel:";

const HEADLINE: &str = "집에서 경과 관찰해도 괜찮아요";
const URGENCY_ICON: &str = "✅";
const PLACEHOLDER_CAUSES: [&str; 3] = ["감기", "스트레스", "소화불량"];
const EMERGENCY_ACTION: &str = "증상이 악화되면 즉시 병원 방문!";
const HOSPITAL_CALL_LINK: &str = "tel:+821012345678";
const HOSPITAL_CALL_LABEL: &str = "24시 동물병원 전화걸기";

/// What caused a reply to be classified as a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Trigger {
    Keyword(String),
    CallLink,
}

/// Emergency contact shown on cards triggered by a call link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLink {
    pub href: String,
    pub label: String,
}

/// Display payload attached to every result-classified reply.
///
/// The causes and emergency action are fixed placeholders; they are not
/// derived from the reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageCard {
    pub trigger: Trigger,
    pub headline: String,
    pub urgency_icon: String,
    pub causes: Vec<String>,
    pub emergency_action: String,
    pub call_link: Option<CallLink>,
}

impl TriageCard {
    pub fn placeholder(trigger: Trigger) -> Self {
        let call_link = match trigger {
            Trigger::CallLink => Some(CallLink {
                href: HOSPITAL_CALL_LINK.to_string(),
                label: HOSPITAL_CALL_LABEL.to_string(),
            }),
            Trigger::Keyword(_) => None,
        };

        Self {
            trigger,
            headline: HEADLINE.to_string(),
            urgency_icon: URGENCY_ICON.to_string(),
            causes: PLACEHOLDER_CAUSES.iter().map(|c| c.to_string()).collect(),
            emergency_action: EMERGENCY_ACTION.to_string(),
            call_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Plain,
    Result(TriageCard),
}

impl Classification {
    pub fn is_result(&self) -> bool {
        matches!(self, Classification::Result(_))
    }

    pub fn card(&self) -> Option<&TriageCard> {
        match self {
            Classification::Result(card) => Some(card),
            Classification::Plain => None,
        }
    }
}

/// Decides whether a model reply is a triage outcome or ordinary chat.
pub trait Classifier: Send + Sync {
    fn classify(&self, reply: &str) -> Classification;
}

/// Raw substring matcher over the reply text.
///
/// Matching is case- and form-sensitive, so incidental uses of a keyword
/// also count as results.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, reply: &str) -> Classification {
        if let Some(keyword) = self.keywords.iter().find(|k| reply.contains(k.as_str())) {
            tracing::debug!("[Triage] Keyword '{}' matched", keyword);
            return Classification::Result(TriageCard::placeholder(Trigger::Keyword(
                keyword.clone(),
            )));
        }

        if reply.contains(CALL_LINK_MARKER) {
            tracing::debug!("[Triage] Call link matched");
            return Classification::Result(TriageCard::placeholder(Trigger::CallLink));
        }

        Classification::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hospital_reply_is_result() {
        let classifier = KeywordClassifier::default();
        let result = classifier.classify("증상이 심해지면 병원으로 가세요");

        assert!(result.is_result());
        let card = result.card().unwrap();
        assert_eq!(card.trigger, Trigger::Keyword("병원".to_string()));
        assert_eq!(card.call_link, None);
    }

    #[test]
    fn test_small_talk_is_plain() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("오늘 날씨가 좋네요"), Classification::Plain);
    }

    #[test]
    fn test_call_link_only_reply() {
        let classifier = KeywordClassifier::default();
        let result = classifier.classify("여기로 연락하세요: tel:+8212345678");

        let card = result.card().unwrap();
        assert_eq!(card.trigger, Trigger::CallLink);
        assert_eq!(card.call_link.as_ref().unwrap().href, "tel:+821012345678");
    }

    #[test]
    fn test_keyword_wins_over_call_link() {
        let classifier = KeywordClassifier::default();
        let result = classifier.classify("응급 상황이면 tel:119 로 연락하세요");

        let card = result.card().unwrap();
        assert_eq!(card.trigger, Trigger::Keyword("응급".to_string()));
        assert!(card.call_link.is_none());
    }

    #[test]
    fn test_incidental_keyword_is_a_false_positive() {
        let classifier = KeywordClassifier::default();
        // "중간" inside an unrelated sentence still triggers a result.
        assert!(classifier.classify("산책 중간에 물을 주세요").is_result());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("TEL:123"), Classification::Plain);
    }

    #[test]
    fn test_cards_are_identical_placeholders() {
        let classifier = KeywordClassifier::default();
        let a = classifier.classify("탈수가 의심됩니다").card().cloned().unwrap();
        let b = classifier.classify("즉시 오세요").card().cloned().unwrap();

        assert_eq!(a.causes, vec!["감기", "스트레스", "소화불량"]);
        assert_eq!(a.causes, b.causes);
        assert_eq!(a.emergency_action, b.emergency_action);
        assert_eq!(a.headline, b.headline);
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = KeywordClassifier::new(vec!["vet".to_string()]);
        assert!(classifier.classify("see a vet").is_result());
        assert!(!classifier.classify("병원").is_result());
    }
}
