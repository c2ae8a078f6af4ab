use super::{FindingDraft, Matcher, Rule, RuleUnit};
use crate::core::{FindingKind, Severity};
use crate::docs::{Topic, TopicConfig};

/// "The file uses capability X, so it must mention X's documented helper."
#[derive(Debug, Clone)]
pub struct UsageRule {
    pub topic: Topic,
    pub signal: Matcher,
    pub required_symbol: String,
}

impl UsageRule {
    fn observation(&self, file: &str) -> String {
        let symbol = &self.required_symbol;
        match self.topic {
            Topic::PiiMasking => format!("{file} handles PII but doesn't import {symbol}"),
            Topic::UploadValidation => format!("{file} handles files but doesn't call {symbol}"),
            Topic::CentralizedLogging => {
                format!("{file} uses print/basic logging instead of {symbol}")
            }
        }
    }
}

impl Rule for UsageRule {
    fn id(&self) -> &str {
        self.topic.usage_rule_id()
    }

    fn evaluate(&self, unit: &RuleUnit<'_>) -> Option<FindingDraft> {
        let RuleUnit::Document { path, text } = unit else {
            return None;
        };

        if !self.signal.is_match(text) || text.contains(self.required_symbol.as_str()) {
            return None;
        }

        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Some(FindingDraft {
            rule: self.id().to_string(),
            kind: FindingKind::Documentation,
            severity: Severity::High,
            description: self.observation(&file),
        })
    }
}

/// Usage signals per topic.
///
/// These are deliberately coarse: any mention of a personal-data word counts
/// as handling personal data.
pub fn usage_signal(topic: Topic) -> Matcher {
    match topic {
        Topic::PiiMasking => Matcher::any_of_ignore_case(["email", "phone", "ssn", "personal"]),
        Topic::UploadValidation => Matcher::any_of(["FileField", "ImageField", "request.FILES"]),
        Topic::CentralizedLogging => Matcher::any_of(["print(", "logging.info"]),
    }
}

pub fn usage_rule_for(topic: Topic, config: &TopicConfig) -> UsageRule {
    UsageRule {
        topic,
        signal: usage_signal(topic),
        required_symbol: config.required_symbol.clone(),
    }
}
