use super::outcome::{ClarificationQuestion, QuestionTopic};
use crate::docs::{DocProblem, DocumentationModel, Topic};
use crate::issue::IssueModel;

fn why_unknown(documentation: &DocumentationModel, topic: Topic) -> String {
    let what = match topic {
        Topic::PiiMasking => "PII masking",
        Topic::UploadValidation => "upload validation",
        Topic::CentralizedLogging => "centralized logging",
    };
    let path = documentation.topic_document(topic);
    match documentation.topic_problem(topic) {
        Some(DocProblem::Malformed { message }) => {
            format!("{} exists but {}.", path.display(), message)
        }
        _ => format!("I didn't find {what} docs at {}.", path.display()),
    }
}

/// Questions to ask before planning, in asking order.
///
/// Topics with a usable policy never produce a question.
pub fn derive_questions(
    issue: &IssueModel,
    documentation: &DocumentationModel,
) -> Vec<ClarificationQuestion> {
    let mut questions = Vec::new();

    if issue.number.is_none() {
        questions.push(ClarificationQuestion {
            topic: QuestionTopic::IssueNumber,
            text: "What's the issue number for branch naming?".to_string(),
        });
    }

    if issue.has_pii && documentation.topic(Topic::PiiMasking).is_none() {
        questions.push(ClarificationQuestion {
            topic: QuestionTopic::Pii,
            text: format!(
                "How should PII be handled? {}",
                why_unknown(documentation, Topic::PiiMasking)
            ),
        });
    }

    if issue.mentions_upload && documentation.topic(Topic::UploadValidation).is_none() {
        questions.push(ClarificationQuestion {
            topic: QuestionTopic::Upload,
            text: format!(
                "Should uploaded files be validated? {}",
                why_unknown(documentation, Topic::UploadValidation)
            ),
        });
    }

    if documentation.topic(Topic::CentralizedLogging).is_none() {
        questions.push(ClarificationQuestion {
            topic: QuestionTopic::Logging,
            text: format!(
                "What logging system should I use? {}",
                why_unknown(documentation, Topic::CentralizedLogging)
            ),
        });
    }

    questions
}
