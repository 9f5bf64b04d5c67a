//! Prompt composition and source extraction

use crate::corpus::CleanedRecord;

const DOCUMENT_SEPARATOR: &str = "=========";

const QUESTION_TEMPLATE: &str = r#"Given the following extracted parts of a help center data and a question, create a final answer with the Help Center link as source ("SOURCE").
If you don't know the answer, just say that you don't know. Don't try to make up an answer.
ALWAYS return a "SOURCE" part in your answer. YOU CAN RETURN MULTIPLE 'SOURCES' relevant to the question asked.

NOTE: GIVE A FINAL ANSWER BASED ON THE QUESTION ASKED AND THE DOCUMENTS PROVIDED BELOW. ENSURE YOUR ANSWER IS INFORMATIVE AND CAN SOLVE THE QUESTION ASKED. YOU CAN PROVIDE MORE THAN ONE RELEVANT SOURCE IF AVAILABLE.
End your answer with a line of the form:
SOURCE: <help center link> <help center link> ...

QUESTION: {question}
=========
{summaries}
FINAL ANSWER:"#;

/// Renders one retrieved record the way the model sees it
pub fn format_document(record: &CleanedRecord) -> String {
    format!(
        "Title: {}\npage_content: {}\nHelp Center link: {}\n{}",
        record.title, record.page_content, record.urls, DOCUMENT_SEPARATOR
    )
}

/// Builds the full prompt from the question and the retrieved records
pub fn build_prompt(question: &str, records: &[CleanedRecord]) -> String {
    let summaries = records
        .iter()
        .map(format_document)
        .collect::<Vec<_>>()
        .join("\n");

    QUESTION_TEMPLATE
        .replace("{question}", question.trim())
        .replace("{summaries}", &summaries)
}

/// Splits a model response into the answer and its cited links
///
/// The answer is everything before the last `SOURCE:` or `SOURCES:` marker
/// (case-insensitive); links after it are returned deduplicated, in order.
/// A response without a marker is all answer.
///
/// # Example
///
/// ```
/// use helphub::rag::split_sources;
///
/// let (answer, sources) = split_sources(
///     "Bounties pay more.\nSOURCE: https://x.com/hc/articles/1, https://x.com/hc/articles/2",
/// );
/// assert_eq!(answer, "Bounties pay more.");
/// assert_eq!(sources.len(), 2);
/// ```
pub fn split_sources(response: &str) -> (String, Vec<String>) {
    let upper = response.to_ascii_uppercase();

    let marker = ["SOURCES:", "SOURCE:"]
        .iter()
        .filter_map(|m| upper.rfind(m).map(|pos| (pos, m.len())))
        .max_by_key(|(pos, _)| *pos);

    let Some((pos, len)) = marker else {
        return (response.trim().to_string(), Vec::new());
    };

    let answer = response[..pos].trim().to_string();
    let mut sources: Vec<String> = Vec::new();

    for token in response[pos + len..].split(|c: char| c.is_whitespace() || c == ',') {
        let link = token.trim_matches(|c: char| matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | '"' | '\''));
        let link = link.trim_end_matches(['.', ';']);

        if (link.starts_with("http://") || link.starts_with("https://"))
            && !sources.iter().any(|s| s == link)
        {
            sources.push(link.to_string());
        }
    }

    (answer, sources)
}
