//! Prompt templates of the categorization tasks.

use anyhow::Result;
use lazy_static::lazy_static;
use crate::categorizer::task::{InvalidArgument, Task};
use crate::filler::ValueFiller;
use crate::prompt::PromptTemplate;
use crate::prompt::chat::{ChatMessage, ChatPromptTemplate, Role};

/// Placeholder of the items, in the human message.
pub const DATA_PLACEHOLDER: &str = "data";
/// Placeholder of the category count, in the meta-label system message.
pub const NUMBER_PLACEHOLDER: &str = "number";

const SEMANTIC_MATCH_SYSTEM_TEMPLATE: &str = r#"You are a data categorizer. You will be given a 2D array and create a new 1D array.
The new array will contain values which best semantically match one value from all the prior arrays.
The new values do not necessarily have to be present in any of the arrays.
The new values should be the most common way to refer to the values it is trying to represent.
Return a json with the new values as the keys and all the array values it maps to as the values."#;

const META_LABEL_SYSTEM_TEMPLATE: &str = r#"You will be provided a list and will sort them into {{number}} meta categories based on semantics.
Return each category as a json."#;

const HUMAN_TEMPLATE: &str = "{{data}}";

lazy_static! {
    static ref SEMANTIC_MATCH_CHAT_TEMPLATE: ChatPromptTemplate = ChatPromptTemplate::from_messages([
        (Role::System, PromptTemplate::literal(SEMANTIC_MATCH_SYSTEM_TEMPLATE)),
        (Role::Human, PromptTemplate::new(HUMAN_TEMPLATE)),
    ]);

    static ref META_LABEL_CHAT_TEMPLATE: ChatPromptTemplate = ChatPromptTemplate::from_messages([
        (Role::System, PromptTemplate::new(META_LABEL_SYSTEM_TEMPLATE)),
        (Role::Human, PromptTemplate::new(HUMAN_TEMPLATE)),
    ]);
}

/// The chat template of a task.
pub fn chat_template(task: Task) -> &'static ChatPromptTemplate {
    match task {
        Task::SemanticMatch => &*SEMANTIC_MATCH_CHAT_TEMPLATE,
        Task::MetaLabel => &*META_LABEL_CHAT_TEMPLATE,
    }
}

/// Render the items as they are sent to the model: a JSON array of arrays of strings, in the given order.
pub fn render_items<T: AsRef<str>>(items: &[Vec<T>]) -> Result<String> {
    let items: Vec<Vec<&str>> = items
        .iter()
        .map(|row| row.iter().map(|value| value.as_ref()).collect())
        .collect();
    Ok(serde_json::to_string(&items)?)
}

/// The filler of a task. The category count is only provided for [Task::MetaLabel].
pub fn task_filler<T: AsRef<str>>(task: Task, category_count: usize, items: &[Vec<T>]) -> Result<ValueFiller> {
    let filler = ValueFiller::new().with(DATA_PLACEHOLDER, render_items(items)?);
    let filler = match task {
        Task::SemanticMatch => filler,
        Task::MetaLabel => filler.with(NUMBER_PLACEHOLDER, category_count.to_string()),
    };
    Ok(filler)
}

/// Build the system and human messages of a task.
///
/// Fails with [InvalidArgument] if the task is [Task::MetaLabel] and the category count is zero.
///
/// ```
/// use semantic_meta::categorizer::Task;
/// use semantic_meta::categorizer::templates::build_messages;
/// use semantic_meta::prompt::chat::Role;
///
/// let messages = build_messages(Task::MetaLabel, 2, &[vec!["cat", "dog", "car", "truck"]]).unwrap();
/// assert_eq!(Role::System, messages[0].role);
/// assert!(messages[0].content.contains("into 2 meta categories"));
/// assert_eq!(r#"[["cat","dog","car","truck"]]"#, messages[1].content);
/// ```
pub fn build_messages<T: AsRef<str>>(task: Task, category_count: usize, items: &[Vec<T>]) -> Result<Vec<ChatMessage>> {
    if task == Task::MetaLabel && category_count == 0 {
        return Err(InvalidArgument::new("category_count", "0", "a positive integer").into());
    }
    let filler = task_filler(task, category_count, items)?;
    let messages = chat_template(task)
        .construct_prompt()
        .fill_with(&filler)?
        .complete()?;
    Ok(messages)
}

#[cfg(test)]
mod test_templates {
    use crate::categorizer::task::{InvalidArgument, Task};
    use crate::prompt::chat::Role;
    use super::{build_messages, chat_template, render_items, NUMBER_PLACEHOLDER};

    const ITEMS: [&str; 4] = ["cat", "dog", "car", "truck"];

    fn items() -> Vec<Vec<&'static str>> {
        vec![ITEMS.to_vec()]
    }

    #[test]
    fn test_only_meta_label_has_number() {
        assert!(!chat_template(Task::SemanticMatch).placeholders().contains(NUMBER_PLACEHOLDER));
        assert!(chat_template(Task::MetaLabel).placeholders().contains(NUMBER_PLACEHOLDER));
    }

    #[test]
    fn test_semantic_match_ignores_count() {
        let with_three = build_messages(Task::SemanticMatch, 3, &items()).unwrap();
        let with_seven = build_messages(Task::SemanticMatch, 7, &items()).unwrap();
        assert_eq!(with_three, with_seven);
        assert_eq!(Role::System, with_three[0].role);
        assert!(with_three[0].content.starts_with("You are a data categorizer."));
        assert!(!with_three[0].content.contains("{{"));
    }

    #[test]
    fn test_meta_label_interpolates_count() {
        let with_three = build_messages(Task::MetaLabel, 3, &items()).unwrap();
        let with_seven = build_messages(Task::MetaLabel, 7, &items()).unwrap();
        assert!(with_three[0].content.contains("sort them into 3 meta categories"));
        assert!(with_seven[0].content.contains("sort them into 7 meta categories"));
        assert_ne!(with_three[0].content, with_seven[0].content);
        assert_eq!(with_three[1], with_seven[1]);
    }

    #[test]
    fn test_human_payload_is_verbatim() {
        let messages = build_messages(Task::MetaLabel, 2, &items()).unwrap();
        assert_eq!(2, messages.len());
        assert_eq!(Role::Human, messages[1].role);
        assert_eq!(r#"[["cat","dog","car","truck"]]"#, messages[1].content);
        let decoded: Vec<Vec<String>> = serde_json::from_str(&messages[1].content).unwrap();
        assert_eq!(vec![ITEMS.iter().map(|s| s.to_string()).collect::<Vec<_>>()], decoded);
    }

    #[test]
    fn test_payload_keeps_braces_and_duplicates() {
        let items = vec![vec!["{{number}}", "b"], vec!["b", "Ünïcode \"quoted\""]];
        let messages = build_messages(Task::MetaLabel, 4, &items).unwrap();
        assert_eq!(render_items(&items).unwrap(), messages[1].content);
        assert!(messages[1].content.contains("{{number}}"));
    }

    #[test]
    fn test_empty_items_are_forwarded() {
        let items: Vec<Vec<String>> = vec![];
        let messages = build_messages(Task::SemanticMatch, 5, &items).unwrap();
        assert_eq!("[]", messages[1].content);
    }

    #[test]
    fn test_zero_categories() {
        let err = build_messages(Task::MetaLabel, 0, &items()).expect_err("zero categories is invalid");
        assert_eq!("category_count", err.downcast_ref::<InvalidArgument>().unwrap().argument);
        assert!(build_messages(Task::SemanticMatch, 0, &items()).is_ok());
    }
}
