use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// What to ask the model to do with the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Collapse the items into canonical labels, each mapping to the items it stands for.
    #[default]
    SemanticMatch,
    /// Sort the items into a fixed number of meta categories.
    MetaLabel,
}

impl Task {
    pub const ALL: [Task; 2] = [Task::SemanticMatch, Task::MetaLabel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::SemanticMatch => "semantic_match",
            Task::MetaLabel => "meta_label",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| InvalidArgument::new(
                "task",
                s,
                "either 'semantic_match' or 'meta_label'",
            ))
    }
}

/// Error when an argument is out of its allowed values. Always raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    pub argument: String,
    pub value: String,
    pub expected: String,
}

impl InvalidArgument {
    pub(crate) fn new(argument: impl Into<String>, value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "InvalidArgument: {} must be {}. Invalid {}: {}",
               self.argument,
               self.expected,
               self.argument,
               self.value)
    }
}

impl Error for InvalidArgument {}

#[cfg(test)]
mod test_task {
    use super::Task;

    #[test]
    fn test_parse() {
        assert_eq!(Task::SemanticMatch, "semantic_match".parse::<Task>().unwrap());
        assert_eq!(Task::MetaLabel, "meta_label".parse::<Task>().unwrap());
        assert_eq!(Task::SemanticMatch, Task::default());

        let err = "Meta_Label".parse::<Task>().expect_err("names are case sensitive");
        assert_eq!("task", err.argument);
        assert_eq!("Meta_Label", err.value);
        assert!(err.to_string().contains("Invalid task: Meta_Label"));
    }

    #[test]
    fn test_names_round_trip() {
        for task in Task::ALL {
            assert_eq!(task, task.to_string().parse::<Task>().unwrap());
            assert_eq!(format!("\"{}\"", task), serde_json::to_string(&task).unwrap());
        }
    }
}
