use semantic_meta::categorizer::{Categorizer, Task};
use semantic_meta::utils::llm::openai::OpenAIChat;

const COLUMNS: [&[&str]; 2] = [
    &["apple", "Banana", "granny smith", "carrot"],
    &["bananas", "Apples", "baby carrots", "broccoli"],
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let items: Vec<Vec<&str>> = COLUMNS.iter().map(|column| column.to_vec()).collect();
    let categorizer: Categorizer<OpenAIChat> = Categorizer::default();

    let labels = categorizer.categorize(&items, None, Task::SemanticMatch).await?;
    println!("Semantic match:\n{}", serde_json::to_string_pretty(&labels)?);

    let groups = categorizer.categorize(&items, Some(2), Task::MetaLabel).await?;
    println!("Meta labels:\n{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
