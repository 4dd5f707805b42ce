//! Prompt assembly for catalog-grounded questions.

use crate::catalog::CatalogRow;
use crate::types::Message;

/// Fixed instruction sent as the system message.
pub const SYSTEM_PROMPT: &str = "You are a helpful retail product assistant. Use the provided catalog rows to answer \
questions. If the question is unrelated to the catalog, politely steer the user back to the products. \
Respond concisely with product names and details when relevant.";

/// Format one catalog row as a context line.
pub fn format_row(row: &CatalogRow) -> String {
    format!(
        "- {} (ID {}): {} [Category: {}, Price: ${}]",
        row.name(),
        row.product_id(),
        row.description(),
        row.category(),
        row.price()
    )
}

/// Build the two-message prompt: system instruction, then catalog context
/// followed by the user's question verbatim.
pub fn build_prompt(rows: &[&CatalogRow], user_message: &str) -> Vec<Message> {
    let entries = rows
        .iter()
        .map(|row| format_row(row))
        .collect::<Vec<_>>()
        .join("\n");

    let user_content = format!(
        "Catalog context:\nRelevant catalog entries:\n{entries}\n\nUser question: {user_message}"
    );

    vec![Message::system(SYSTEM_PROMPT), Message::user(user_content)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::Role;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::parse(
            "product_id,name,description,category,price\n\
             1,Backpack,Water-resistant daypack,Outdoors,49.99\n\
             2,Tent,Two-person dome tent,Outdoors,129.00\n",
        )
        .unwrap()
    }

    #[test]
    fn test_format_row() {
        let catalog = catalog();
        assert_eq!(
            format_row(&catalog.rows()[0]),
            "- Backpack (ID 1): Water-resistant daypack [Category: Outdoors, Price: $49.99]"
        );
    }

    #[test]
    fn test_build_prompt_structure() {
        let catalog = catalog();
        let rows = catalog.head(4);
        let messages = build_prompt(&rows, "Any backpacks?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Catalog context:\nRelevant catalog entries:\n\
             - Backpack (ID 1): Water-resistant daypack [Category: Outdoors, Price: $49.99]\n\
             - Tent (ID 2): Two-person dome tent [Category: Outdoors, Price: $129.00]\n\n\
             User question: Any backpacks?"
        );
    }

    #[test]
    fn test_build_prompt_without_rows() {
        let messages = build_prompt(&[], "hello");
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.ends_with("hello"));
    }

    #[test]
    fn test_user_message_kept_verbatim() {
        let catalog = catalog();
        let rows = catalog.head(1);
        let question = "  What's <b>cheap</b>? \"really\" ";
        let messages = build_prompt(&rows, question);
        assert!(messages[1].content.ends_with(question));
    }

    #[test]
    fn test_system_prompt_mentions_catalog_and_redirect() {
        assert!(SYSTEM_PROMPT.contains("retail product assistant"));
        assert!(SYSTEM_PROMPT.contains("catalog rows"));
        assert!(SYSTEM_PROMPT.contains("steer the user back"));
        assert!(SYSTEM_PROMPT.contains("concisely"));
    }
}
