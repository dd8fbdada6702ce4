//! Question synthesis from linguistic units.
//!
//! Maps an entity's category to a natural-language question template.
//! Categories without a template yield `None` and the entity is silently
//! skipped by the pipeline.

use crate::model::{Entity, EntityCategory};

/// Synthesize a question for an entity, or `None` when its category has no
/// template. No side effects.
pub fn question_for_entity(entity: &Entity) -> Option<String> {
    use EntityCategory::*;

    let question = match entity.category {
        Person | Organization | Group => format!("Who is {}?", entity.text),
        GeoPolitical | Location => format!("Where is {}?", entity.text),
        Date | Event | Time => format!("When did {} happen?", entity.text),
        Cardinal => format!("What is the significance of {}?", entity.text),
        Money => format!("How much is {}?", entity.text),
        Percent => format!("What is {} percentage?", entity.text),
        Quantity => format!("What is {} quantity?", entity.text),
        Ordinal => format!("What is the ordinal {}?", entity.text),
        Product | WorkOfArt | Law | Language | Facility => format!("What is {}?", entity.text),
        Other => return None,
    };
    Some(question)
}

/// Question template for a noun chunk.
pub fn question_for_chunk(text: &str) -> String {
    format!("What is {text}?")
}
