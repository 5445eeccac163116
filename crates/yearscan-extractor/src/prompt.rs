//! LLM prompt for year extraction

/// Builds the prompt that asks the model for the most recent year in a text
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for one record's text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.text.len() + 64);

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text.trim());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "Look for possible timestamps or dates in the following text \
and output only their year (YYYY). If there are several matches, output only the most recent year. \
Valid years are between 1900 and 2100.";

const OUTPUT_FORMAT_REMINDER: &str = "Answer format: Year: YYYY";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Flächenberechnung von 1975").build();
        assert!(prompt.contains("Flächenberechnung von 1975"));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let prompt = PromptBuilder::new("x").build();
        assert!(prompt.contains("most recent year"));
        assert!(prompt.contains("between 1900 and 2100"));
        assert!(prompt.ends_with("Answer format: Year: YYYY"));
    }

    #[test]
    fn test_text_is_delimited() {
        let prompt = PromptBuilder::new("  padded text \n").build();
        assert!(prompt.contains("---\npadded text\n---"));
    }
}
