pub mod assessment_prompt;
pub mod prompts;
