//! Prompt text for job classification.

use openai_client::truncate_to_char_boundary;

use super::taxonomy::JobTitle;

/// Descriptions past this many bytes are cut before prompting.
pub const MAX_DESCRIPTION_BYTES: usize = 20_000;

pub const JOB_CLASSIFICATION_PROMPT: &str = r#"
You are a technology and AI skills taxonomist who classifies job postings.

## Your Job

- Map the messy posting title onto the fixed taxonomy of data, AI, and software roles.
- List the skills explicitly mentioned in the description: technologies, tools,
  frameworks, and programming languages.
- Describe what the company does. Write your own description if the posting has none.
- State your confidence, between 0 and 1, that the company description is accurate.

## Rules

- Fill every field of the structured output.
- Do NOT infer skills that are not stated.
- The skills list may only be empty when the description mentions no skills at all.
- Postings may be in English, Dutch, or French. Answer in English.
- Use "unknown" for the role or seniority when nothing in the posting supports a choice.

## Procedure

1. Decide the canonical role and seniority from the title; use the description only to resolve ambiguity.
2. Scan skill-heavy sections first: requirements, qualifications, must-haves, tech stack, nice-to-haves.
3. Scan the rest of the description for further explicit tools and technologies.
4. Produce the structured output.
"#;

/// System prompt with the role list appended, so the model sees the labels
/// even when it skims the schema.
pub fn system_prompt() -> String {
    let roles: Vec<&str> = JobTitle::ALL
        .iter()
        .filter(|t| **t != JobTitle::Unknown)
        .map(|t| t.as_str())
        .collect();

    format!(
        "{}\n## Canonical Roles\n\n{}\n",
        JOB_CLASSIFICATION_PROMPT.trim_start(),
        roles.join(", ")
    )
}

/// User prompt wrapping one posting in tagged sections.
pub fn build_user_prompt(company: Option<&str>, title: Option<&str>, description: Option<&str>) -> String {
    let description = truncate_to_char_boundary(description.unwrap_or_default(), MAX_DESCRIPTION_BYTES);

    format!(
        "<COMPANY>\n{}\n</COMPANY>\n\n<TITLE>\n{}\n</TITLE>\n\n<DESCRIPTION>\n{}\n</DESCRIPTION>",
        company.unwrap_or("unknown").trim(),
        title.unwrap_or_default().trim(),
        description.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_wraps_each_section() {
        let prompt = build_user_prompt(
            Some("Acme Analytics"),
            Some("Senior Data Engineer (m/f/x) - Remote"),
            Some("We use Spark, dbt and Airflow."),
        );

        assert!(prompt.starts_with("<COMPANY>\nAcme Analytics\n</COMPANY>"));
        assert!(prompt.contains("<TITLE>\nSenior Data Engineer (m/f/x) - Remote\n</TITLE>"));
        assert!(prompt.ends_with("<DESCRIPTION>\nWe use Spark, dbt and Airflow.\n</DESCRIPTION>"));
    }

    #[test]
    fn missing_fields_do_not_break_the_prompt() {
        let prompt = build_user_prompt(None, None, None);

        assert!(prompt.contains("<COMPANY>\nunknown\n</COMPANY>"));
        assert!(prompt.contains("<TITLE>\n\n</TITLE>"));
        assert!(prompt.contains("<DESCRIPTION>\n\n</DESCRIPTION>"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "é".repeat(MAX_DESCRIPTION_BYTES);
        let prompt = build_user_prompt(Some("Acme"), Some("Engineer"), Some(&long));

        assert!(prompt.len() < long.len());
    }

    #[test]
    fn system_prompt_lists_roles_but_not_unknown() {
        let prompt = system_prompt();

        assert!(prompt.contains("machine learning engineer"));
        assert!(prompt.contains("security engineer"));
        assert!(!prompt.contains("Canonical Roles\n\nunknown"));
        assert!(!prompt.ends_with("unknown\n"));
    }
}
