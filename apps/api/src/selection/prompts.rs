// All LLM prompt constants for content selection.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for content selection.
pub const SELECTION_SYSTEM: &str = "You are an expert resume writer and ATS optimization \
    specialist. You select the most relevant existing content from a candidate's resume \
    for a specific job description. You never write new content.";

/// Content selection prompt template.
/// Replace: {json_only_instruction}, {verbatim_instruction}, {constraint_rules},
///          {mandatory_rules}, {request_json}, {job_description}
pub const SELECTION_PROMPT_TEMPLATE: &str = r#"{json_only_instruction}

{verbatim_instruction}

Select the content from RESUME CONTENT that best matches the JOB DESCRIPTION.
Prioritize experience bullets over projects when space is limited and keep the
original order of companies and bullets.

SELECTION CONSTRAINTS (hard limits: never go below a minimum or above a maximum):
{constraint_rules}

MANDATORY ITEMS (must appear in your output, no exceptions):
{mandatory_rules}

REQUEST (resume content and constraints as JSON):
{request_json}

Return ONLY a JSON object with this EXACT structure:
{
  "summaries": {"<summary_key>": "<summary text>"},
  "companies": [
    {"id": "<company id>", "bullets": [{"text": "<exact bullet text>"}]}
  ],
  "skills": {"<category>": ["<exact skill>"]},
  "projects": [{"id": "<project id>"}]
}

HARD RULES:
1. `summaries` must contain exactly ONE entry whose key is one of the summary keys provided
2. Use company ids and project ids exactly as provided
3. Skills keys are category names only: never the "_mandatory" keys
4. Copy bullet text character-for-character

JOB DESCRIPTION:
{job_description}"#;
