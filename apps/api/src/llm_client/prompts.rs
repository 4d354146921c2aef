// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction against rewriting source content.
pub const VERBATIM_INSTRUCTION: &str = "\
    CRITICAL: Do NOT paraphrase, shorten, or rewrite any content. \
    Every bullet, skill, and project you return must be copied EXACTLY \
    from the resume content provided. Never invent new items.";

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so user-authored text that happens
/// to contain `{name}` is inserted verbatim. Braces that do not form a known
/// placeholder (JSON examples in a template) are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let placeholder = values.iter().find(|(name, _)| {
            tail.strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
