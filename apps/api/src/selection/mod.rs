// Content selection: LLM-driven subset selection, constraint validation, and
// the single-pass pipeline that ties them to the renderer.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod json_scan;
pub mod orchestrator;
pub mod prompts;
pub mod selector;
pub mod validator;
