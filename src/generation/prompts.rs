//! Fixed instructional prompts and the JSON schemas they embed.
//!
//! Both prompts follow the same contract: the model must answer with raw JSON
//! matching the inlined schema, no commentary, bounded output, deterministic-
//! leaning sampling. A "```" stop sequence cuts off markdown fencing.

use serde_json::json;

use crate::generation::client::GenerationRequest;
use crate::storage::types::Kau;

fn kau_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "category": { "type": "string" },
                "description": { "type": "string" }
            },
            "required": ["category", "description"]
        }
    })
}

fn feedback_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "highlights": { "type": "string" },
            "missingPoints": { "type": "string" },
            "reflectiveQuestions": { "type": "string" },
            "prescriptiveSuggestions": { "type": "string" }
        },
        "required": ["highlights", "missingPoints", "reflectiveQuestions", "prescriptiveSuggestions"]
    })
}

/// Prompt asking for 5-10 suggested KAUs for a lecture document.
pub fn kau_request(document_text: &str) -> GenerationRequest {
    let prompt = format!(
        "Return ONLY valid JSON that matches this JSON Schema. Do not include any commentary.\n\
Schema:\n{}\n\
Task: Analyze this lecture document/slides and extract 5-10 Key Areas of Understanding (KAU). \
Focus on pedagogical goals: Cover Bloom's Taxonomy levels (remember, understand, apply, analyze, evaluate, create). \
For each KAU, use a categorical tag like \"Knowledge: Topic Name\" and describe the learning objective or skill.\n\
Input:\n{}",
        kau_schema(),
        document_text
    );
    GenerationRequest {
        prompt,
        temperature: 0.3,
        max_output_tokens: 1024,
        stop_sequences: vec!["```".into()],
    }
}

/// Prompt asking for four-field feedback on a submission, graded against the
/// session's finalized KAUs.
pub fn feedback_request(kaus: &[Kau], submission_text: &str) -> GenerationRequest {
    let kau_list = kaus
        .iter()
        .map(|k| format!("{}: {}", k.category, k.description))
        .collect::<Vec<_>>()
        .join("\n");
    let prompt = format!(
        "Return ONLY valid JSON that matches this JSON Schema. Do not include any commentary.\n\
Schema:\n{}\n\
Task: Evaluate the student's assignment submission pedagogically against these Key Areas of Understanding (KAUs). \
Use Bloom's Taxonomy to frame feedback. Provide in exactly 4 sections:\n\n\
- highlights: Encouraging bullet points of strengths (e.g., application of knowledge).\n\
- missingPoints: Constructive bullet points of gaps (e.g., needs deeper analysis).\n\
- reflectiveQuestions: Socratic questions or hints to prompt self-reflection (e.g., \"What would happen if...?\").\n\
- prescriptiveSuggestions: Teacher strategies to remedy class gaps, like differentiated instruction or active learning activities.\n\n\
KAUs:\n{}\n\n\
Student Submission:\n{}\n\n\
Separate bullet points with semicolons; ensure empathetic, growth-oriented tone.",
        feedback_schema(),
        kau_list,
        submission_text
    );
    GenerationRequest {
        prompt,
        temperature: 0.3,
        max_output_tokens: 2048,
        stop_sequences: vec!["```".into()],
    }
}
