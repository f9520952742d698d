/// Wrap the user's topic in instructions describing the expected JSON.
pub fn build_prompt(topic: &str) -> String {
    let topic = topic.trim();
    format!(
        r#"Design a professional form for: {topic}

Use only these question types:
- "short": brief free text such as names or IDs
- "paragraph": longer free text such as addresses or descriptions
- "multiple": pick exactly one option
- "checkbox": pick any number of options
- "dropdown": pick one option from a list

Rules:
- Write 5 to 8 questions that are directly relevant to the topic, in a logical order.
- Mark essential questions with "required": true.
- Every "multiple", "checkbox" and "dropdown" question needs 2 to 5 specific, meaningful options.
- Never use empty or generic options such as "Option 1".

Reply with a single JSON object in exactly this shape and nothing else:
{{
  "title": "A clear title for the form",
  "description": "What the form is for and any instructions",
  "questions": [
    {{
      "id": "q1",
      "type": "short",
      "question": "Question text",
      "required": true,
      "options": []
    }}
  ]
}}"#
    )
}
