//! Prompt construction and response parsing for model-backed judgments

use super::{CaseDescription, Judgment, JudgmentError};
use crate::types::Protocol;

pub const SYSTEM_PROMPT: &str = "You are a strict senior infectious disease board examiner. \
You grade antibiotic prescriptions and answer with a single JSON object only.";

fn describe_protocol(drug_name: &str, protocol: &Protocol) -> String {
    format!(
        "- Drug: {}\n- Dose: {}mg\n- Interval: q{}h\n- Duration: {} days",
        drug_name, protocol.dose_units, protocol.interval_hours, protocol.duration_days
    )
}

/// User prompt for one case
pub fn build_prompt(case: &CaseDescription) -> String {
    format!(
        "Evaluate the prescription for this case.\n\n\
CASE\n\
- Diagnosis: {diagnosis}\n\
- Pathogen: {pathogen}\n\
- Clinical context: {context}\n\n\
GOLD STANDARD (reference only)\n\
{reference}\n\n\
PRESCRIPTION TO EVALUATE\n\
{prescribed}\n\n\
CRITERIA\n\
1. approved (boolean): true when the drug covers the pathogen and the dose is therapeutic. \
Valid alternatives pass even when they are not the first-line choice. \
False for resistant or wrong-spectrum drugs, clearly sub-therapeutic doses or dangerous overdoses.\n\
2. efficacyScore (0-100): 100 gold standard; 80-90 effective alternative or slight dosing deviation; \
50-70 suboptimal but effective; 0-40 ineffective, resistant or wrong spectrum.\n\
3. safetyScore (0-100): 100 safe; below 50 significant nephrotoxicity or overdose risk.\n\
4. title (string): a short verdict headline.\n\
5. reasoning (string): a concise clinical explanation that justifies the pass/fail decision.\n\n\
Respond with JSON only: \
{{\"approved\": bool, \"efficacyScore\": number, \"safetyScore\": number, \"title\": string, \"reasoning\": string}}",
        diagnosis = case.diagnosis,
        pathogen = case.pathogen,
        context = case.clinical_context,
        reference = describe_protocol(&case.reference_drug_name, &case.reference),
        prescribed = describe_protocol(&case.prescribed_drug_name, &case.prescribed),
    )
}

/// Remove a surrounding ```json fence if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model response into a validated judgment
pub fn parse_judgment(text: &str) -> Result<Judgment, JudgmentError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(JudgmentError::EmptyResponse);
    }
    let judgment: Judgment =
        serde_json::from_str(body).map_err(|err| JudgmentError::Malformed(err.to_string()))?;
    judgment.validate()?;
    Ok(judgment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case() -> CaseDescription {
        CaseDescription {
            diagnosis: "Gonococcal Urethritis".to_string(),
            pathogen: "Neisseria gonorrhoeae".to_string(),
            clinical_context: "Purulent urethral discharge".to_string(),
            reference_drug_name: "Ceftriaxone".to_string(),
            reference: Protocol::new("ceftriaxone", 500.0, 24.0, 1),
            prescribed_drug_name: "Ciprofloxacin".to_string(),
            prescribed: Protocol::new("cipro", 500.0, 12.0, 3),
            susceptible_to: vec!["ceftriaxone".to_string()],
        }
    }

    #[test]
    fn test_prompt_mentions_both_protocols() {
        let prompt = build_prompt(&case());
        assert!(prompt.contains("Diagnosis: Gonococcal Urethritis"));
        assert!(prompt.contains("- Drug: Ceftriaxone\n- Dose: 500mg\n- Interval: q24h\n- Duration: 1 days"));
        assert!(prompt.contains("- Drug: Ciprofloxacin"));
        assert!(prompt.contains("q12h"));
        assert!(prompt.contains("\"efficacyScore\": number"));
    }

    #[test]
    fn test_parse_plain_json() {
        let text = r#"{"approved": false, "efficacyScore": 10, "safetyScore": 95,
            "title": "Resistant Organism", "reasoning": "Widespread fluoroquinolone resistance."}"#;
        let judgment = parse_judgment(text).unwrap();
        assert!(!judgment.approved);
        assert_eq!(judgment.efficacy_score, 10.0);
        assert_eq!(judgment.title, "Resistant Organism");
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"approved\": true, \"efficacyScore\": 100, \"safetyScore\": 100, \"title\": \"Gold Standard\", \"reasoning\": \"IM ceftriaxone.\"}\n```";
        let judgment = parse_judgment(text).unwrap();
        assert!(judgment.approved);
        assert_eq!(judgment.title, "Gold Standard");
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let text = r#"{"approved": true, "efficacyScore": 100, "safetyScore": 100}"#;
        assert!(matches!(parse_judgment(text), Err(JudgmentError::Malformed(_))));
    }

    #[test]
    fn test_parse_wrong_type_is_malformed() {
        let text = r#"{"approved": "yes", "efficacyScore": 100, "safetyScore": 100, "title": "t", "reasoning": "r"}"#;
        assert!(matches!(parse_judgment(text), Err(JudgmentError::Malformed(_))));
    }

    #[test]
    fn test_parse_empty_is_empty_response() {
        assert_eq!(parse_judgment("  "), Err(JudgmentError::EmptyResponse));
        assert_eq!(parse_judgment("```json\n```"), Err(JudgmentError::EmptyResponse));
    }
}
