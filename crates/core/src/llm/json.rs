use crate::domain::allocation::RawAllocation;
use anyhow::Context;

/// Best-effort JSON extraction from free-form model output: strip Markdown
/// fences when present, otherwise take the first '{' through the last '}'.
pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

pub fn parse_allocation(text: &str) -> anyhow::Result<RawAllocation> {
    let json_str = extract_json(text).context("no JSON object found in model output")?;
    serde_json::from_str::<RawAllocation>(&json_str)
        .with_context(|| format!("model output is not a valid allocation object: {json_str}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"deposit\":40}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "추천 결과입니다: {\"deposit\":40} 이상입니다.";
        assert_eq!(extract_json(s), Some("{\"deposit\":40}".to_string()));
    }

    #[test]
    fn extract_json_rejects_braceless_text() {
        assert_eq!(extract_json("배분을 드릴 수 없습니다"), None);
    }

    #[test]
    fn parse_allocation_reads_all_fields() {
        let text = r#"
배분 결과:
{"deposit": 40, "saving": 30, "bond": 20, "etf": 10, "reasoning": "안정형 맞춤"}
"#;
        let raw = parse_allocation(text).unwrap();
        assert_eq!(raw.deposit, Some(40.0));
        assert_eq!(raw.etf, Some(10.0));
        assert_eq!(raw.reasoning.as_deref(), Some("안정형 맞춤"));
    }

    #[test]
    fn parse_allocation_tolerates_missing_classes() {
        let raw = parse_allocation("{\"deposit\": 60, \"saving\": 40}").unwrap();
        assert_eq!(raw.deposit, Some(60.0));
        assert!(raw.bond.is_none());
        assert!(raw.etf.is_none());
    }

    #[test]
    fn parse_allocation_fails_without_json() {
        assert!(parse_allocation("no json here").is_err());
    }
}
