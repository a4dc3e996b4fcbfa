//! Line-tagged parse of raw model output into a [`TriageResult`].

use super::types::TriageResult;

type TagSetter = fn(&mut TagBuffer, &str);

/// Tag table driving the scan. Order-sensitive: a line is checked
/// against entries top to bottom and claimed by the first tag that
/// prefixes it. Tags are case-sensitive; repeated tags overwrite, so
/// the last occurrence wins.
const TAG_TABLE: &[(&str, TagSetter)] = &[
    ("ANALYSIS:", |buf, value| buf.analysis = value.to_string()),
    ("PRIORITY:", |buf, value| buf.priority = value.to_string()),
    ("SUMMARY:", |buf, value| buf.summary = value.to_string()),
];

struct TagBuffer {
    analysis: String,
    priority: String,
    summary: String,
}

/// Extract the three tagged fields from raw model output.
///
/// Total over every input: lines matching no tag are ignored, and a
/// malformed or empty string still yields a complete result via
/// per-field defaults. When its tag never produced a value, `analysis`
/// falls back to the whole raw text, `summary` to the first 200
/// characters of it (or "Pending analysis" when the text is empty),
/// and `priority` to "Medium".
pub fn parse_triage_response(raw: &str) -> TriageResult {
    let mut buf = TagBuffer {
        analysis: String::new(),
        priority: "Medium".to_string(),
        summary: String::new(),
    };

    for line in raw.lines() {
        let line = line.trim();
        for (tag, set) in TAG_TABLE {
            if let Some(rest) = line.strip_prefix(tag) {
                set(&mut buf, rest.trim());
                break;
            }
        }
    }

    let analysis = if buf.analysis.is_empty() {
        raw.to_string()
    } else {
        buf.analysis
    };
    let summary = if !buf.summary.is_empty() {
        buf.summary
    } else if raw.is_empty() {
        "Pending analysis".to_string()
    } else {
        raw.chars().take(200).collect()
    };

    TriageResult {
        analysis,
        priority: buf.priority,
        summary,
    }
}
