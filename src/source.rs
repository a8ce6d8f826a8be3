//! Input sources: who supplied a routine and what it contains.

use crate::descriptor::split_sessions;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel that marks a descriptor as a short code rather than JSON.
pub const SHORT_CODE_SENTINEL: char = '#';

/// One course section in somebody's routine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEntry {
    #[serde(alias = "Course")]
    pub course_code: String,
    #[serde(default, alias = "section")]
    pub section_label: String,
    #[serde(default, alias = "faculty")]
    pub instructor: String,
    #[serde(default, alias = "Class", deserialize_with = "sessions")]
    pub class_sessions: Vec<String>,
    #[serde(default, alias = "Lab", deserialize_with = "sessions")]
    pub lab_sessions: Vec<String>,
    #[serde(default)]
    pub lab_course_code: Option<String>,
}

impl CourseEntry {
    /// Section label without a leading "Section " word.
    pub fn section(&self) -> &str {
        let label = self.section_label.trim();
        match label.get(..7) {
            Some(head) if head.eq_ignore_ascii_case("section") => label[7..].trim_start(),
            _ => label,
        }
    }
}

/// Session fields arrive either as a list or as one `", "`-joined string.
fn sessions<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Joined(String),
        List(Vec<String>),
        Missing(()),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Joined(s) => split_sessions(&s),
        Field::List(items) => items.iter().flat_map(|s| split_sessions(s)).collect(),
        Field::Missing(()) => Vec::new(),
    })
}

/// A resolved routine: a display name and its course entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSource {
    pub display_name: String,
    pub entries: Vec<CourseEntry>,
}

/// What the caller hands in for one person before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    pub display_name: String,
    pub descriptor: String,
}

impl SourceInput {
    pub fn new(display_name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self { display_name: display_name.into(), descriptor: descriptor.into() }
    }
}

/// A descriptor after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    Inline(Vec<CourseEntry>),
    ShortCode(String),
}

impl SourceDescriptor {
    pub fn parse(descriptor: &str) -> Result<Self> {
        let trimmed = descriptor.trim();
        if trimmed.is_empty() {
            return Err(Error::Descriptor("empty routine descriptor".into()));
        }
        if trimmed.starts_with(SHORT_CODE_SENTINEL) {
            return Ok(SourceDescriptor::ShortCode(trimmed.to_string()));
        }
        let entries: Vec<CourseEntry> = serde_json::from_str(trimmed)
            .map_err(|e| Error::Descriptor(format!("routine JSON is malformed: {}", e)))?;
        Ok(SourceDescriptor::Inline(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exported_routine_format() {
        let json = r#"[{"Course":"CSE110","section":"Section 05","faculty":"ABC",
            "Class":"MON (9:30 AM-10:50 AM-7A), WED (9:30 AM-10:50 AM-7A)","Lab":"N/A"}]"#;
        let SourceDescriptor::Inline(entries) = SourceDescriptor::parse(json).unwrap() else {
            panic!("expected inline entries");
        };
        let e = &entries[0];
        assert_eq!(e.course_code, "CSE110");
        assert_eq!(e.section(), "05");
        assert_eq!(e.class_sessions.len(), 2);
        assert!(e.lab_sessions.is_empty());
        assert_eq!(e.lab_course_code, None);
    }

    #[test]
    fn reads_list_format() {
        let json = r#"[{"courseCode":"CSE111","sectionLabel":"2","instructor":"XYZ",
            "classSessions":["SUN (8:00 AM-9:20 AM-A)"],
            "labSessions":["TUE (2:00 PM-3:20 PM-LabRoom)"],"labCourseCode":"CSE111L"}]"#;
        let SourceDescriptor::Inline(entries) = SourceDescriptor::parse(json).unwrap() else {
            panic!("expected inline entries");
        };
        assert_eq!(entries[0].lab_sessions, vec!["TUE (2:00 PM-3:20 PM-LabRoom)"]);
        assert_eq!(entries[0].lab_course_code.as_deref(), Some("CSE111L"));
    }

    #[test]
    fn short_codes_are_not_parsed_as_json() {
        assert_eq!(
            SourceDescriptor::parse("  #0aZ ").unwrap(),
            SourceDescriptor::ShortCode("#0aZ".into())
        );
    }

    #[test]
    fn malformed_json_is_a_descriptor_error() {
        let err = SourceDescriptor::parse("[{").unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
        assert!(SourceDescriptor::parse("   ").is_err());
    }
}
