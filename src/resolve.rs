//! Turning caller descriptors into [`ScheduleSource`]s.
//!
//! Resolution is the only step that may suspend. Every source is resolved
//! concurrently and lands in its own slot of the returned vector, which keeps
//! input order no matter which lookup finishes first.

use crate::error::{Error, Result, SourceError};
use crate::shortcode::decode_routine;
use crate::source::{CourseEntry, ScheduleSource, SourceDescriptor, SourceInput};
use crate::time::{normalize_day, to_12_hour};
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;

/// Per-source outcomes, indexed like the input list.
pub type ResolvedSources = Vec<std::result::Result<ScheduleSource, SourceError>>;

/// Expands decoded section ids into course entries.
#[async_trait]
pub trait SectionResolver: Send + Sync {
    async fn lookup(&self, section_ids: &[String]) -> Result<Vec<CourseEntry>>;
}

/// In-memory resolver keyed by section id.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    sections: HashMap<String, CourseEntry>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, section_id: impl Into<String>, entry: CourseEntry) -> Self {
        self.sections.insert(section_id.into(), entry);
        self
    }

    /// Build from raw section records as served by the section feed.
    pub fn from_records(records: &[SectionRecord]) -> Self {
        let sections = records.iter().map(|r| (r.id(), r.to_course_entry())).collect();
        Self { sections }
    }
}

#[async_trait]
impl SectionResolver for StaticResolver {
    async fn lookup(&self, section_ids: &[String]) -> Result<Vec<CourseEntry>> {
        let found: Vec<CourseEntry> =
            section_ids.iter().filter_map(|id| self.sections.get(id).cloned()).collect();
        if found.is_empty() {
            return Err(Error::Resolution("No matching sections found".into()));
        }
        Ok(found)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScheduleRecord {
    #[serde(default)]
    pub class_schedules: Vec<ScheduleRecord>,
}

/// One section as served by the remote section feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub section_id: serde_json::Value,
    pub course_code: String,
    #[serde(default)]
    pub section_name: serde_json::Value,
    #[serde(default)]
    pub faculties: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub lab_room_name: Option<String>,
    #[serde(default)]
    pub section_schedule: Option<SectionScheduleRecord>,
    #[serde(default)]
    pub lab_schedules: Option<Vec<ScheduleRecord>>,
}

fn value_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn session_string(s: &ScheduleRecord, room: Option<&str>, course: &str) -> Option<String> {
    let converted = to_12_hour(&s.start_time).and_then(|start| {
        let end = to_12_hour(&s.end_time)?;
        Ok((start, end))
    });
    let (start, end) = match converted {
        Ok(pair) => pair,
        Err(e) => {
            warn!("{}: dropping schedule on {}: {}", course, s.day, e);
            return None;
        }
    };
    let day = normalize_day(&s.day).map(|d| d.abbrev().to_string()).unwrap_or_else(|fb| fb.input);
    let room = room.filter(|r| !r.trim().is_empty()).unwrap_or("TBA");
    Some(format!("{} ({}-{}-{})", day, start, end, room))
}

impl SectionRecord {
    pub fn id(&self) -> String {
        value_text(&self.section_id)
    }

    /// Convert to the descriptor-based entry the grid builder consumes.
    pub fn to_course_entry(&self) -> CourseEntry {
        let class_sessions = self
            .section_schedule
            .as_ref()
            .map(|s| s.class_schedules.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|s| session_string(s, self.room_name.as_deref(), &self.course_code))
            .collect();

        let lab_sessions: Vec<String> = self
            .lab_schedules
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter_map(|s| session_string(s, self.lab_room_name.as_deref(), &self.course_code))
            .collect();

        let lab_course_code =
            (!lab_sessions.is_empty()).then(|| format!("{}L", self.course_code));

        CourseEntry {
            course_code: self.course_code.clone(),
            section_label: value_text(&self.section_name),
            instructor: self
                .faculties
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| "TBA".to_string()),
            class_sessions,
            lab_sessions,
            lab_course_code,
        }
    }
}

/// Resolver that reads the public section feed over HTTP.
#[cfg(feature = "remote")]
pub struct HttpResolver {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "remote")]
impl HttpResolver {
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, endpoint: endpoint.into() })
    }
}

#[cfg(feature = "remote")]
#[async_trait]
impl SectionResolver for HttpResolver {
    async fn lookup(&self, section_ids: &[String]) -> Result<Vec<CourseEntry>> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch {}: {}", self.endpoint, e)))?;
        if !resp.status().is_success() {
            return Err(Error::Network(format!("HTTP error! status: {}", resp.status())));
        }
        let records: Vec<SectionRecord> = resp
            .json()
            .await
            .map_err(|e| Error::Resolution(format!("Failed to read section feed: {}", e)))?;
        debug!("section feed returned {} records", records.len());

        let matching: Vec<CourseEntry> = records
            .iter()
            .filter(|r| section_ids.contains(&r.id()))
            .map(SectionRecord::to_course_entry)
            .collect();
        if matching.is_empty() {
            return Err(Error::Resolution("No matching sections found".into()));
        }
        Ok(matching)
    }
}

/// Resolve one input into a source.
pub async fn resolve_source(
    input: &SourceInput,
    resolver: Option<&dyn SectionResolver>,
) -> Result<ScheduleSource> {
    let entries = match SourceDescriptor::parse(&input.descriptor)? {
        SourceDescriptor::Inline(entries) => entries,
        SourceDescriptor::ShortCode(code) => {
            let ids = decode_routine(&code)?;
            let resolver = resolver.ok_or_else(|| {
                Error::Resolution("short code given but no section resolver is configured".into())
            })?;
            resolver.lookup(&ids).await?
        }
    };
    Ok(ScheduleSource { display_name: input.display_name.clone(), entries })
}

/// Resolve every input concurrently. Inputs with a blank name or descriptor
/// are reported as failures so positions stay aligned with the input list.
pub async fn resolve_all(
    inputs: &[SourceInput],
    resolver: Option<&dyn SectionResolver>,
) -> ResolvedSources {
    let pending = inputs.iter().enumerate().map(|(position, input)| async move {
        let name = input.display_name.trim();
        let outcome = if name.is_empty() {
            Err(Error::Descriptor("missing display name".into()))
        } else {
            resolve_source(input, resolver).await
        };
        outcome.map_err(|error| SourceError {
            source_name: name.to_string(),
            position,
            error,
        })
    });
    join_all(pending).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> &'static str {
        r#"{"sectionId":177609,"courseCode":"CSE220","sectionName":"3","faculties":"RRK",
            "roomName":"09A-05C","labRoomName":"12F-31L",
            "sectionSchedule":{"classSchedules":[{"day":"WEDNESDAY","startTime":"14:00:00","endTime":"15:20:00"}]},
            "labSchedules":[{"day":"SATURDAY","startTime":"08:00:00","endTime":"10:50:00"}]}"#
    }

    #[test]
    fn converts_feed_records() {
        let record: SectionRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(record.id(), "177609");
        let entry = record.to_course_entry();
        assert_eq!(entry.class_sessions, vec!["WED (2:00 PM-3:20 PM-09A-05C)"]);
        assert_eq!(entry.lab_sessions, vec!["SAT (8:00 AM-10:50 AM-12F-31L)"]);
        assert_eq!(entry.lab_course_code.as_deref(), Some("CSE220L"));
        assert_eq!(entry.section_label, "3");
    }

    #[test]
    fn missing_room_and_faculty_become_tba() {
        let record: SectionRecord = serde_json::from_str(
            r#"{"sectionId":"170001","courseCode":"MAT110",
                "sectionSchedule":{"classSchedules":[{"day":"MONDAY","startTime":"08:00:00","endTime":"09:20:00"}]}}"#,
        )
        .unwrap();
        let entry = record.to_course_entry();
        assert_eq!(entry.instructor, "TBA");
        assert_eq!(entry.class_sessions, vec!["MON (8:00 AM-9:20 AM-TBA)"]);
        assert!(entry.lab_course_code.is_none());
    }

    #[tokio::test]
    async fn short_code_without_resolver_fails_softly() {
        let inputs = vec![
            SourceInput::new("Alice", "#000"),
            SourceInput::new("Bob", r#"[{"Course":"CSE110","Class":"MON (8:00 AM-9:20 AM-A)"}]"#),
        ];
        let resolved = resolve_all(&inputs, None).await;
        assert!(resolved[0].is_err());
        assert_eq!(resolved[1].as_ref().unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn static_resolver_matches_ids() {
        let record: SectionRecord = serde_json::from_str(record_json()).unwrap();
        let resolver = StaticResolver::from_records(&[record]);
        let code = crate::shortcode::encode_routine(&["177609"]);
        let source = resolve_source(&SourceInput::new("Alice", code), Some(&resolver)).await.unwrap();
        assert_eq!(source.entries[0].course_code, "CSE220");

        let err = resolve_source(&SourceInput::new("Bob", "#000"), Some(&resolver)).await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }
}
