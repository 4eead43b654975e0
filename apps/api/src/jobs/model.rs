//! Canonical job model. Every partition's records are normalized into
//! `CanonicalJob`; nothing downstream sees a raw document.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const NOT_DISCLOSED: &str = "Not Disclosed";
pub const DEFAULT_JOB_TYPE: &str = "full-time";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalJob {
    pub id: String,
    /// Posting identifier assigned by the upstream job source, if any.
    #[serde(rename = "job_id")]
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Salary,
    pub skills: Vec<String>,
    /// Display value only; may be "N/A" or free text.
    pub posted_at: String,
    /// Empty when the posting has no apply link.
    pub apply_link: String,
    pub description: Description,
    pub experience: String,
    pub about_company: String,
    #[serde(rename = "about_the_role")]
    pub about_the_role: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    /// Source partition name. Provenance only, never identity.
    pub collection: String,
}

impl CanonicalJob {
    /// A record with every field at its default.
    pub fn empty(id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_id: String::new(),
            title: String::new(),
            company: String::new(),
            location: String::new(),
            salary: Salary::default(),
            skills: Vec::new(),
            posted_at: String::new(),
            apply_link: String::new(),
            description: Description::default(),
            experience: String::new(),
            about_company: String::new(),
            about_the_role: String::new(),
            requirements: Vec::new(),
            responsibilities: Vec::new(),
            job_type: DEFAULT_JOB_TYPE.to_string(),
            collection: collection.into(),
        }
    }

    pub fn apply_link(&self) -> Option<&str> {
        let link = self.apply_link.trim();
        (!link.is_empty()).then_some(link)
    }
}

/// Salary as the source gave it: a display string or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Salary {
    Amount(f64),
    Text(String),
}

impl Default for Salary {
    fn default() -> Self {
        Salary::Text(NOT_DISCLOSED.to_string())
    }
}

/// A job description is either one text blob or named sub-sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Sections(SectionMap),
}

impl Default for Description {
    fn default() -> Self {
        Description::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    BulletList(Vec<String>),
}

impl Description {
    /// Flattens the description into plain text. Sections become a heading
    /// line followed by their content; bullets are prefixed with "- ".
    pub fn to_plain_text(&self) -> String {
        match self {
            Description::Text(text) => text.clone(),
            Description::Sections(sections) => sections
                .iter()
                .map(|(name, content)| match content {
                    SectionContent::Text(text) => format!("{name}:\n{text}"),
                    SectionContent::BulletList(items) => {
                        let bullets: Vec<String> =
                            items.iter().map(|item| format!("- {item}")).collect();
                        format!("{name}:\n{}", bullets.join("\n"))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Ordered mapping of section name to content. Serialized as a JSON object
/// with keys in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionMap(Vec<(String, SectionContent)>);

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a section, keeping the position of the first insert.
    pub fn insert(&mut self, name: impl Into<String>, content: SectionContent) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = content,
            None => self.0.push((name, content)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&SectionContent> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, content)| content)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionContent)> {
        self.0.iter().map(|(name, content)| (name.as_str(), content))
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, content) in &self.0 {
            map.serialize_entry(name, content)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionMapVisitor;

        impl<'de> Visitor<'de> for SectionMapVisitor {
            type Value = SectionMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of section name to text or list of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SectionMap, A::Error> {
                let mut sections = SectionMap::new();
                while let Some((name, content)) = access.next_entry::<String, SectionContent>()? {
                    sections.insert(name, content);
                }
                Ok(sections)
            }
        }

        deserializer.deserialize_map(SectionMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_salary_deserializes_number_and_text() {
        let amount: Salary = serde_json::from_value(json!(95000)).unwrap();
        assert_eq!(amount, Salary::Amount(95000.0));
        let text: Salary = serde_json::from_value(json!("150000-180000")).unwrap();
        assert_eq!(text, Salary::Text("150000-180000".to_string()));
    }

    #[test]
    fn test_description_sections_keep_source_order() {
        let value = json!({
            "Overview": "Build things",
            "Qualifications": ["Rust", "SQL"],
            "Benefits": "Remote-friendly"
        });
        let description: Description = serde_json::from_value(value.clone()).unwrap();
        let Description::Sections(sections) = &description else {
            panic!("expected sections, got {description:?}");
        };
        let names: Vec<&str> = sections.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Overview", "Qualifications", "Benefits"]);
        assert_eq!(
            sections.get("Qualifications"),
            Some(&SectionContent::BulletList(vec!["Rust".into(), "SQL".into()]))
        );
        assert_eq!(serde_json::to_value(&description).unwrap(), value);
    }

    #[test]
    fn test_description_plain_text_for_sections() {
        let mut sections = SectionMap::new();
        sections.insert("Overview", SectionContent::Text("Build APIs".into()));
        sections.insert(
            "Skills",
            SectionContent::BulletList(vec!["Rust".into(), "Tokio".into()]),
        );
        let text = Description::Sections(sections).to_plain_text();
        assert_eq!(text, "Overview:\nBuild APIs\n\nSkills:\n- Rust\n- Tokio");
    }

    #[test]
    fn test_section_insert_replaces_in_place() {
        let mut sections = SectionMap::new();
        sections.insert("A", SectionContent::Text("1".into()));
        sections.insert("B", SectionContent::Text("2".into()));
        sections.insert("A", SectionContent::Text("3".into()));
        assert_eq!(sections.iter().count(), 2);
        assert_eq!(sections.iter().next(), Some(("A", &SectionContent::Text("3".into()))));
    }

    #[test]
    fn test_empty_job_serializes_full_field_set() {
        let value = serde_json::to_value(CanonicalJob::empty("abc", "Engineering")).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "job_id",
                "title",
                "company",
                "location",
                "salary",
                "skills",
                "postedAt",
                "applyLink",
                "description",
                "experience",
                "aboutCompany",
                "about_the_role",
                "requirements",
                "responsibilities",
                "type",
                "collection",
            ]
        );
        assert_eq!(value["salary"], json!(NOT_DISCLOSED));
        assert_eq!(value["type"], json!(DEFAULT_JOB_TYPE));
    }

    #[test]
    fn test_apply_link_blank_is_absent() {
        let mut job = CanonicalJob::empty("1", "c");
        assert_eq!(job.apply_link(), None);
        job.apply_link = "  ".into();
        assert_eq!(job.apply_link(), None);
        job.apply_link = "https://example.com/apply".into();
        assert_eq!(job.apply_link(), Some("https://example.com/apply"));
    }
}
