//! Field normalizer: maps a raw partition record onto `CanonicalJob`.
//!
//! The raw → canonical mapping is data, not code. Each `FieldRule` lists the
//! JSON pointers probed in order and the default used when none is present.
//! Supporting a new partition shape means adding pointers to the table.

use serde_json::Value;
use tracing::debug;

use crate::jobs::model::{
    CanonicalJob, Description, Salary, SectionContent, SectionMap, DEFAULT_JOB_TYPE,
    NOT_DISCLOSED,
};
use crate::store::RawDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    JobId,
    Title,
    Company,
    Location,
    Salary,
    Skills,
    PostedAt,
    ApplyLink,
    Description,
    Experience,
    AboutCompany,
    AboutTheRole,
    Requirements,
    Responsibilities,
    JobType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Empty string or empty list, depending on the field.
    Empty,
    Literal(&'static str),
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: CanonicalField,
    /// JSON pointers into the raw record, probed in order.
    pub sources: &'static [&'static str],
    pub default: FieldDefault,
}

#[derive(Debug)]
pub struct FieldMapping {
    pub version: u32,
    pub rules: &'static [FieldRule],
}

pub static FIELD_MAPPING: FieldMapping = FieldMapping {
    version: 1,
    rules: &[
        FieldRule {
            field: CanonicalField::JobId,
            sources: &["/job_id"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Title,
            sources: &["/title", "/job_title"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Company,
            sources: &["/company_name", "/company"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Location,
            sources: &["/location"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Salary,
            sources: &["/salary_offered", "/salary"],
            default: FieldDefault::Literal(NOT_DISCLOSED),
        },
        FieldRule {
            field: CanonicalField::Skills,
            sources: &["/skills"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::PostedAt,
            sources: &["/time_when_posted", "/posted_at"],
            default: FieldDefault::Literal("N/A"),
        },
        FieldRule {
            field: CanonicalField::ApplyLink,
            sources: &["/apply_options/0/link", "/share_link", "/apply_link"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Description,
            sources: &["/description"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Experience,
            sources: &["/experience_level", "/experience"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::AboutCompany,
            sources: &["/about_company"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::AboutTheRole,
            sources: &["/about_the_role"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Requirements,
            sources: &["/requirements"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::Responsibilities,
            sources: &["/key_responsibilities", "/responsibilities"],
            default: FieldDefault::Empty,
        },
        FieldRule {
            field: CanonicalField::JobType,
            sources: &["/job_type", "/employment_type"],
            default: FieldDefault::Literal(DEFAULT_JOB_TYPE),
        },
    ],
};

/// Normalizes one raw record from `partition` with the current mapping.
pub fn normalize(partition: &str, doc: &RawDocument) -> CanonicalJob {
    normalize_with(&FIELD_MAPPING, partition, doc)
}

/// Pure: no I/O, never fails. Anything missing or malformed takes the rule's default.
pub fn normalize_with(mapping: &FieldMapping, partition: &str, doc: &RawDocument) -> CanonicalJob {
    let mut job = CanonicalJob::empty(doc.id.to_string(), partition);

    for rule in mapping.rules {
        let value = rule
            .sources
            .iter()
            .find_map(|pointer| doc.body.pointer(pointer).filter(|v| is_present(v)));

        if value.is_none()
            && rule.field == CanonicalField::ApplyLink
            && has_malformed_apply_options(&doc.body)
        {
            debug!(
                partition,
                id = %doc.id,
                mapping_version = mapping.version,
                "apply_options present but unusable; falling back"
            );
        }

        apply_rule(&mut job, rule, value);
    }

    job
}

fn apply_rule(job: &mut CanonicalJob, rule: &FieldRule, value: Option<&Value>) {
    let default_text = match rule.default {
        FieldDefault::Empty => String::new(),
        FieldDefault::Literal(text) => text.to_string(),
    };
    let text = || value.map(value_to_text).unwrap_or_else(|| default_text.clone());
    let list = || value.map(value_to_list).unwrap_or_default();

    match rule.field {
        CanonicalField::JobId => job.job_id = text(),
        CanonicalField::Title => job.title = text(),
        CanonicalField::Company => job.company = text(),
        CanonicalField::Location => job.location = text(),
        CanonicalField::PostedAt => job.posted_at = text(),
        CanonicalField::ApplyLink => job.apply_link = text(),
        CanonicalField::Experience => job.experience = text(),
        CanonicalField::AboutCompany => job.about_company = text(),
        CanonicalField::AboutTheRole => job.about_the_role = text(),
        CanonicalField::JobType => job.job_type = text(),
        CanonicalField::Skills => job.skills = list(),
        CanonicalField::Requirements => job.requirements = list(),
        CanonicalField::Responsibilities => job.responsibilities = list(),
        CanonicalField::Salary => {
            job.salary = match value {
                Some(Value::Number(n)) => n
                    .as_f64()
                    .map(Salary::Amount)
                    .unwrap_or_else(|| Salary::Text(n.to_string())),
                Some(other) => Salary::Text(value_to_text(other)),
                None => Salary::Text(default_text.clone()),
            }
        }
        CanonicalField::Description => {
            job.description = value
                .map(value_to_description)
                .unwrap_or(Description::Text(default_text.clone()))
        }
    }
}

/// A source field counts as present unless it is null, an empty string,
/// `false`, or zero.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn has_malformed_apply_options(body: &Value) -> bool {
    body.get("apply_options").is_some_and(|options| !options.is_null())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Arrays keep element order; a scalar becomes a single-element list.
fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::Null => Vec::new(),
        other => vec![value_to_text(other)],
    }
}

fn value_to_description(value: &Value) -> Description {
    match value {
        Value::Object(map) => {
            let mut sections = SectionMap::new();
            for (name, content) in map {
                let content = match content {
                    Value::Array(items) => {
                        SectionContent::BulletList(items.iter().map(value_to_text).collect())
                    }
                    other => SectionContent::Text(value_to_text(other)),
                };
                sections.insert(name.clone(), content);
            }
            Description::Sections(sections)
        }
        Value::Array(items) => Description::Text(
            items
                .iter()
                .map(value_to_text)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => Description::Text(value_to_text(other)),
    }
}
