//! Compatibility result payload and its rendered view.
//!
//! The payload mirrors what the scoring endpoint returns. Every substructure
//! defaults to empty so a partial payload still deserializes; the view then
//! renders an explicit fallback for each empty section. A section sent as
//! `null` is treated the same as a missing one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Payload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    #[default]
    Remote,
    Simulated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ReportSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_assessment: OverallAssessment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selection_decision: SelectionDecision,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skill_evaluation: SkillEvaluation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub green_flags: BTreeMap<String, Vec<FlagEntry>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub red_flags: BTreeMap<String, Vec<FlagEntry>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unverified_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quick_summary: Vec<String>,
    /// Improvement suggestions; only the simulated scorer fills this.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_score: f64,
    /// Component sub-scores (resume, knowledge, JD compatibility, ...).
    /// Whatever other numeric fields the endpoint sends land here.
    #[serde(flatten)]
    pub components: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionDecision {
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEvaluation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `#[serde(default)]` only covers a missing key; this also maps `null` to
/// the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FlagEntry {
    /// Human-readable line: "<type> <reason>" when both exist, otherwise
    /// whichever of details / reason is present.
    pub fn describe(&self) -> String {
        match (&self.kind, &self.reason, &self.details) {
            (Some(kind), Some(reason), _) => format!("{kind} {reason}"),
            (_, _, Some(details)) => details.clone(),
            (_, Some(reason), None) => reason.clone(),
            (Some(kind), None, None) => kind.clone(),
            (None, None, None) => String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendered view
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Strong,
    Moderate,
    Weak,
}

impl ScoreTier {
    /// Tiers compare the unrounded score: 79.6 is still moderate.
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::Strong
        } else if score >= 60.0 {
            ScoreTier::Moderate
        } else {
            ScoreTier::Weak
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::Strong => "green",
            ScoreTier::Moderate => "yellow",
            ScoreTier::Weak => "red",
        }
    }
}

/// A rendered section. `fallback` is set exactly when `items` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection<T> {
    pub title: &'static str,
    pub items: Vec<T>,
    pub fallback: Option<&'static str>,
}

impl<T> ReportSection<T> {
    fn new(title: &'static str, items: Vec<T>, fallback: &'static str) -> Self {
        let fallback = items.is_empty().then_some(fallback);
        Self {
            title,
            items,
            fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScoreView {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillView {
    pub skill: String,
    pub score: u32,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub simulated: bool,
    pub overall_score: u32,
    pub tier: ScoreTier,
    pub color: &'static str,
    pub decision: &'static str,
    pub decision_reason: String,
    pub breakdown: ReportSection<ComponentScoreView>,
    pub strengths: ReportSection<String>,
    pub concerns: ReportSection<String>,
    /// Unverified skills joined with ", ", or "None".
    pub do_work_on: String,
    pub skills: ReportSection<SkillView>,
    pub quick_summary: ReportSection<String>,
    pub suggestions: ReportSection<String>,
}

impl ReportView {
    pub fn render(report: &CompatibilityReport) -> Self {
        let raw_score = report.overall_assessment.overall_score;
        let overall_score = clamp_score(raw_score);
        let tier = ScoreTier::for_score(raw_score);

        let breakdown = report
            .overall_assessment
            .components
            .iter()
            .filter_map(|(name, value)| {
                value.as_f64().map(|score| ComponentScoreView {
                    name: name.clone(),
                    score,
                })
            })
            .collect();

        let flatten = |flags: &BTreeMap<String, Vec<FlagEntry>>| -> Vec<String> {
            flags
                .values()
                .flatten()
                .map(FlagEntry::describe)
                .filter(|line| !line.is_empty())
                .collect()
        };

        let skills = report
            .skill_evaluation
            .skills
            .iter()
            .map(|s| SkillView {
                skill: s.skill_name.clone(),
                score: clamp_score(s.match_score),
                remark: s.remark.clone(),
            })
            .collect();

        let do_work_on = if report.unverified_skills.is_empty() {
            "None".to_string()
        } else {
            report.unverified_skills.join(", ")
        };

        Self {
            simulated: report.source == ReportSource::Simulated,
            overall_score,
            tier,
            color: tier.color(),
            decision: if report.selection_decision.selected {
                "Selected"
            } else {
                "Rejected"
            },
            decision_reason: report.selection_decision.reason.clone(),
            breakdown: ReportSection::new(
                "Score Breakdown",
                breakdown,
                "No component scores reported.",
            ),
            strengths: ReportSection::new(
                "Strengths",
                flatten(&report.green_flags),
                "No notable strengths identified.",
            ),
            concerns: ReportSection::new(
                "Concerns",
                flatten(&report.red_flags),
                "No notable concerns identified.",
            ),
            do_work_on,
            skills: ReportSection::new("Skill Evaluation", skills, "No skills evaluated."),
            quick_summary: ReportSection::new(
                "Quick Summary",
                report.quick_summary.clone(),
                "No summary available.",
            ),
            suggestions: ReportSection::new(
                "Suggestions",
                report.suggestions.clone(),
                "No suggestions.",
            ),
        }
    }
}

fn clamp_score(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u32
}
