//! Run reports
//!
//! The pipeline produces one [`EntryReport`] per selected entry. The report
//! renders as styled text for the terminal or as JSON for CI.

use std::fmt::Write;

use console::Style;
use serde::Serialize;

use crate::error::Stage;

/// Final state of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Added,
    Replaced,
    Skipped { reason: String },
    /// Dry-run: would be added
    WouldAdd,
    /// Dry-run: would replace existing content
    WouldReplace,
    Failed { stage: Stage, reason: String },
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            EntryOutcome::Added
                | EntryOutcome::Replaced
                | EntryOutcome::WouldAdd
                | EntryOutcome::WouldReplace
        )
    }

    fn label(&self) -> String {
        match self {
            EntryOutcome::Added => "added".to_string(),
            EntryOutcome::Replaced => "replaced".to_string(),
            EntryOutcome::Skipped { reason } => format!("skipped ({})", reason),
            EntryOutcome::WouldAdd => "would add".to_string(),
            EntryOutcome::WouldReplace => "would replace".to_string(),
            EntryOutcome::Failed { stage, reason } => format!("failed at {}: {}", stage, reason),
        }
    }

    fn style(&self) -> Style {
        match self {
            EntryOutcome::Added | EntryOutcome::Replaced => Style::new().green(),
            EntryOutcome::WouldAdd | EntryOutcome::WouldReplace => Style::new().cyan(),
            EntryOutcome::Skipped { .. } => Style::new().dim(),
            EntryOutcome::Failed { .. } => Style::new().red(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub id: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
    /// Files copied by extraction, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn counts(&self) -> Counts {
        let count = |f: fn(&EntryOutcome) -> bool| {
            self.entries.iter().filter(|e| f(&e.outcome)).count()
        };
        Counts {
            total: self.entries.len(),
            succeeded: count(EntryOutcome::is_success),
            skipped: count(|o| matches!(o, EntryOutcome::Skipped { .. })),
            failed: count(|o| matches!(o, EntryOutcome::Failed { .. })),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.counts().failed > 0
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        let title = if self.dry_run {
            "Ingestion report (dry run)"
        } else {
            "Ingestion report"
        };
        let _ = writeln!(out, "{}", Style::new().bold().apply_to(title));

        for entry in &self.entries {
            let _ = write!(
                out,
                "  {} {}",
                Style::new().bold().yellow().apply_to(&entry.id),
                entry.outcome.style().apply_to(entry.outcome.label())
            );
            if let Some(files) = entry.files {
                if entry.outcome.is_success() {
                    let _ = write!(out, " {}", Style::new().dim().apply_to(format!("({} files)", files)));
                }
            }
            let _ = writeln!(out);
            for warning in &entry.warnings {
                let _ = writeln!(out, "    {} {}", Style::new().yellow().apply_to("warning:"), warning);
            }
        }

        let counts = self.counts();
        let _ = writeln!(
            out,
            "\n{} {} total, {} succeeded, {} skipped, {} failed",
            Style::new().bold().apply_to("Summary:"),
            counts.total,
            counts.succeeded,
            counts.skipped,
            counts.failed
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(flatten)]
            report: &'a RunReport,
            summary: Counts,
        }
        serde_json::to_string_pretty(&JsonReport {
            report: self,
            summary: self.counts(),
        })
    }
}
