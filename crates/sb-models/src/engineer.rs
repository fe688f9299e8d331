//! Engineer assignment line items
//!
//! A resource-change request edits the contract's staffed engineers as a
//! list of rows, each carrying an action tag: `Add` for brand-new rows,
//! `Modify` for rows with a backend identity, `Remove` for soft-removed
//! rows whose end date is pinned to the day before the request takes
//! effect.

use chrono::{Duration, NaiveDate};
use sb_core::traits::Id;
use serde::{Deserialize, Serialize};

/// Action tag carried by each row in a resource-change draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowAction {
    Add,
    Modify,
    Remove,
}

/// How the assignment is billed. Hourly subtotals are always recomputed as
/// rate x hours; they are never stored independently of their inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "billingType")]
pub enum Compensation {
    Monthly {
        salary: f64,
    },
    Hourly {
        #[serde(rename = "hourlyRate")]
        rate: f64,
        hours: f64,
        subtotal: f64,
    },
}

impl Compensation {
    pub fn monthly(salary: f64) -> Self {
        Compensation::Monthly { salary }
    }

    pub fn hourly(rate: f64, hours: f64) -> Self {
        Compensation::Hourly {
            rate,
            hours,
            subtotal: rate * hours,
        }
    }

    /// The effective compensation value used for validation and diffing.
    pub fn amount(&self) -> f64 {
        match self {
            Compensation::Monthly { salary } => *salary,
            Compensation::Hourly { subtotal, .. } => *subtotal,
        }
    }

    pub fn is_hourly(&self) -> bool {
        matches!(self, Compensation::Hourly { .. })
    }
}

impl Default for Compensation {
    fn default() -> Self {
        Compensation::Monthly { salary: 0.0 }
    }
}

/// One engineer row in a change-request draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerAssignment {
    /// Stable identity of the baseline assignment, if any
    pub base_engineer_id: Option<Id>,
    /// Identity of the assignment row currently in effect, if any
    pub engineer_id: Option<Id>,
    pub action: RowAction,
    /// First word of the level label, e.g. "Middle"
    pub level: String,
    /// Remaining words, e.g. "QA"
    pub role: String,
    /// Combined label as displayed and stored, e.g. "Middle QA"
    pub level_label: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Utilization percentage, 0-100
    pub rating: f64,
    #[serde(flatten)]
    pub compensation: Compensation,
}

impl EngineerAssignment {
    /// A blank Add row, as seeded into a fresh retainer draft.
    pub fn blank() -> Self {
        Self {
            base_engineer_id: None,
            engineer_id: None,
            action: RowAction::Add,
            level: String::new(),
            role: String::new(),
            level_label: String::new(),
            start_date: None,
            end_date: None,
            rating: 100.0,
            compensation: Compensation::default(),
        }
    }

    /// Split rule shared with the backend: the first word of the label is
    /// the level, the rest is the role.
    pub fn set_level_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        let mut parts = label.split_whitespace();
        self.level = parts.next().unwrap_or_default().to_string();
        self.role = parts.collect::<Vec<_>>().join(" ");
        self.level_label = label;
    }

    /// Keep the combined label in sync when level or role is edited directly.
    pub fn sync_level_label(&mut self) {
        self.level_label = format!("{} {}", self.level, self.role).trim().to_string();
    }

    pub fn is_removed(&self) -> bool {
        self.action == RowAction::Remove
    }

    /// Rows carried over from the contract snapshot keep their identity.
    pub fn has_backend_identity(&self) -> bool {
        self.engineer_id.is_some() || self.base_engineer_id.is_some()
    }

    /// Soft-remove: the row stays in the list so the reviewer sees the
    /// removal against the Before-view, with its end date pinned to the day
    /// before the change takes effect.
    pub fn soft_remove(&mut self, effective_from: NaiveDate) {
        self.action = RowAction::Remove;
        self.end_date = Some(effective_from - Duration::days(1));
    }

    /// Any edit to a row with backend identity turns it into a Modify row,
    /// unless it has already been removed.
    pub fn mark_edited(&mut self) {
        if self.has_backend_identity() && self.action != RowAction::Remove {
            self.action = RowAction::Modify;
        }
    }
}

/// A baseline assignment in effect on a given date, as returned by the
/// point-in-time current-resources endpoint. This is the "Before" view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentResource {
    pub base_engineer_id: Option<Id>,
    pub engineer_id: Option<Id>,
    pub engineer_level_label: String,
    #[serde(default)]
    pub role: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub rating: f64,
    pub unit_rate: f64,
}

impl CurrentResource {
    /// (level, role) as split from the combined label; falls back to the
    /// standalone role field when the label is a single word.
    pub fn split_label(&self) -> (String, String) {
        let mut parts = self.engineer_level_label.split_whitespace();
        let level = parts.next().unwrap_or_default().to_string();
        let role = {
            let rest = parts.collect::<Vec<_>>().join(" ");
            if rest.is_empty() {
                self.role.clone()
            } else {
                rest
            }
        };
        (level, role)
    }

    /// Seed an After-view row from this baseline assignment.
    pub fn to_assignment(&self) -> EngineerAssignment {
        let (level, role) = self.split_label();
        EngineerAssignment {
            base_engineer_id: self.base_engineer_id,
            engineer_id: self.engineer_id,
            action: RowAction::Modify,
            level,
            role,
            level_label: self.engineer_level_label.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            rating: self.rating,
            compensation: Compensation::monthly(self.unit_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_level_label_split() {
        let mut row = EngineerAssignment::blank();
        row.set_level_label("Senior Backend Engineer");
        assert_eq!(row.level, "Senior");
        assert_eq!(row.role, "Backend Engineer");

        row.level = "Middle".to_string();
        row.sync_level_label();
        assert_eq!(row.level_label, "Middle Backend Engineer");
    }

    #[test]
    fn test_hourly_subtotal_recomputed() {
        let comp = Compensation::hourly(5000.0, 160.0);
        assert_eq!(comp.amount(), 800_000.0);
    }

    #[test]
    fn test_soft_remove_pins_end_date() {
        let mut row = EngineerAssignment::blank();
        row.engineer_id = Some(9);
        row.soft_remove(date("2025-01-01"));
        assert!(row.is_removed());
        assert_eq!(row.end_date, Some(date("2024-12-31")));
    }

    #[test]
    fn test_mark_edited_only_flips_identified_rows() {
        let mut added = EngineerAssignment::blank();
        added.mark_edited();
        assert_eq!(added.action, RowAction::Add);

        let mut existing = EngineerAssignment::blank();
        existing.base_engineer_id = Some(3);
        existing.mark_edited();
        assert_eq!(existing.action, RowAction::Modify);

        existing.soft_remove(date("2025-02-01"));
        existing.mark_edited();
        assert_eq!(existing.action, RowAction::Remove);
    }

    #[test]
    fn test_seed_from_current_resource() {
        let resource = CurrentResource {
            base_engineer_id: Some(1),
            engineer_id: Some(11),
            engineer_level_label: "Middle QA".to_string(),
            role: String::new(),
            start_date: Some(date("2024-06-01")),
            end_date: None,
            rating: 80.0,
            unit_rate: 500_000.0,
        };
        let row = resource.to_assignment();
        assert_eq!(row.action, RowAction::Modify);
        assert_eq!(row.level, "Middle");
        assert_eq!(row.role, "QA");
        assert_eq!(row.compensation.amount(), 500_000.0);
    }
}
