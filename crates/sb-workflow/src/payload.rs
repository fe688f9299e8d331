//! Submission payload reduction
//!
//! MODIFY rows that match their Before-snapshot counterpart are no-op
//! edits and are dropped before the draft goes to the backend. ADD and
//! REMOVE rows always travel.

use sb_api::dto::{ChangeRequestPayload, DraftAction, EngineerRowDto};
use sb_models::{ChangeRequest, ChangeRequestKind, CurrentResource, EngineerAssignment, RowAction};

const FLOAT_TOLERANCE: f64 = 0.01;

fn baseline_for<'a>(
    row: &EngineerAssignment,
    baseline: &'a [CurrentResource],
) -> Option<&'a CurrentResource> {
    baseline.iter().find(|resource| {
        (row.engineer_id.is_some() && resource.engineer_id == row.engineer_id)
            || (row.base_engineer_id.is_some()
                && resource.base_engineer_id == row.base_engineer_id)
    })
}

fn row_unchanged(row: &EngineerAssignment, resource: &CurrentResource) -> bool {
    row.level_label == resource.engineer_level_label
        && row.start_date == resource.start_date
        && row.end_date == resource.end_date
        && (row.rating - resource.rating).abs() < FLOAT_TOLERANCE
        && (row.compensation.amount() - resource.unit_rate).abs() < FLOAT_TOLERANCE
}

/// Keep every ADD and REMOVE row; keep a MODIFY row only when it differs
/// from its baseline assignment.
pub fn reduce_engineers(
    rows: &[EngineerAssignment],
    baseline: &[CurrentResource],
) -> Vec<EngineerAssignment> {
    rows.iter()
        .filter(|row| {
            if row.action != RowAction::Modify {
                return true;
            }
            match baseline_for(row, baseline) {
                Some(resource) => !row_unchanged(row, resource),
                None => true,
            }
        })
        .cloned()
        .collect()
}

/// Assemble the create/update body for a draft. Only the sections the
/// draft's kind carries are included, and resource-change engineer lists
/// are reduced against the Before-snapshot.
pub fn build_payload(
    record: &ChangeRequest,
    baseline: &[CurrentResource],
    action: DraftAction,
) -> ChangeRequestPayload {
    let engineers: Vec<EngineerRowDto> = match record.kind {
        ChangeRequestKind::SowRetainer => {
            let rows = if record.change_type.is_resource_change() {
                reduce_engineers(&record.engineers, baseline)
            } else {
                record.engineers.clone()
            };
            rows.iter().map(EngineerRowDto::from).collect()
        }
        _ => Vec::new(),
    };

    ChangeRequestPayload {
        contract_id: record.contract_id,
        title: record.title.clone(),
        change_type: record.change_type.label().to_string(),
        summary: record.summary.clone(),
        effective_from: record.effective_from,
        effective_until: record.effective_until,
        references: record.references.clone(),
        action,
        engineers,
        billing_adjustments: if record.kind.is_retainer() {
            record.billing_adjustments.clone()
        } else {
            Vec::new()
        },
        impact_analysis: if record.kind.is_fixed_price() {
            record.impact.clone()
        } else {
            None
        },
        attachments: record.attachments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sb_models::Compensation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn baseline_resource(engineer_id: i64) -> CurrentResource {
        CurrentResource {
            base_engineer_id: Some(engineer_id),
            engineer_id: Some(engineer_id + 10),
            engineer_level_label: "Middle QA".to_string(),
            role: "QA".to_string(),
            start_date: Some(date(2024, 6, 1)),
            end_date: None,
            rating: 100.0,
            unit_rate: 500_000.0,
        }
    }

    #[test]
    fn test_unchanged_modify_row_dropped() {
        let baseline = vec![baseline_resource(1), baseline_resource(2)];
        let untouched = baseline[0].to_assignment();
        let mut edited = baseline[1].to_assignment();
        edited.compensation = Compensation::monthly(600_000.0);

        let reduced = reduce_engineers(&[untouched, edited.clone()], &baseline);
        assert_eq!(reduced, vec![edited]);
    }

    #[test]
    fn test_add_and_remove_rows_always_kept() {
        let baseline = vec![baseline_resource(1)];
        let added = EngineerAssignment::blank();
        let mut removed = baseline[0].to_assignment();
        removed.soft_remove(date(2025, 1, 1));

        let reduced = reduce_engineers(&[added.clone(), removed.clone()], &baseline);
        assert_eq!(reduced, vec![added, removed]);
    }

    #[test]
    fn test_drift_below_tolerance_counts_as_unchanged() {
        let baseline = vec![baseline_resource(1)];
        let mut row = baseline[0].to_assignment();
        row.rating = 100.005;
        row.compensation = Compensation::monthly(500_000.001);

        assert!(reduce_engineers(&[row], &baseline).is_empty());
    }

    #[test]
    fn test_modify_row_without_baseline_kept() {
        let mut row = EngineerAssignment::blank();
        row.base_engineer_id = Some(99);
        row.mark_edited();

        let reduced = reduce_engineers(&[row.clone()], &[]);
        assert_eq!(reduced, vec![row]);
    }

    #[test]
    fn test_payload_sections_follow_kind() {
        let mut retainer = ChangeRequest::new_draft(7, ChangeRequestKind::SowRetainer);
        retainer.engineers.push(EngineerAssignment::blank());
        let payload = build_payload(&retainer, &[], DraftAction::Save);
        assert_eq!(payload.engineers.len(), 1);
        assert!(payload.impact_analysis.is_none());
        assert_eq!(payload.change_type, "RESOURCE_CHANGE");

        let fixed = ChangeRequest::new_draft(8, ChangeRequestKind::SowFixedPrice);
        let payload = build_payload(&fixed, &[], DraftAction::Submit);
        assert!(payload.engineers.is_empty());
        assert!(payload.impact_analysis.is_some());
        assert_eq!(payload.action, DraftAction::Submit);
    }
}
