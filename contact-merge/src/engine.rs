use serde::Serialize;
use shared_types::{ContactField, ContactFields, MergeConflict, Resolution};
use std::collections::HashMap;
use tracing::{debug, info};

/// Proposed merge. `merged` carries the old value for every conflicting
/// field until that conflict is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeDraft {
    pub merged: ContactFields,
    pub conflicts: Vec<MergeConflict>,
}

impl MergeDraft {
    pub fn is_finalized(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn conflict(&self, field: ContactField) -> Option<&MergeConflict> {
        self.conflicts.iter().find(|c| c.field == field)
    }

    /// Settle one conflict. Returns false (and changes nothing) when `field`
    /// has no outstanding conflict.
    pub fn resolve(&mut self, field: ContactField, resolution: Resolution) -> bool {
        let Some(position) = self.conflicts.iter().position(|c| c.field == field) else {
            return false;
        };

        let conflict = self.conflicts.remove(position);
        self.merged.set(field, conflict.value_for(resolution));
        debug!(field = %field, resolution = %resolution, "Merge conflict resolved");
        true
    }

    pub fn into_outcome(self) -> MergeOutcome {
        if self.is_finalized() {
            MergeOutcome::Merged(self.merged)
        } else {
            MergeOutcome::Pending(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every field settled
    Merged(ContactFields),
    /// Waiting on a decision for the listed conflicts
    Pending(MergeDraft),
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged(_))
    }

    pub fn conflicts(&self) -> &[MergeConflict] {
        match self {
            MergeOutcome::Merged(_) => &[],
            MergeOutcome::Pending(draft) => &draft.conflicts,
        }
    }

    pub fn into_merged(self) -> Option<ContactFields> {
        match self {
            MergeOutcome::Merged(contact) => Some(contact),
            MergeOutcome::Pending(_) => None,
        }
    }
}

/// Compare `old` against `new` field by field.
///
/// Images and notes are concatenated, old first. Names come from `old`.
/// Empty old values are filled from `new`; differing non-empty values
/// become conflicts, reported in [`ContactField::COMPARABLE`] order.
pub fn diff(old: &ContactFields, new: &ContactFields) -> MergeDraft {
    let mut merged = ContactFields {
        first_name: old.first_name.clone(),
        last_name: old.last_name.clone(),
        images: old.images.iter().chain(&new.images).cloned().collect(),
        notes: old.notes.iter().chain(&new.notes).cloned().collect(),
        ..Default::default()
    };
    let mut conflicts = Vec::new();

    for field in ContactField::COMPARABLE {
        let old_value = old.get(field);
        let new_value = new.get(field);

        if old_value.trim().is_empty() && !new_value.trim().is_empty() {
            debug!(field = %field, "Filled empty field from new record");
            merged.set(field, new_value);
            continue;
        }

        merged.set(field, old_value);

        if !new_value.trim().is_empty() && old_value.trim() != new_value.trim() {
            conflicts.push(MergeConflict {
                field,
                old_value: old_value.to_string(),
                new_value: new_value.to_string(),
            });
        }
    }

    if !conflicts.is_empty() {
        info!(conflicts = conflicts.len(), "Merge needs resolution");
    }

    MergeDraft { merged, conflicts }
}

/// Apply caller decisions to a draft. Decisions for fields without a
/// reported conflict are ignored.
pub fn apply_resolutions(
    mut draft: MergeDraft,
    resolutions: &HashMap<ContactField, Resolution>,
) -> MergeOutcome {
    for field in ContactField::COMPARABLE {
        if let Some(resolution) = resolutions.get(&field) {
            draft.resolve(field, *resolution);
        }
    }
    draft.into_outcome()
}

/// Finalize a draft by asking `decide` about each conflict in turn
pub fn resolve_with<F>(mut draft: MergeDraft, mut decide: F) -> ContactFields
where
    F: FnMut(&MergeConflict) -> Resolution,
{
    for conflict in std::mem::take(&mut draft.conflicts) {
        let resolution = decide(&conflict);
        draft.merged.set(conflict.field, conflict.value_for(resolution));
    }
    draft.merged
}

/// [`diff`], finalized immediately when nothing conflicts
pub fn merge(old: &ContactFields, new: &ContactFields) -> MergeOutcome {
    diff(old, new).into_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ImageRef, NoteEntry};

    fn image(name: &str) -> ImageRef {
        ImageRef {
            name: name.to_string(),
            path: format!("card_images/{name}.jpg"),
        }
    }

    fn note(name: &str) -> NoteEntry {
        NoteEntry {
            name: name.to_string(),
            content: format!("{name} content"),
        }
    }

    fn jane() -> ContactFields {
        ContactFields {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_old_is_filled_without_conflict() {
        let old = jane();
        let new = ContactFields {
            company: "Acme Inc".to_string(),
            ..jane()
        };

        let draft = diff(&old, &new);
        assert_eq!(draft.merged.company, "Acme Inc");
        assert!(draft.conflict(ContactField::Company).is_none());
        assert!(draft.is_finalized());
    }

    #[test]
    fn test_differing_email_conflicts_until_resolved() {
        let old = ContactFields {
            email: "a@x.com".to_string(),
            ..jane()
        };
        let new = ContactFields {
            email: "b@x.com".to_string(),
            ..jane()
        };

        let draft = diff(&old, &new);
        assert_eq!(
            draft.conflicts,
            vec![MergeConflict {
                field: ContactField::Email,
                old_value: "a@x.com".to_string(),
                new_value: "b@x.com".to_string(),
            }]
        );
        assert_eq!(draft.merged.email, "a@x.com");

        let resolutions = HashMap::from([(ContactField::Email, Resolution::New)]);
        let merged = apply_resolutions(draft, &resolutions).into_merged().unwrap();
        assert_eq!(merged.email, "b@x.com");
    }

    #[test]
    fn test_equal_after_trim_is_not_a_conflict() {
        let old = ContactFields {
            job_title: "CTO".to_string(),
            ..jane()
        };
        let new = ContactFields {
            job_title: "  CTO ".to_string(),
            ..jane()
        };

        let draft = diff(&old, &new);
        assert!(draft.is_finalized());
        assert_eq!(draft.merged.job_title, "CTO");
    }

    #[test]
    fn test_empty_new_keeps_old() {
        let old = ContactFields {
            mobile_phone: "555-111-2222".to_string(),
            ..jane()
        };

        let outcome = merge(&old, &jane());
        assert_eq!(outcome.into_merged().unwrap().mobile_phone, "555-111-2222");
    }

    #[test]
    fn test_both_empty_stays_empty() {
        let merged = merge(&jane(), &jane()).into_merged().unwrap();
        assert_eq!(merged.address, "");
        assert_eq!(merged.business_phone, "");
    }

    #[test]
    fn test_images_and_notes_concatenate_in_order() {
        let old = ContactFields {
            images: vec![image("front"), image("back")],
            notes: vec![note("OCR")],
            ..jane()
        };
        let new = ContactFields {
            images: vec![image("scan")],
            notes: vec![note("Met at expo"), note("OCR")],
            ..jane()
        };

        let merged = merge(&old, &new).into_merged().unwrap();
        assert_eq!(merged.images, vec![image("front"), image("back"), image("scan")]);
        assert_eq!(merged.notes, vec![note("OCR"), note("Met at expo"), note("OCR")]);
    }

    #[test]
    fn test_names_come_from_old() {
        let new = ContactFields {
            first_name: "Janet".to_string(),
            last_name: "D.".to_string(),
            ..Default::default()
        };

        let merged = merge(&jane(), &new).into_merged().unwrap();
        assert_eq!(merged.first_name, "Jane");
        assert_eq!(merged.last_name, "Doe");
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let old = ContactFields {
            company: "Acme".to_string(),
            images: vec![image("front")],
            ..jane()
        };
        let new = ContactFields {
            company: "Globex".to_string(),
            address: "1 Elm St".to_string(),
            ..jane()
        };
        let (old_before, new_before) = (old.clone(), new.clone());

        let _ = diff(&old, &new);
        assert_eq!(old, old_before);
        assert_eq!(new, new_before);
    }

    #[test]
    fn test_unknown_resolution_is_ignored() {
        let old = ContactFields {
            company: "Acme".to_string(),
            ..jane()
        };
        let new = ContactFields {
            company: "Globex".to_string(),
            ..jane()
        };

        let resolutions = HashMap::from([(ContactField::Address, Resolution::New)]);
        let outcome = apply_resolutions(diff(&old, &new), &resolutions);

        assert!(!outcome.is_merged());
        assert_eq!(outcome.conflicts().len(), 1);
        assert_eq!(outcome.conflicts()[0].field, ContactField::Company);
    }

    #[test]
    fn test_partial_resolution_keeps_remaining_conflicts() {
        let old = ContactFields {
            company: "Acme".to_string(),
            address: "1 Elm St".to_string(),
            ..jane()
        };
        let new = ContactFields {
            company: "Globex".to_string(),
            address: "2 Oak Ave".to_string(),
            ..jane()
        };

        let resolutions = HashMap::from([(ContactField::Address, Resolution::New)]);
        let MergeOutcome::Pending(draft) = apply_resolutions(diff(&old, &new), &resolutions)
        else {
            panic!("Expected pending merge");
        };

        assert_eq!(draft.merged.address, "2 Oak Ave");
        assert_eq!(draft.merged.company, "Acme");
        assert_eq!(draft.conflicts.len(), 1);
        assert!(draft.conflict(ContactField::Company).is_some());
    }

    #[test]
    fn test_resolve_returns_false_for_unreported_field() {
        let mut draft = diff(&jane(), &jane());
        assert!(!draft.resolve(ContactField::Email, Resolution::New));
    }

    #[test]
    fn test_conflicts_follow_field_order() {
        let old = ContactFields {
            company: "A".to_string(),
            email: "a@a.com".to_string(),
            address: "1 A St".to_string(),
            ..jane()
        };
        let new = ContactFields {
            company: "B".to_string(),
            email: "b@b.com".to_string(),
            address: "2 B St".to_string(),
            ..jane()
        };

        let fields: Vec<ContactField> = diff(&old, &new).conflicts.iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            vec![ContactField::Company, ContactField::Email, ContactField::Address]
        );
    }

    #[test]
    fn test_resolve_with_callback() {
        let old = ContactFields {
            company: "Acme".to_string(),
            mobile_phone: "555-111-1111".to_string(),
            ..jane()
        };
        let new = ContactFields {
            company: "Globex".to_string(),
            mobile_phone: "555-222-2222".to_string(),
            ..jane()
        };

        let mut asked = Vec::new();
        let merged = resolve_with(diff(&old, &new), |conflict| {
            asked.push(conflict.field);
            if conflict.field == ContactField::Company {
                Resolution::New
            } else {
                Resolution::Old
            }
        });

        assert_eq!(asked, vec![ContactField::Company, ContactField::MobilePhone]);
        assert_eq!(merged.company, "Globex");
        assert_eq!(merged.mobile_phone, "555-111-1111");
    }

    #[test]
    fn test_merge_is_deterministic() {
        let old = ContactFields {
            email: "a@x.com".to_string(),
            ..jane()
        };
        let new = ContactFields {
            email: "b@x.com".to_string(),
            company: "Acme".to_string(),
            ..jane()
        };

        assert_eq!(diff(&old, &new), diff(&old, &new));
    }

    #[test]
    fn test_draft_serializes_conflicts() {
        let old = ContactFields {
            email: "a@x.com".to_string(),
            ..jane()
        };
        let new = ContactFields {
            email: "b@x.com".to_string(),
            ..jane()
        };

        let json = serde_json::to_value(diff(&old, &new)).unwrap();
        assert_eq!(json["conflicts"][0]["field"], "email");
        assert_eq!(json["merged"]["email"], "a@x.com");
    }
}
