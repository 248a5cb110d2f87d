use contact_merge::{apply_resolutions, diff, MergeDraft, MergeOutcome};
use extractors::BusinessCardExtractor;
use shared_types::{ContactField, ContactFields, Extractor, ImageRef, NoteEntry, Resolution};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

use crate::config::ImportConfig;
use crate::store::{ContactRecord, ContactStore, StoreError};

/// Parse `FIELD=old|new` from the command line
pub fn parse_field_resolution(arg: &str) -> Result<(ContactField, Resolution), String> {
    let (field, choice) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=old|new, got '{arg}'"))?;
    let field: ContactField = field.parse().map_err(|e| format!("{e}"))?;
    let choice: Resolution = choice.parse().map_err(|e| format!("{e}"))?;
    Ok((field, choice))
}

/// Build the resolution table. `prefer` covers every comparable field;
/// explicit per-field choices take precedence over it.
pub fn resolution_table(
    explicit: &[(ContactField, Resolution)],
    prefer: Option<Resolution>,
) -> HashMap<ContactField, Resolution> {
    let mut table = HashMap::new();
    if let Some(resolution) = prefer {
        for field in ContactField::COMPARABLE {
            table.insert(field, resolution);
        }
    }
    table.extend(explicit.iter().copied());
    table
}

/// Extract a card and attach its images plus the raw OCR text as a note
pub fn build_import(
    extractor: &BusinessCardExtractor,
    raw_text: &str,
    images: &[PathBuf],
    settings: &ImportConfig,
) -> ContactFields {
    let mut contact = extractor.extract(raw_text);

    for (i, path) in images.iter().enumerate() {
        let name = if images.len() == 1 {
            settings.image_name.clone()
        } else {
            format!("{} {}", settings.image_name, i + 1)
        };
        contact.images.push(ImageRef {
            name,
            path: path.display().to_string(),
        });
    }

    contact.notes.push(NoteEntry {
        name: settings.ocr_note_name.clone(),
        content: raw_text.to_string(),
    });

    contact
}

/// Store a hand-entered contact under a fresh ID
pub fn add_contact(store: &mut ContactStore, fields: ContactFields) -> String {
    let record = ContactRecord::new(fields);
    let id = record.id.clone();
    info!(contact_id = %id, "Adding manual contact");
    store.upsert(record);
    id
}

/// Drop a contact; an unknown ID is an error and leaves the store untouched
pub fn delete_contact(store: &mut ContactStore, id: &str) -> Result<ContactRecord, StoreError> {
    let record = store.remove(id)?;
    info!(contact_id = %id, "Deleted contact");
    Ok(record)
}

#[derive(Debug)]
pub enum ImportOutcome {
    Created(String),
    Merged(String),
    /// Nothing was written; the draft lists what still needs a decision
    Pending(MergeDraft),
}

/// Add `contact` to the store, or merge it into `merge_into` when given.
/// The store is only modified in memory; the caller saves it.
pub fn import_contact(
    store: &mut ContactStore,
    contact: ContactFields,
    merge_into: Option<&str>,
    resolutions: &HashMap<ContactField, Resolution>,
) -> Result<ImportOutcome, StoreError> {
    let Some(id) = merge_into else {
        let record = ContactRecord::new(contact);
        let id = record.id.clone();
        info!(contact_id = %id, "Adding new contact");
        store.upsert(record);
        return Ok(ImportOutcome::Created(id));
    };

    let existing = store.get(id)?;
    let draft = diff(&existing.fields, &contact);

    match apply_resolutions(draft, resolutions) {
        MergeOutcome::Merged(fields) => {
            info!(contact_id = %id, "Merged into existing contact");
            store.upsert(ContactRecord {
                id: id.to_string(),
                fields,
            });
            Ok(ImportOutcome::Merged(id.to_string()))
        }
        MergeOutcome::Pending(draft) => Ok(ImportOutcome::Pending(draft)),
    }
}
