use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use shared_types::{ContactFields, ImageRef, NoteEntry};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONTACTS_FILE_NAME: &str = "contacts.csv";

pub const CSV_HEADERS: [&str; 11] = [
    "ID",
    "First Name",
    "Last Name",
    "Company",
    "Job Title",
    "E-mail Address",
    "Mobile Phone",
    "Business Phone",
    "Address",
    "Notes Data",
    "Image Data",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Contact not found: {0}")]
    NotFound(String),
}

/// A stored contact: the extracted fields plus a stable ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl ContactRecord {
    pub fn new(fields: ContactFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
        }
    }
}

/// One row of contacts.csv. Images and notes are JSON arrays in a cell.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Last Name", default)]
    last_name: String,
    #[serde(rename = "Company", default)]
    company: String,
    #[serde(rename = "Job Title", default)]
    job_title: String,
    #[serde(rename = "E-mail Address", default)]
    email: String,
    #[serde(rename = "Mobile Phone", default)]
    mobile_phone: String,
    #[serde(rename = "Business Phone", default)]
    business_phone: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Notes Data", default)]
    notes_data: String,
    #[serde(rename = "Image Data", default)]
    image_data: String,
}

impl CsvRow {
    fn from_record(record: &ContactRecord) -> Result<Self, StoreError> {
        let fields = &record.fields;
        Ok(Self {
            id: record.id.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            company: fields.company.clone(),
            job_title: fields.job_title.clone(),
            email: fields.email.clone(),
            mobile_phone: fields.mobile_phone.clone(),
            business_phone: fields.business_phone.clone(),
            address: fields.address.clone(),
            notes_data: serde_json::to_string(&fields.notes)?,
            image_data: serde_json::to_string(&fields.images)?,
        })
    }

    fn into_record(self) -> ContactRecord {
        let notes: Vec<NoteEntry> = parse_json_cell(&self.id, "Notes Data", &self.notes_data);
        let images: Vec<ImageRef> = parse_json_cell(&self.id, "Image Data", &self.image_data);

        ContactRecord {
            id: self.id,
            fields: ContactFields {
                first_name: self.first_name,
                last_name: self.last_name,
                company: self.company,
                job_title: self.job_title,
                email: self.email,
                mobile_phone: self.mobile_phone,
                business_phone: self.business_phone,
                address: self.address,
                images,
                notes,
            },
        }
    }
}

/// Unreadable cells load as an empty list
fn parse_json_cell<T: serde::de::DeserializeOwned>(id: &str, column: &str, cell: &str) -> Vec<T> {
    if cell.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(cell).unwrap_or_else(|e| {
        warn!(contact_id = %id, column, error = %e, "Ignoring unreadable JSON cell");
        Vec::new()
    })
}

/// Contacts kept in `<working_directory>/contacts.csv`
pub struct ContactStore {
    path: PathBuf,
    records: Vec<ContactRecord>,
}

impl ContactStore {
    /// Load the store; a missing file is an empty store
    pub fn open(working_directory: &Path) -> Result<Self, StoreError> {
        let path = working_directory.join(CONTACTS_FILE_NAME);

        if !path.exists() {
            debug!(path = %path.display(), "No contacts file yet");
            return Ok(Self {
                path,
                records: Vec::new(),
            });
        }

        let content = fs::read(&path)?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content[..]);

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(content);
        let mut records = Vec::new();

        for row in reader.deserialize::<CsvRow>() {
            records.push(row?.into_record());
        }

        debug!(path = %path.display(), contacts = records.len(), "Loaded contacts");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ContactRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&ContactRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Result<&ContactRecord, StoreError> {
        self.find(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Replace the record with the same ID, or append it
    pub fn upsert(&mut self, record: ContactRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Take the record out of the store
    pub fn remove(&mut self, id: &str) -> Result<ContactRecord, StoreError> {
        let position = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.records.remove(position))
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut buffer = UTF8_BOM.to_vec();
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buffer);
            writer.write_record(CSV_HEADERS)?;
            for record in &self.records {
                writer.serialize(CsvRow::from_record(record)?)?;
            }
            writer.flush()?;
        }

        let mut file = fs::File::create(&self.path)?;
        file.write_all(&buffer)?;

        debug!(path = %self.path.display(), contacts = self.records.len(), "Saved contacts");
        Ok(())
    }
}
