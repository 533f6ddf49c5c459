//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and statuses as their snake_case names.

use chrono::{DateTime, Utc};
use roster_core::contact::{Contact, ContactFields, ContactStatus};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ContactStatus ────────────────────────────────────────────────────────────

pub fn encode_status(s: ContactStatus) -> &'static str {
  match s {
    ContactStatus::Submitted => "submitted",
    ContactStatus::Approved => "approved",
    ContactStatus::Rejected => "rejected",
  }
}

pub fn decode_status(s: &str) -> Result<ContactStatus> {
  s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawContact::from_row`].
pub const CONTACT_COLUMNS: &str = "contact_id, owner_id, name, address, city, \
                                   state, zip, email, status, created_at, \
                                   updated_at";

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id: String,
  pub owner_id:   String,
  pub name:       String,
  pub address:    String,
  pub city:       String,
  pub state:      String,
  pub zip:        String,
  pub email:      String,
  pub status:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id: row.get(0)?,
      owner_id:   row.get(1)?,
      name:       row.get(2)?,
      address:    row.get(3)?,
      city:       row.get(4)?,
      state:      row.get(5)?,
      zip:        row.get(6)?,
      email:      row.get(7)?,
      status:     row.get(8)?,
      created_at: row.get(9)?,
      updated_at: row.get(10)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      contact_id: decode_uuid(&self.contact_id)?,
      owner_id:   self.owner_id,
      fields:     ContactFields {
        name:    self.name,
        address: self.address,
        city:    self.city,
        state:   self.state,
        zip:     self.zip,
        email:   self.email,
      },
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
