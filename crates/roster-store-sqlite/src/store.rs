//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  contact::{Contact, ContactStatus, ContactUpdate, NewContact},
  policy::ListScope,
  store::ContactStore,
};

use crate::{
  Result,
  encode::{CONTACT_COLUMNS, RawContact, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("contact schema ready");
    Ok(())
  }

  async fn fetch(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"
              ),
              rusqlite::params![id_str],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn add_contact(&self, input: NewContact) -> Result<Contact> {
    let now = Utc::now();
    let contact = Contact {
      contact_id: Uuid::new_v4(),
      owner_id:   input.owner_id,
      fields:     input.fields,
      status:     input.status,
      created_at: now,
      updated_at: now,
    };

    let id_str     = encode_uuid(contact.contact_id);
    let owner      = contact.owner_id.clone();
    let f          = contact.fields.clone();
    let status_str = encode_status(contact.status);
    let at_str     = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             contact_id, owner_id, name, address, city, state, zip, email,
             status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id_str, owner, f.name, f.address, f.city, f.state, f.zip, f.email,
            status_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(contact)
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    self.fetch(id).await
  }

  async fn list_contacts(&self, scope: &ListScope) -> Result<Vec<Contact>> {
    let owner = match scope {
      ListScope::All => None,
      ListScope::OwnedOrApproved(user_id) => Some(user_id.clone()),
    };
    let approved = encode_status(ContactStatus::Approved);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(owner) = owner {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE status = ?1 OR owner_id = ?2
             ORDER BY name, contact_id"
          ))?;
          stmt
            .query_map(rusqlite::params![approved, owner], RawContact::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY name, contact_id"
          ))?;
          stmt
            .query_map([], RawContact::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn update_contact(&self, update: ContactUpdate) -> Result<Option<Contact>> {
    let id         = update.contact_id;
    let id_str     = encode_uuid(id);
    let f          = update.fields;
    let status_str = encode_status(update.status);
    let at_str     = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contacts
           SET name = ?2, address = ?3, city = ?4, state = ?5, zip = ?6,
               email = ?7, status = ?8, updated_at = ?9
           WHERE contact_id = ?1",
          rusqlite::params![
            id_str, f.name, f.address, f.city, f.state, f.zip, f.email,
            status_str, at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.fetch(id).await
  }

  async fn remove_contact(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
