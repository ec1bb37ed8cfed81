//! Pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/query/update/delete over the single `pets` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Filters are either "all rows" or equality on `_id`.
//! - Only column identifiers from `contract` are interpolated into SQL;
//!   every value is bound.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::contract::{
    Column, ResolvedAddress, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT,
    TABLE_NAME,
};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::pet::{Gender, NewPet, Pet, PetId, PetValues};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filter: every row, or the row with one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Id(PetId),
}

impl From<ResolvedAddress> for Filter {
    fn from(value: ResolvedAddress) -> Self {
        match value {
            ResolvedAddress::Collection => Self::All,
            ResolvedAddress::Item(id) => Self::Id(id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Single-column sort. Ties are broken by `_id ASC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::asc(Column::Id)
    }
}

/// Query options for reading pets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetQuery {
    pub filter: Filter,
    /// Columns to return. `None` or an empty list returns every column.
    pub projection: Option<Vec<Column>>,
    pub order: Option<SortOrder>,
}

impl PetQuery {
    pub fn all() -> Self {
        Self::with_filter(Filter::All)
    }

    pub fn with_filter(filter: Filter) -> Self {
        Self {
            filter,
            projection: None,
            order: None,
        }
    }

    fn selected_columns(&self) -> Vec<Column> {
        match self.projection.as_deref() {
            Some(columns) if !columns.is_empty() => {
                let mut selected = Vec::with_capacity(columns.len());
                for column in columns {
                    if !selected.contains(column) {
                        selected.push(*column);
                    }
                }
                selected
            }
            _ => Column::ALL.to_vec(),
        }
    }
}

/// One result row. Fields are `Some` only for projected columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PetRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl PetRow {
    /// Full record, when every column was projected.
    pub fn into_pet(self) -> Option<Pet> {
        Some(Pet {
            id: self.id?,
            name: self.name?,
            breed: self.breed?,
            gender: self.gender?,
            weight: self.weight?,
        })
    }
}

/// Finite, single-pass result set of a pet query.
#[derive(Debug)]
pub struct PetRows {
    columns: Vec<Column>,
    rows: std::vec::IntoIter<PetRow>,
}

impl PetRows {
    fn new(columns: Vec<Column>, rows: Vec<PetRow>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
        }
    }

    /// Columns present in every row, in projection order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl Iterator for PetRows {
    type Item = PetRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PetRows {}

/// Repository interface for pet storage.
pub trait PetRepository {
    /// Appends one row and returns its store-assigned id.
    fn insert(&self, pet: &NewPet) -> RepoResult<PetId>;
    fn query(&self, query: &PetQuery) -> RepoResult<PetRows>;
    /// Writes supplied fields to every matching row; returns rows changed.
    fn update(&self, filter: Filter, values: &PetValues) -> RepoResult<usize>;
    /// Removes every matching row; returns rows removed.
    fn delete(&self, filter: Filter) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn insert(&self, pet: &NewPet) -> RepoResult<PetId> {
        self.conn.execute(
            &format!(
                "INSERT INTO {TABLE_NAME} (
                    {COLUMN_NAME},
                    {COLUMN_BREED},
                    {COLUMN_GENDER},
                    {COLUMN_WEIGHT}
                ) VALUES (?1, ?2, ?3, ?4);"
            ),
            params![
                pet.name.as_str(),
                pet.breed.as_str(),
                pet.gender.as_db(),
                pet.weight,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn query(&self, query: &PetQuery) -> RepoResult<PetRows> {
        let columns = query.selected_columns();
        let column_list = columns
            .iter()
            .map(|column| column.as_sql())
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {column_list} FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter(&mut sql, &mut bind_values, query.filter);

        let order = query.order.unwrap_or_default();
        let direction = match order.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {} {direction}", order.column.as_sql()));
        if order.column != Column::Id {
            sql.push_str(&format!(", {COLUMN_ID} ASC"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row, &columns)?);
        }

        Ok(PetRows::new(columns, pets))
    }

    fn update(&self, filter: Filter, values: &PetValues) -> RepoResult<usize> {
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &values.name {
            assignments.push(format!("{COLUMN_NAME} = ?"));
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(breed) = &values.breed {
            assignments.push(format!("{COLUMN_BREED} = ?"));
            bind_values.push(Value::Text(breed.clone()));
        }
        if let Some(gender) = values.gender {
            assignments.push(format!("{COLUMN_GENDER} = ?"));
            bind_values.push(Value::Integer(gender.as_db()));
        }
        if let Some(weight) = values.weight {
            assignments.push(format!("{COLUMN_WEIGHT} = ?"));
            bind_values.push(Value::Integer(weight));
        }

        if assignments.is_empty() {
            return Ok(0);
        }

        let mut sql = format!("UPDATE {TABLE_NAME} SET {}", assignments.join(", "));
        push_filter(&mut sql, &mut bind_values, filter);

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete(&self, filter: Filter) -> RepoResult<usize> {
        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        let mut bind_values: Vec<Value> = Vec::new();
        push_filter(&mut sql, &mut bind_values, filter);

        let removed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(removed)
    }
}

fn push_filter(sql: &mut String, bind_values: &mut Vec<Value>, filter: Filter) {
    if let Filter::Id(id) = filter {
        sql.push_str(&format!(" WHERE {COLUMN_ID} = ?"));
        bind_values.push(Value::Integer(id));
    }
}

fn parse_pet_row(row: &Row<'_>, columns: &[Column]) -> RepoResult<PetRow> {
    let mut pet = PetRow::default();

    for (index, column) in columns.iter().enumerate() {
        match column {
            Column::Id => pet.id = Some(row.get(index)?),
            Column::Name => {
                let name: String = row.get(index)?;
                if name.is_empty() {
                    return Err(RepoError::InvalidData(format!(
                        "empty name in {TABLE_NAME}.{COLUMN_NAME}"
                    )));
                }
                pet.name = Some(name);
            }
            Column::Breed => pet.breed = Some(row.get(index)?),
            Column::Gender => {
                let raw: i64 = row.get(index)?;
                let gender = Gender::try_from(raw).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid gender value `{raw}` in {TABLE_NAME}.{COLUMN_GENDER}"
                    ))
                })?;
                pet.gender = Some(gender);
            }
            Column::Weight => {
                let weight: i64 = row.get(index)?;
                if weight < 0 {
                    return Err(RepoError::InvalidData(format!(
                        "negative weight `{weight}` in {TABLE_NAME}.{COLUMN_WEIGHT}"
                    )));
                }
                pet.weight = Some(weight);
            }
        }
    }

    Ok(pet)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [TABLE_NAME],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(TABLE_NAME));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TABLE_NAME});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in Column::ALL {
        if !present.iter().any(|name| name == column.as_sql()) {
            return Err(RepoError::MissingRequiredColumn {
                table: TABLE_NAME,
                column: column.as_sql(),
            });
        }
    }

    Ok(())
}
