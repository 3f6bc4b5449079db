use sqlx::prelude::FromRow;

pub const SEED_INTEGER: i64 = 1;
pub const SEED_TEXT: &str = "sample";
pub const SEED_BLOB: &[u8] = b"sample_blob";
pub const SEED_REAL: f64 = 0.5;

/// The declared column types a well-formed fixture table may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Blob,
    Real,
}

impl ColumnType {
    pub const ALL: [ColumnType; 4] = [Self::Integer, Self::Text, Self::Blob, Self::Real];

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Real => "REAL",
        }
    }

    /// Match a declared type as reported by `pragma_table_info`, ignoring case
    pub fn from_declared(declared: &str) -> Option<Self> {
        let declared = declared.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_sql().eq_ignore_ascii_case(declared))
    }
}

/// A table provisioned by one of the fixtures
pub trait FixtureTable {
    const NAME: &'static str;

    /// Statements run in order to (re)create the table, starting with a drop
    fn setup_sql() -> &'static [&'static str];

    /// Parameterized insert for the seed row
    fn insert_sql() -> &'static str;
}

/// Four typed columns, `col_integer` NOT NULL
pub struct TableA;

impl FixtureTable for TableA {
    const NAME: &'static str = "tbl_a";

    fn setup_sql() -> &'static [&'static str] {
        &[
            "DROP TABLE IF EXISTS tbl_a",
            r#"
            CREATE TABLE tbl_a (
                col_integer INTEGER NOT NULL,
                col_text TEXT,
                col_blob BLOB,
                col_real REAL
            )
            "#,
        ]
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO tbl_a (col_integer, col_text, col_blob, col_real) VALUES (?, ?, ?, ?)"
    }
}

/// Same shape as `tbl_a` but every column nullable
pub struct TableB;

impl FixtureTable for TableB {
    const NAME: &'static str = "tbl_b";

    fn setup_sql() -> &'static [&'static str] {
        &[
            "DROP TABLE IF EXISTS tbl_b",
            r#"
            CREATE TABLE tbl_b (
                col_integer INTEGER,
                col_text TEXT,
                col_blob BLOB,
                col_real REAL
            )
            "#,
        ]
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO tbl_b (col_integer, col_text, col_blob, col_real) VALUES (?, ?, ?, ?)"
    }
}

/// A `tbl_a` whose single column declares a type outside [`ColumnType`]
pub struct NonexistentTypeTable;

impl FixtureTable for NonexistentTypeTable {
    const NAME: &'static str = "tbl_a";

    fn setup_sql() -> &'static [&'static str] {
        &[
            "DROP TABLE IF EXISTS tbl_a",
            r#"
            CREATE TABLE tbl_a (
                col_nonexistent NONEXISTENT
            )
            "#,
        ]
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO tbl_a (col_nonexistent) VALUES (?)"
    }
}

/// One row of `tbl_a` or `tbl_b`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SampleRow {
    pub col_integer: Option<i64>,
    pub col_text: Option<String>,
    pub col_blob: Option<Vec<u8>>,
    pub col_real: Option<f64>,
}

impl SampleRow {
    /// The row seeded into both valid tables
    pub fn seed() -> Self {
        Self {
            col_integer: Some(SEED_INTEGER),
            col_text: Some(SEED_TEXT.to_string()),
            col_blob: Some(SEED_BLOB.to_vec()),
            col_real: Some(SEED_REAL),
        }
    }
}
