//! Driver identity and metadata types
//!
//! `DatabaseDriver` is the stable key callers branch on; `DriverRecord` is the
//! immutable metadata bundle the registry holds for each key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::registry::DriverRegistry;

/// Known database vendors, in registry definition order.
///
/// The lower-cased key doubles as the JDBC URL sub-protocol token, so
/// `jdbc:db2_as400:...` resolves to [`DatabaseDriver::Db2As400`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum DatabaseDriver {
    /// Fallback for anything the registry cannot identify.
    Unknown,
    Derby,
    H2,
    Hsqldb,
    Sqlite,
    Mysql,
    Mariadb,
    /// Google App Engine.
    Gae,
    Oracle,
    Postgresql,
    /// jTDS serves several vendors, so it has no single product name.
    Jtds,
    Sqlserver,
    Firebird,
    Db2,
    #[serde(rename = "DB2_AS400")]
    Db2As400,
    Teradata,
    Informix,
}

impl DatabaseDriver {
    /// Every key, in definition order.
    pub const ALL: [DatabaseDriver; 17] = [
        DatabaseDriver::Unknown,
        DatabaseDriver::Derby,
        DatabaseDriver::H2,
        DatabaseDriver::Hsqldb,
        DatabaseDriver::Sqlite,
        DatabaseDriver::Mysql,
        DatabaseDriver::Mariadb,
        DatabaseDriver::Gae,
        DatabaseDriver::Oracle,
        DatabaseDriver::Postgresql,
        DatabaseDriver::Jtds,
        DatabaseDriver::Sqlserver,
        DatabaseDriver::Firebird,
        DatabaseDriver::Db2,
        DatabaseDriver::Db2As400,
        DatabaseDriver::Teradata,
        DatabaseDriver::Informix,
    ];

    /// Upper-case key name, e.g. `"DB2_AS400"`.
    pub fn key(self) -> &'static str {
        match self {
            DatabaseDriver::Unknown => "UNKNOWN",
            DatabaseDriver::Derby => "DERBY",
            DatabaseDriver::H2 => "H2",
            DatabaseDriver::Hsqldb => "HSQLDB",
            DatabaseDriver::Sqlite => "SQLITE",
            DatabaseDriver::Mysql => "MYSQL",
            DatabaseDriver::Mariadb => "MARIADB",
            DatabaseDriver::Gae => "GAE",
            DatabaseDriver::Oracle => "ORACLE",
            DatabaseDriver::Postgresql => "POSTGRESQL",
            DatabaseDriver::Jtds => "JTDS",
            DatabaseDriver::Sqlserver => "SQLSERVER",
            DatabaseDriver::Firebird => "FIREBIRD",
            DatabaseDriver::Db2 => "DB2",
            DatabaseDriver::Db2As400 => "DB2_AS400",
            DatabaseDriver::Teradata => "TERADATA",
            DatabaseDriver::Informix => "INFORMIX",
        }
    }

    pub fn record(self) -> &'static DriverRecord {
        DriverRegistry::get(self)
    }

    pub fn is_unknown(self) -> bool {
        self == DatabaseDriver::Unknown
    }

    /// Short canonical identifier. Not unique: both DB2 variants report `"db2"`.
    pub fn id(self) -> &'static str {
        self.record().id
    }

    pub fn product_name(self) -> Option<&'static str> {
        self.record().product_name
    }

    pub fn driver_class_name(self) -> Option<&'static str> {
        self.record().driver_class_name
    }

    pub fn xa_data_source_class_name(self) -> Option<&'static str> {
        self.record().xa_data_source_class_name
    }

    pub fn validation_query(self) -> Option<&'static str> {
        self.record().validation_query
    }

    /// See [`DriverRegistry::from_jdbc_url`].
    pub fn from_jdbc_url<'a>(url: impl Into<Option<&'a str>>) -> EngineResult<Self> {
        DriverRegistry::from_jdbc_url(url).map(|record| record.driver)
    }

    /// See [`DriverRegistry::from_product_name`].
    pub fn from_product_name<'a>(product_name: impl Into<Option<&'a str>>) -> Self {
        DriverRegistry::from_product_name(product_name).driver
    }
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl TryFrom<String> for DatabaseDriver {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for DatabaseDriver {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|driver| driver.key().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::invalid_argument(format!("Unknown database driver: {s}")))
    }
}

/// How a record recognizes the product name reported by a live connection.
///
/// Every rule accepts a case-insensitive exact match on the record's product
/// name; the non-`Exact` rules additionally accept a family-qualified string
/// such as `"DB2/LINUXX8664"`. Patterns are stored lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductNameMatch {
    Exact,
    StartsWith(&'static str),
    Contains(&'static str),
}

impl ProductNameMatch {
    fn matches(self, expected: Option<&str>, product_name: &str) -> bool {
        let lowered = product_name.to_lowercase();
        if expected.is_some_and(|expected| expected.to_lowercase() == lowered) {
            return true;
        }
        match self {
            ProductNameMatch::Exact => false,
            ProductNameMatch::StartsWith(prefix) => lowered.starts_with(prefix),
            ProductNameMatch::Contains(needle) => lowered.contains(needle),
        }
    }
}

/// Connectivity metadata for one vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverRecord {
    pub driver: DatabaseDriver,
    pub id: &'static str,
    /// Product name expected from connection metadata, if the vendor has one.
    pub product_name: Option<&'static str>,
    pub driver_class_name: Option<&'static str>,
    /// XA-capable data source, independent of `driver_class_name`.
    pub xa_data_source_class_name: Option<&'static str>,
    /// Cheap statement to check that a connection is still alive.
    pub validation_query: Option<&'static str>,
    #[serde(skip)]
    pub product_name_match: ProductNameMatch,
}

impl DriverRecord {
    pub fn matches_product_name(&self, product_name: &str) -> bool {
        self.product_name_match.matches(self.product_name, product_name)
    }

    /// Sub-protocol prefix this record claims, e.g. `":mysql:"`.
    pub fn url_prefix(&self) -> String {
        format!(":{}:", self.driver.key().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_from_str() {
        for driver in DatabaseDriver::ALL {
            let parsed: DatabaseDriver = driver.key().parse().expect("should parse");
            assert_eq!(parsed, driver);
        }
        assert_eq!(
            "db2_as400".parse::<DatabaseDriver>(),
            Ok(DatabaseDriver::Db2As400)
        );
    }

    #[test]
    fn unknown_key_name_is_invalid_argument() {
        let err = "cockroach".parse::<DatabaseDriver>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument { .. }));
    }

    #[test]
    fn serializes_as_key_name() {
        let json = serde_json::to_string(&DatabaseDriver::Db2As400).expect("should serialize");
        assert_eq!(json, r#""DB2_AS400""#);

        let driver: DatabaseDriver =
            serde_json::from_str(r#""POSTGRESQL""#).expect("should deserialize");
        assert_eq!(driver, DatabaseDriver::Postgresql);
    }

    #[test]
    fn deserializes_key_names_like_from_str() {
        let driver: DatabaseDriver =
            serde_json::from_str(r#""mysql""#).expect("should deserialize");
        assert_eq!(driver, DatabaseDriver::Mysql);

        let driver: DatabaseDriver =
            serde_json::from_str(r#"" db2_as400 ""#).expect("should deserialize");
        assert_eq!(driver, DatabaseDriver::Db2As400);

        let err = serde_json::from_str::<DatabaseDriver>(r#""nosuchdb""#).unwrap_err();
        assert!(err.to_string().contains("Unknown database driver"));
    }

    #[test]
    fn exact_rule_ignores_case() {
        let rule = ProductNameMatch::Exact;
        assert!(rule.matches(Some("PostgreSQL"), "postgresql"));
        assert!(!rule.matches(Some("PostgreSQL"), "PostgreSQL 16"));
        assert!(!rule.matches(None, "anything"));
    }

    #[test]
    fn extended_rules_fall_back_to_exact_match() {
        let prefix = ProductNameMatch::StartsWith("db2/");
        assert!(prefix.matches(Some("DB2"), "db2"));
        assert!(prefix.matches(Some("DB2"), "DB2/NT64"));
        assert!(!prefix.matches(Some("DB2"), "DB2 UDB for AS/400"));

        let contains = ProductNameMatch::Contains("as/400");
        assert!(contains.matches(None, "IBM DB2 for AS/400 V7"));
    }

    #[test]
    fn record_serializes_without_match_rule() {
        let value =
            serde_json::to_value(DatabaseDriver::Sqlite.record()).expect("should serialize");
        assert_eq!(value["driver"], "SQLITE");
        assert_eq!(value["driver_class_name"], "org.sqlite.JDBC");
        assert!(value["validation_query"].is_null());
        assert!(value.get("product_name_match").is_none());
    }
}
