//! Driver Registry
//!
//! Central, read-only table of every known database vendor.
//! Lookups scan the table in definition order and fall back to `UNKNOWN`.

use tracing::{debug, trace};

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::types::{DatabaseDriver, DriverRecord, ProductNameMatch};

const JDBC_PREFIX: &str = "jdbc";

const fn record(
    driver: DatabaseDriver,
    id: &'static str,
    product_name: Option<&'static str>,
    driver_class_name: Option<&'static str>,
    xa_data_source_class_name: Option<&'static str>,
    validation_query: Option<&'static str>,
    product_name_match: ProductNameMatch,
) -> DriverRecord {
    DriverRecord {
        driver,
        id,
        product_name,
        driver_class_name,
        xa_data_source_class_name,
        validation_query,
        product_name_match,
    }
}

// Order matters: it must follow `DatabaseDriver::ALL`, and it is the
// tie-break for both lookups (DB2 is tried before DB2_AS400).
static DRIVERS: [DriverRecord; 17] = [
    record(
        DatabaseDriver::Unknown,
        "unknown",
        None,
        None,
        None,
        None,
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Derby,
        "derby",
        Some("Apache Derby"),
        Some("org.apache.derby.jdbc.EmbeddedDriver"),
        Some("org.apache.derby.jdbc.EmbeddedXADataSource"),
        Some("SELECT 1 FROM SYSIBM.SYSDUMMY1"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::H2,
        "h2",
        Some("H2"),
        Some("org.h2.Driver"),
        Some("org.h2.jdbcx.JdbcDataSource"),
        Some("SELECT 1"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Hsqldb,
        "hsqldb",
        Some("HSQL Database Engine"),
        Some("org.hsqldb.jdbc.JDBCDriver"),
        Some("org.hsqldb.jdbc.pool.JDBCXADataSource"),
        Some("SELECT COUNT(*) FROM INFORMATION_SCHEMA.SYSTEM_USERS"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Sqlite,
        "sqlite",
        Some("SQLite"),
        Some("org.sqlite.JDBC"),
        None,
        None,
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Mysql,
        "mysql",
        Some("MySQL"),
        Some("com.mysql.jdbc.Driver"),
        Some("com.mysql.jdbc.jdbc2.optional.MysqlXADataSource"),
        Some("SELECT 1"),
        ProductNameMatch::Exact,
    ),
    // MariaDB reports itself as "MySQL", so MYSQL always wins a product name lookup.
    record(
        DatabaseDriver::Mariadb,
        "mariadb",
        Some("MySQL"),
        Some("org.mariadb.jdbc.Driver"),
        Some("org.mariadb.jdbc.MariaDbDataSource"),
        Some("SELECT 1"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Gae,
        "gae",
        None,
        Some("com.google.appengine.api.rdbms.AppEngineDriver"),
        None,
        None,
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Oracle,
        "oracle",
        Some("Oracle"),
        Some("oracle.jdbc.OracleDriver"),
        Some("oracle.jdbc.xa.client.OracleXADataSource"),
        Some("SELECT 'Hello' from DUAL"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Postgresql,
        "postgresql",
        Some("PostgreSQL"),
        Some("org.postgresql.Driver"),
        Some("org.postgresql.xa.PGXADataSource"),
        Some("SELECT 1"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Jtds,
        "jtds",
        None,
        Some("net.sourceforge.jtds.jdbc.Driver"),
        None,
        None,
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Sqlserver,
        "sqlserver",
        Some("SQL SERVER"),
        Some("com.microsoft.sqlserver.jdbc.SQLServerDriver"),
        Some("com.microsoft.sqlserver.jdbc.SQLServerXADataSource"),
        Some("SELECT 1"),
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Firebird,
        "firebird",
        Some("Firebird"),
        Some("org.firebirdsql.jdbc.FBDriver"),
        Some("org.firebirdsql.pool.FBConnectionPoolDataSource"),
        Some("SELECT 1 FROM RDB$DATABASE"),
        ProductNameMatch::StartsWith("firebird"),
    ),
    record(
        DatabaseDriver::Db2,
        "db2",
        Some("DB2"),
        Some("com.ibm.db2.jcc.DB2Driver"),
        Some("com.ibm.db2.jcc.DB2XADataSource"),
        Some("SELECT 1 FROM SYSIBM.SYSDUMMY1"),
        ProductNameMatch::StartsWith("db2/"),
    ),
    record(
        DatabaseDriver::Db2As400,
        "db2",
        Some("DB2 UDB for AS/400"),
        Some("com.ibm.as400.access.AS400JDBCDriver"),
        Some("com.ibm.as400.access.AS400JDBCXADataSource"),
        Some("SELECT 1 FROM SYSIBM.SYSDUMMY1"),
        ProductNameMatch::Contains("as/400"),
    ),
    record(
        DatabaseDriver::Teradata,
        "teradata",
        Some("Teradata"),
        Some("com.teradata.jdbc.TeraDriver"),
        None,
        None,
        ProductNameMatch::Exact,
    ),
    record(
        DatabaseDriver::Informix,
        "informix",
        Some("Informix Dynamic Server"),
        Some("com.informix.jdbc.IfxDriver"),
        None,
        Some("select count(*) from systables"),
        ProductNameMatch::Exact,
    ),
];

/// Read-only registry of all known database drivers
pub struct DriverRegistry;

impl DriverRegistry {
    /// All records, in definition order.
    pub fn all() -> &'static [DriverRecord] {
        &DRIVERS
    }

    pub fn get(driver: DatabaseDriver) -> &'static DriverRecord {
        &DRIVERS[driver as usize]
    }

    pub fn unknown() -> &'static DriverRecord {
        Self::get(DatabaseDriver::Unknown)
    }

    /// Finds the driver for a JDBC URL.
    ///
    /// Absent or empty URLs resolve to `UNKNOWN`. A non-empty URL must start
    /// with `jdbc`, otherwise `InvalidArgument` is returned. The rest of the
    /// URL is lower-cased and matched against `:<key>:` for every record.
    pub fn from_jdbc_url<'a>(
        url: impl Into<Option<&'a str>>,
    ) -> EngineResult<&'static DriverRecord> {
        let url = match url.into() {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(Self::unknown()),
        };

        let without_prefix = url
            .strip_prefix(JDBC_PREFIX)
            .ok_or_else(|| EngineError::invalid_argument("URL must start with 'jdbc'"))?
            .to_lowercase();

        let resolved = DRIVERS
            .iter()
            .filter(|candidate| !candidate.driver.is_unknown())
            .find(|candidate| without_prefix.starts_with(&candidate.url_prefix()))
            .unwrap_or_else(Self::unknown);

        // The URL itself may carry credentials, so only the outcome is logged.
        debug!(driver = %resolved.driver, "resolved driver from JDBC URL");
        Ok(resolved)
    }

    /// Finds the driver for a product name reported by connection metadata.
    ///
    /// Absent, empty or unrecognized names resolve to `UNKNOWN`.
    pub fn from_product_name<'a>(
        product_name: impl Into<Option<&'a str>>,
    ) -> &'static DriverRecord {
        let Some(product_name) = product_name.into().filter(|name| !name.is_empty()) else {
            return Self::unknown();
        };

        let resolved = DRIVERS
            .iter()
            .find(|candidate| candidate.matches_product_name(product_name))
            .unwrap_or_else(Self::unknown);

        trace!(driver = %resolved.driver, "resolved driver from product name");
        resolved
    }
}
