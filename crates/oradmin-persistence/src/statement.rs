//! Administrative statement construction
//!
//! Oracle does not accept bind variables for identifiers in DDL, so every
//! administrative statement is assembled as text here. Identifiers and
//! literals pass through [`ident`] and [`literal`] unchanged: callers of the
//! console are trusted operators. Those two functions are the only place an
//! escaping or validation policy would have to go.

/// Session-level audit filter for `AUDIT SESSION`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAuditScope {
    All,
    SuccessfulOnly,
    FailedOnly,
}

/// Autoextend clause for datafiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autoextend {
    Off,
    On { next_mb: i64, max_mb: i64 },
}

fn ident(name: &str) -> &str {
    name
}

fn literal(text: &str) -> &str {
    text
}

fn ident_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Auditing
// ---------------------------------------------------------------------------

pub fn audit_session(scope: SessionAuditScope) -> String {
    match scope {
        SessionAuditScope::All => "AUDIT SESSION".to_string(),
        SessionAuditScope::SuccessfulOnly => "AUDIT SESSION WHENEVER SUCCESSFUL".to_string(),
        SessionAuditScope::FailedOnly => "AUDIT SESSION WHENEVER NOT SUCCESSFUL".to_string(),
    }
}

pub fn noaudit_session() -> String {
    "NOAUDIT SESSION".to_string()
}

pub fn audit_object(operations: &[String], object: &str) -> String {
    format!("AUDIT {} ON {}", ident_list(operations), ident(object))
}

pub fn noaudit_object(operations: &[String], object: &str) -> String {
    format!("NOAUDIT {} ON {}", ident_list(operations), ident(object))
}

pub fn audit_action(action: &str) -> String {
    format!("AUDIT {}", ident(action))
}

pub fn noaudit_action(action: &str) -> String {
    format!("NOAUDIT {}", ident(action))
}

// ---------------------------------------------------------------------------
// Users and roles
// ---------------------------------------------------------------------------

/// Allows common-user style names (no `C##` prefix) when connected to a CDB root
pub fn enable_oracle_script() -> String {
    "ALTER SESSION SET \"_ORACLE_SCRIPT\"=true".to_string()
}

pub fn create_user(username: &str, password: &str) -> String {
    format!(
        "CREATE USER {} IDENTIFIED BY {}",
        ident(username),
        literal(password)
    )
}

pub fn change_password(username: &str, password: &str) -> String {
    format!(
        "ALTER USER {} IDENTIFIED BY {}",
        ident(username),
        literal(password)
    )
}

pub fn set_account_lock(username: &str, locked: bool) -> String {
    format!(
        "ALTER USER {} ACCOUNT {}",
        ident(username),
        if locked { "LOCK" } else { "UNLOCK" }
    )
}

pub fn drop_user(username: &str, cascade: bool) -> String {
    if cascade {
        format!("DROP USER {} CASCADE", ident(username))
    } else {
        format!("DROP USER {}", ident(username))
    }
}

pub fn create_role(role: &str) -> String {
    format!("CREATE ROLE {}", ident(role))
}

pub fn grant(privilege_or_role: &str, grantee: &str) -> String {
    format!("GRANT {} TO {}", ident(privilege_or_role), ident(grantee))
}

/// True for statements whose text carries a credential and must not be logged
pub fn carries_secret(sql: &str) -> bool {
    sql.to_ascii_uppercase().contains("IDENTIFIED BY")
}

// ---------------------------------------------------------------------------
// Tablespaces
// ---------------------------------------------------------------------------

fn autoextend_clause(autoextend: Autoextend) -> String {
    match autoextend {
        Autoextend::Off => "AUTOEXTEND OFF".to_string(),
        Autoextend::On { next_mb, max_mb } => {
            format!("AUTOEXTEND ON NEXT {}M MAXSIZE {}M", next_mb, max_mb)
        }
    }
}

pub fn create_tablespace(name: &str, datafile: &str, size_mb: i64, autoextend: Autoextend) -> String {
    format!(
        "CREATE TABLESPACE {} DATAFILE '{}' SIZE {}M {}",
        ident(name),
        literal(datafile),
        size_mb,
        autoextend_clause(autoextend)
    )
}

/// `ALTER DATABASE DATAFILE`; with no autoextend change the statement is a no-op touch
pub fn alter_datafile(datafile: &str, autoextend: Option<Autoextend>) -> String {
    match autoextend {
        Some(clause) => format!(
            "ALTER DATABASE DATAFILE '{}' {}",
            literal(datafile),
            autoextend_clause(clause)
        ),
        None => format!("ALTER DATABASE DATAFILE '{}'", literal(datafile)),
    }
}

pub fn drop_tablespace(name: &str, including_contents: bool) -> String {
    if including_contents {
        format!(
            "DROP TABLESPACE {} INCLUDING CONTENTS AND DATAFILES",
            ident(name)
        )
    } else {
        format!("DROP TABLESPACE {}", ident(name))
    }
}

pub fn coalesce_tablespace(name: &str) -> String {
    format!("ALTER TABLESPACE {} COALESCE", ident(name))
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

pub fn clear_plan_table() -> String {
    "DELETE FROM PLAN_TABLE".to_string()
}

pub fn explain_plan(sql_text: &str) -> String {
    format!("EXPLAIN PLAN FOR {}", literal(sql_text))
}

pub fn create_index(index: &str, table: &str, columns: &[String], unique: bool) -> String {
    format!(
        "CREATE {}INDEX {} ON {}({})",
        if unique { "UNIQUE " } else { "" },
        ident(index),
        ident(table),
        ident_list(columns)
    )
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

pub fn create_directory(alias: &str, path: &str) -> String {
    format!(
        "CREATE OR REPLACE DIRECTORY {} AS '{}'",
        ident(alias),
        literal(path)
    )
}
