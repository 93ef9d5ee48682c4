//! Users, roles and privileges

use std::sync::Arc;

use tracing::{debug, info, warn};

use oradmin_common::{CommandStatus, Result};
use oradmin_persistence::{DatabaseGateway, Row, Session, param, statement};

use super::require;
use crate::model::*;

const LIST_USERS_SQL: &str = "SELECT USERNAME, ACCOUNT_STATUS, LOCK_DATE, CREATED, \
     PROFILE, DEFAULT_TABLESPACE \
     FROM DBA_USERS \
     ORDER BY USERNAME";

const LIST_PRIVILEGES_SQL: &str = "SELECT PRIVILEGE, ADMIN_OPTION \
     FROM DBA_SYS_PRIVS WHERE GRANTEE = :usuario \
     UNION ALL \
     SELECT GRANTED_ROLE, ADMIN_OPTION \
     FROM DBA_ROLE_PRIVS WHERE GRANTEE = :usuario";

const LIST_ROLES_SQL: &str = "SELECT ROLE, AUTHENTICATION_TYPE, COMMON, ORACLE_MAINTAINED \
     FROM DBA_ROLES \
     ORDER BY ROLE";

const GRANTABLE_PRIVILEGES_SQL: &str = "SELECT DISTINCT PRIVILEGE FROM DBA_SYS_PRIVS \
     WHERE PRIVILEGE NOT LIKE '%ANY%' \
     AND PRIVILEGE NOT IN ('INHERIT PRIVILEGES', 'KEEP DATE TIME', 'KEEP SYSGUID', \
     'SYSBACKUP', 'SYSDBA', 'SYSDG', 'SYSKM', 'SYSOPER', 'SYSRAC') \
     ORDER BY PRIVILEGE";

/// Privilege granted to every user the console creates
const BASE_PRIVILEGE: &str = "CREATE SESSION";

#[derive(Clone)]
pub struct SecurityService {
    gateway: Arc<dyn DatabaseGateway>,
}

impl SecurityService {
    pub fn new(gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self { gateway }
    }

    /// Create a user, grant it `CREATE SESSION` and the requested roles.
    /// The first failing statement aborts the remaining grants.
    pub async fn create_user(&self, request: CreateUserRequest) -> CommandStatus {
        let result = self.try_create_user(&request).await;
        if let Err(e) = &result {
            warn!(user = %request.nombre_usuario, error = %e, "Failed to create user");
        }
        CommandStatus::from_result(&result, "Error al crear usuario")
    }

    async fn try_create_user(&self, request: &CreateUserRequest) -> Result<()> {
        require(&request.nombre_usuario, "El nombre de usuario es requerido")?;

        let session = self.gateway.open().await?;
        session.execute_ddl(&statement::enable_oracle_script()).await?;
        run(
            &*session,
            &statement::create_user(&request.nombre_usuario, &request.password),
        )
        .await?;
        run(&*session, &statement::grant(BASE_PRIVILEGE, &request.nombre_usuario)).await?;
        for role in &request.roles {
            run(&*session, &statement::grant(role, &request.nombre_usuario)).await?;
        }

        info!(user = %request.nombre_usuario, roles = request.roles.len(), "User created");
        Ok(())
    }

    pub async fn modify_user(&self, request: ModifyUserRequest) -> CommandStatus {
        let result = self.try_modify_user(&request).await;
        if let Err(e) = &result {
            warn!(user = %request.nombre_usuario, error = %e, "Failed to modify user");
        }
        CommandStatus::from_result(&result, "Error al modificar usuario")
    }

    async fn try_modify_user(&self, request: &ModifyUserRequest) -> Result<()> {
        require(&request.nombre_usuario, "El nombre de usuario es requerido")?;

        let session = self.gateway.open().await?;
        if let Some(password) = request.nuevo_password.as_deref().filter(|p| !p.is_empty()) {
            run(&*session, &statement::change_password(&request.nombre_usuario, password)).await?;
        }
        run(
            &*session,
            &statement::set_account_lock(&request.nombre_usuario, request.bloquear),
        )
        .await?;

        info!(user = %request.nombre_usuario, locked = request.bloquear, "User modified");
        Ok(())
    }

    pub async fn drop_user(&self, request: DropUserRequest) -> CommandStatus {
        let result = self.try_drop_user(&request).await;
        if let Err(e) = &result {
            warn!(user = %request.nombre_usuario, error = %e, "Failed to drop user");
        }
        CommandStatus::from_result(&result, "Error al eliminar usuario")
    }

    async fn try_drop_user(&self, request: &DropUserRequest) -> Result<()> {
        require(&request.nombre_usuario, "El nombre de usuario es requerido")?;

        let session = self.gateway.open().await?;
        run(
            &*session,
            &statement::drop_user(&request.nombre_usuario, request.include_cascade),
        )
        .await?;
        info!(user = %request.nombre_usuario, cascade = request.include_cascade, "User dropped");
        Ok(())
    }

    pub async fn list_users(&self) -> UserListResponse {
        match self.fetch_users().await {
            Ok(usuarios) => UserListResponse {
                status: CommandStatus::success(),
                usuarios,
            },
            Err(e) => {
                warn!(error = %e, "Failed to list users");
                UserListResponse {
                    status: CommandStatus::failure(format!("Error al listar usuarios: {}", e)),
                    usuarios: Vec::new(),
                }
            }
        }
    }

    async fn fetch_users(&self) -> Result<Vec<UserInfo>> {
        let session = self.gateway.open().await?;
        let rows = session.query(LIST_USERS_SQL, &[]).await?;
        debug!(count = rows.len(), "Listed users");
        Ok(rows.iter().map(user_info).collect())
    }

    /// System privileges and roles granted directly to `username`
    pub async fn list_privileges(&self, username: &str) -> PrivilegeListResponse {
        match self.fetch_privileges(username).await {
            Ok(privilegios) => PrivilegeListResponse {
                status: CommandStatus::success(),
                privilegios,
            },
            Err(e) => {
                warn!(user = %username, error = %e, "Failed to list privileges");
                PrivilegeListResponse {
                    status: CommandStatus::failure(format!("Error al listar privilegios: {}", e)),
                    privilegios: Vec::new(),
                }
            }
        }
    }

    async fn fetch_privileges(&self, username: &str) -> Result<Vec<PrivilegeInfo>> {
        let session = self.gateway.open().await?;
        let rows = session
            .query(
                LIST_PRIVILEGES_SQL,
                &[param("usuario", username.to_uppercase())],
            )
            .await?;
        Ok(rows
            .iter()
            .map(|row| PrivilegeInfo {
                nombre_privilegio: row.get("PRIVILEGE").as_text(),
                con_admin: row.get("ADMIN_OPTION").as_text() == "YES",
            })
            .collect())
    }

    pub async fn list_roles(&self) -> RoleListResponse {
        match self.fetch_roles().await {
            Ok(roles) => RoleListResponse {
                status: CommandStatus::success(),
                roles,
            },
            Err(e) => {
                warn!(error = %e, "Failed to list roles");
                RoleListResponse {
                    status: CommandStatus::failure(format!("Error al listar roles: {}", e)),
                    roles: Vec::new(),
                }
            }
        }
    }

    async fn fetch_roles(&self) -> Result<Vec<RoleInfo>> {
        let session = self.gateway.open().await?;
        let rows = session.query(LIST_ROLES_SQL, &[]).await?;
        Ok(rows
            .iter()
            .map(|row| RoleInfo {
                nombre_rol: row.get("ROLE").as_text(),
                autenticacion: row.get("AUTHENTICATION_TYPE").as_text(),
                comun: row.get("COMMON").as_text(),
                oracle: row.get("ORACLE_MAINTAINED").as_text(),
            })
            .collect())
    }

    /// Create a role and grant it each privilege, stopping at the first failure
    pub async fn create_role(&self, request: CreateRoleRequest) -> CommandStatus {
        let result = self.try_create_role(&request).await;
        if let Err(e) = &result {
            warn!(role = %request.nombre_rol, error = %e, "Failed to create role");
        }
        CommandStatus::from_result(&result, "Error al crear rol")
    }

    async fn try_create_role(&self, request: &CreateRoleRequest) -> Result<()> {
        require(&request.nombre_rol, "El nombre del rol es requerido")?;

        let session = self.gateway.open().await?;
        run(&*session, &statement::create_role(&request.nombre_rol)).await?;
        for privilege in &request.privilegios {
            run(&*session, &statement::grant(privilege, &request.nombre_rol)).await?;
        }
        info!(role = %request.nombre_rol, privileges = request.privilegios.len(), "Role created");
        Ok(())
    }

    pub async fn grantable_privileges(&self) -> GrantablePrivilegesResponse {
        match self.fetch_grantable().await {
            Ok(privilegios) => GrantablePrivilegesResponse {
                status: CommandStatus::success(),
                privilegios,
            },
            Err(e) => {
                warn!(error = %e, "Failed to read grantable privileges");
                GrantablePrivilegesResponse {
                    status: CommandStatus::failure(format!("Error al obtener privilegios: {}", e)),
                    privilegios: Vec::new(),
                }
            }
        }
    }

    async fn fetch_grantable(&self) -> Result<Vec<String>> {
        let session = self.gateway.open().await?;
        let rows = session.query(GRANTABLE_PRIVILEGES_SQL, &[]).await?;
        Ok(rows.iter().map(|row| row.at(0).as_text()).collect())
    }
}

/// Execute one administrative statement, logging its verb but never a credential
async fn run(session: &dyn Session, sql: &str) -> Result<()> {
    if statement::carries_secret(sql) {
        debug!("Executing credential statement");
    } else {
        debug!(sql, "Executing statement");
    }
    session.execute_ddl(sql).await
}

fn user_info(row: &Row) -> UserInfo {
    UserInfo {
        nombre_usuario: row.get("USERNAME").as_text(),
        estado: row.get("ACCOUNT_STATUS").as_text(),
        fecha_bloqueo: row.get("LOCK_DATE").as_timestamp(),
        fecha_creacion: row.get("CREATED").as_timestamp(),
        perfil: row.get("PROFILE").as_text(),
        tablespace_default: row.get("DEFAULT_TABLESPACE").as_text(),
    }
}
