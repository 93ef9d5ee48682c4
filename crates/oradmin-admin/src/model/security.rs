//! Security request and response types

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use oradmin_common::{CommandStatus, impl_envelope};

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub nombre_usuario: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("nombre_usuario", &self.nombre_usuario)
            .field("password", &"******")
            .field("roles", &self.roles)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyUserRequest {
    #[serde(default)]
    pub nombre_usuario: String,
    #[serde(default)]
    pub nuevo_password: Option<String>,
    #[serde(default)]
    pub bloquear: bool,
}

impl fmt::Debug for ModifyUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifyUserRequest")
            .field("nombre_usuario", &self.nombre_usuario)
            .field("nuevo_password", &self.nuevo_password.as_ref().map(|_| "******"))
            .field("bloquear", &self.bloquear)
            .finish()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropUserRequest {
    #[serde(default)]
    pub nombre_usuario: String,
    #[serde(default)]
    pub include_cascade: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[serde(default)]
    pub nombre_rol: String,
    #[serde(default)]
    pub privilegios: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub nombre_usuario: String,
    pub estado: String,
    pub fecha_bloqueo: Option<NaiveDateTime>,
    pub fecha_creacion: Option<NaiveDateTime>,
    pub perfil: String,
    pub tablespace_default: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeInfo {
    pub nombre_privilegio: String,
    pub con_admin: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub nombre_rol: String,
    pub autenticacion: String,
    pub comun: String,
    pub oracle: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserListResponse {
    #[serde(flatten)]
    pub status: CommandStatus,
    pub usuarios: Vec<UserInfo>,
}

impl_envelope!(UserListResponse, status);

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PrivilegeListResponse {
    #[serde(flatten)]
    pub status: CommandStatus,
    pub privilegios: Vec<PrivilegeInfo>,
}

impl_envelope!(PrivilegeListResponse, status);

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoleListResponse {
    #[serde(flatten)]
    pub status: CommandStatus,
    pub roles: Vec<RoleInfo>,
}

impl_envelope!(RoleListResponse, status);

/// System privileges that can be handed to a role from the console
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GrantablePrivilegesResponse {
    #[serde(flatten)]
    pub status: CommandStatus,
    pub privilegios: Vec<String>,
}

impl_envelope!(GrantablePrivilegesResponse, status);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_passwords() {
        let create: CreateUserRequest = serde_json::from_str(
            r#"{"nombreUsuario":"app","password":"Secr3t","roles":["CONNECT"],"descripcion":"x"}"#,
        )
        .unwrap();
        let rendered = format!("{:?}", create);
        assert!(rendered.contains("app"));
        assert!(!rendered.contains("Secr3t"));

        let modify: ModifyUserRequest =
            serde_json::from_str(r#"{"nombreUsuario":"app","nuevoPassword":"N3w","bloquear":true}"#)
                .unwrap();
        assert!(modify.bloquear);
        assert!(!format!("{:?}", modify).contains("N3w"));
    }

    #[test]
    fn test_list_wire_shape() {
        let response = PrivilegeListResponse {
            status: CommandStatus::success(),
            privilegios: vec![PrivilegeInfo {
                nombre_privilegio: "CREATE SESSION".to_string(),
                con_admin: false,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["resultado"], true);
        assert_eq!(json["errores"], serde_json::json!([]));
        assert_eq!(json["privilegios"][0]["nombrePrivilegio"], "CREATE SESSION");
        assert_eq!(json["privilegios"][0]["conAdmin"], false);
    }
}
