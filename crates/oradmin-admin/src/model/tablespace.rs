//! Tablespace request and response types. Sizes are in megabytes.

use serde::{Deserialize, Serialize};

use oradmin_common::{CommandStatus, impl_envelope, number};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTablespaceRequest {
    #[serde(default)]
    pub nombre_tablespace: String,
    #[serde(default)]
    pub ubicacion_archivo: String,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub tamanio_inicial: i64,
    #[serde(default, deserialize_with = "number::deserialize_optional")]
    pub tamanio_maximo: Option<i64>,
    #[serde(default)]
    pub autoextend: bool,
    #[serde(default, deserialize_with = "number::deserialize_optional")]
    pub incremento_size: Option<i64>,
}

/// `autoextend` left out keeps the datafile's current setting
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyTablespaceRequest {
    #[serde(default)]
    pub nombre_tablespace: String,
    #[serde(default)]
    pub autoextend: Option<bool>,
    #[serde(default, deserialize_with = "number::deserialize_optional")]
    pub incremento_size: Option<i64>,
    #[serde(default, deserialize_with = "number::deserialize_optional")]
    pub tamanio_maximo: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTablespaceRequest {
    #[serde(default)]
    pub nombre_tablespace: String,
    #[serde(default)]
    pub incluir_contenido: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactTablespaceRequest {
    #[serde(default)]
    pub nombre_tablespace: String,
}

/// Usage of one datafile
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablespaceInfo {
    pub nombre_tablespace: String,
    pub estado: String,
    pub ubicacion_archivo: String,
    pub tamanio_actual: f64,
    pub espacio_libre: f64,
    pub autoextend: bool,
    pub tamanio_maximo: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TablespaceListResponse {
    #[serde(flatten)]
    pub status: CommandStatus,
    pub tablespaces: Vec<TablespaceInfo>,
}

impl_envelope!(TablespaceListResponse, status);
