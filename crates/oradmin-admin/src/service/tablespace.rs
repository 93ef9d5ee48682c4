//! Tablespace lifecycle and space usage

use std::sync::Arc;

use tracing::{debug, info, warn};

use oradmin_common::{CommandStatus, OradminError, Result};
use oradmin_persistence::statement::{self, Autoextend};
use oradmin_persistence::{DatabaseGateway, Row, param};

use super::require;
use crate::model::*;

const DATAFILE_SQL: &str =
    "SELECT file_name FROM dba_data_files WHERE tablespace_name = :tablespaceName";

const EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM dba_tablespaces WHERE tablespace_name = :tablespaceName";

const USAGE_SQL: &str = "SELECT ddf.TABLESPACE_NAME, ddf.STATUS, ddf.FILE_NAME, \
     ddf.BYTES/1024/1024 AS SIZE_MB, \
     (ddf.BYTES - NVL(dfs.BYTES, 0))/1024/1024 AS FREE_MB, \
     ddf.AUTOEXTENSIBLE, \
     ddf.MAXBYTES/1024/1024 AS MAX_SIZE_MB \
     FROM DBA_DATA_FILES ddf \
     LEFT JOIN (SELECT TABLESPACE_NAME, SUM(BYTES) BYTES FROM DBA_FREE_SPACE GROUP BY TABLESPACE_NAME) dfs \
     ON ddf.TABLESPACE_NAME = dfs.TABLESPACE_NAME";

const AUTOEXTEND_REQUIREMENT: &str = "Para autoextend, se requieren incrementoSize y tamanioMaximo";

#[derive(Clone)]
pub struct TablespaceService {
    gateway: Arc<dyn DatabaseGateway>,
}

impl TablespaceService {
    pub fn new(gateway: Arc<dyn DatabaseGateway>) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, request: CreateTablespaceRequest) -> CommandStatus {
        let result = self.try_create(&request).await;
        if let Err(e) = &result {
            warn!(tablespace = %request.nombre_tablespace, error = %e, "Failed to create tablespace");
        }
        CommandStatus::from_result(&result, "Error al crear tablespace")
    }

    async fn try_create(&self, request: &CreateTablespaceRequest) -> Result<()> {
        require(&request.nombre_tablespace, "El nombre del tablespace es requerido")?;
        require(&request.ubicacion_archivo, "La ubicación del archivo es requerida")?;
        if request.tamanio_inicial <= 0 {
            return Err(OradminError::validation("El tamaño inicial debe ser mayor a 0"));
        }
        let autoextend = autoextend_clause(
            request.autoextend,
            request.incremento_size,
            request.tamanio_maximo,
        )?;

        let session = self.gateway.open().await?;
        let sql = statement::create_tablespace(
            &request.nombre_tablespace,
            &request.ubicacion_archivo,
            request.tamanio_inicial,
            autoextend,
        );
        debug!(sql = %sql, "Creating tablespace");
        session.execute_ddl(&sql).await?;

        info!(tablespace = %request.nombre_tablespace, size_mb = request.tamanio_inicial, "Tablespace created");
        Ok(())
    }

    /// Change the autoextend settings of the tablespace's datafile
    pub async fn modify(&self, request: ModifyTablespaceRequest) -> CommandStatus {
        let result = self.try_modify(&request).await;
        if let Err(e) = &result {
            warn!(tablespace = %request.nombre_tablespace, error = %e, "Failed to modify tablespace");
        }
        CommandStatus::from_result(&result, "Error al modificar tablespace")
    }

    async fn try_modify(&self, request: &ModifyTablespaceRequest) -> Result<()> {
        require(&request.nombre_tablespace, "El nombre del tablespace es requerido")?;

        let session = self.gateway.open().await?;
        let datafile = session
            .query_scalar(
                DATAFILE_SQL,
                &[param("tablespaceName", request.nombre_tablespace.to_uppercase())],
            )
            .await?
            .as_text();
        if datafile.is_empty() {
            return Err(OradminError::not_found(format!(
                "No se encontró el datafile para el tablespace {}",
                request.nombre_tablespace
            )));
        }

        let autoextend = request
            .autoextend
            .map(|on| autoextend_clause(on, request.incremento_size, request.tamanio_maximo))
            .transpose()?;
        let sql = statement::alter_datafile(&datafile, autoextend);
        debug!(sql = %sql, "Altering datafile");
        session.execute_ddl(&sql).await?;

        info!(tablespace = %request.nombre_tablespace, datafile = %datafile, "Tablespace modified");
        Ok(())
    }

    pub async fn remove(&self, request: DropTablespaceRequest) -> CommandStatus {
        let result = self.try_drop(&request).await;
        if let Err(e) = &result {
            warn!(tablespace = %request.nombre_tablespace, error = %e, "Failed to drop tablespace");
        }
        CommandStatus::from_result(&result, "Error al eliminar tablespace")
    }

    async fn try_drop(&self, request: &DropTablespaceRequest) -> Result<()> {
        require(&request.nombre_tablespace, "El nombre del tablespace es requerido")?;

        let session = self.gateway.open().await?;
        session
            .execute_ddl(&statement::drop_tablespace(
                &request.nombre_tablespace,
                request.incluir_contenido,
            ))
            .await?;
        info!(
            tablespace = %request.nombre_tablespace,
            including_contents = request.incluir_contenido,
            "Tablespace dropped"
        );
        Ok(())
    }

    /// Size and free space for every datafile
    pub async fn info(&self) -> TablespaceListResponse {
        match self.fetch_usage().await {
            Ok(tablespaces) => TablespaceListResponse {
                status: CommandStatus::success(),
                tablespaces,
            },
            Err(e) => {
                warn!(error = %e, "Failed to read tablespace usage");
                TablespaceListResponse {
                    status: CommandStatus::failure(format!(
                        "Error al obtener información de tablespaces: {}",
                        e
                    )),
                    tablespaces: Vec::new(),
                }
            }
        }
    }

    async fn fetch_usage(&self) -> Result<Vec<TablespaceInfo>> {
        let session = self.gateway.open().await?;
        let rows = session.query(USAGE_SQL, &[]).await?;
        debug!(datafiles = rows.len(), "Read tablespace usage");
        Ok(rows.iter().map(tablespace_info).collect())
    }

    /// Coalesce free extents; the tablespace must exist
    pub async fn compact(&self, request: CompactTablespaceRequest) -> CommandStatus {
        let result = self.try_compact(&request).await;
        if let Err(e) = &result {
            warn!(tablespace = %request.nombre_tablespace, error = %e, "Failed to compact tablespace");
        }
        CommandStatus::from_result(&result, "Error al compactar tablespace")
    }

    async fn try_compact(&self, request: &CompactTablespaceRequest) -> Result<()> {
        require(&request.nombre_tablespace, "El nombre del tablespace es requerido")?;

        let session = self.gateway.open().await?;
        let count = session
            .query_scalar(
                EXISTS_SQL,
                &[param("tablespaceName", request.nombre_tablespace.to_uppercase())],
            )
            .await?
            .as_i64();
        if count == 0 {
            return Err(OradminError::not_found(format!(
                "El tablespace {} no existe",
                request.nombre_tablespace
            )));
        }

        session
            .execute_ddl(&statement::coalesce_tablespace(&request.nombre_tablespace))
            .await?;
        info!(tablespace = %request.nombre_tablespace, "Tablespace coalesced");
        Ok(())
    }
}

fn autoextend_clause(enabled: bool, next_mb: Option<i64>, max_mb: Option<i64>) -> Result<Autoextend> {
    if !enabled {
        return Ok(Autoextend::Off);
    }
    match (next_mb, max_mb) {
        (Some(next_mb), Some(max_mb)) => Ok(Autoextend::On { next_mb, max_mb }),
        _ => Err(OradminError::validation(AUTOEXTEND_REQUIREMENT)),
    }
}

fn tablespace_info(row: &Row) -> TablespaceInfo {
    TablespaceInfo {
        nombre_tablespace: row.get("TABLESPACE_NAME").as_text(),
        estado: row.get("STATUS").as_text(),
        ubicacion_archivo: row.get("FILE_NAME").as_text(),
        tamanio_actual: row.get("SIZE_MB").as_f64(),
        espacio_libre: row.get("FREE_MB").as_f64(),
        autoextend: row.get("AUTOEXTENSIBLE").as_text() == "YES",
        tamanio_maximo: row.get("MAX_SIZE_MB").as_f64(),
    }
}
