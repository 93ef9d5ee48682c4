use actix_web::{Scope, web};

use super::{audit, backup, performance, security, tablespace};

pub fn routes(context_path: &str) -> Scope {
    web::scope(context_path)
        .service(audit::routes())
        .service(security::routes())
        .service(tablespace::routes())
        .service(performance::routes())
        .service(backup::routes())
}
