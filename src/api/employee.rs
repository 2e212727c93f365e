use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

use crate::model::employee::Employee;

const EMPLOYEE_COLUMNS: &str =
    "id, employee_code, first_name, last_name, email, role, hire_date, status";

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 20)]
    pub per_page: Option<u32>,
    #[schema(example = "active")]
    pub status: Option<String>,
    #[schema(example = "employee")]
    pub role: Option<String>,
    /// Search by name or email
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Active employees in scope for the team views, with the caller-supplied
/// role exclusions applied in SQL. An empty exclusion set excludes nobody.
pub(crate) async fn fetch_active_employees(
    pool: &MySqlPool,
    exclude_roles: &[String],
) -> Result<Vec<Employee>, sqlx::Error> {
    let mut sql = format!(
        "SELECT {} FROM employees WHERE status = 'active'",
        EMPLOYEE_COLUMNS
    );
    if !exclude_roles.is_empty() {
        let placeholders = vec!["?"; exclude_roles.len()].join(", ");
        sql.push_str(&format!(" AND role NOT IN ({})", placeholders));
    }
    sql.push_str(" ORDER BY last_name, first_name");

    let mut query = sqlx::query_as::<_, Employee>(&sql);
    for role in exclude_roles {
        query = query.bind(role);
    }
    query.fetch_all(pool).await
}

pub(crate) async fn fetch_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Employee>, sqlx::Error> {
    let sql = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);
    sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

/// List employees (read side)
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone());
    }

    if let Some(role) = &query.role {
        conditions.push("role = ?");
        bindings.push(role.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT {} FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        EMPLOYEE_COLUMNS, where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}
