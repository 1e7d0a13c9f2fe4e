use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::hr::{
    Department, DepartmentMember, DepartmentStats, EmployeeSummary, SalaryChange,
};
use crate::domain::pagination::PageRequest;

fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Query string of the employee listing
#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct DepartmentResponse {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
}

impl From<Department> for DepartmentResponse {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            location: d.location,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub salary: f64,
    pub department_name: Option<String>,
}

impl From<EmployeeSummary> for EmployeeResponse {
    fn from(e: EmployeeSummary) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            salary: money(e.salary),
            department_name: e.department_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DepartmentEmployeeResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub salary: f64,
    pub hire_date: String,
}

impl From<DepartmentMember> for DepartmentEmployeeResponse {
    fn from(e: DepartmentMember) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            salary: money(e.salary),
            hire_date: e.hire_date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DepartmentStatsResponse {
    pub department_name: String,
    pub employee_count: i64,
    pub avg_salary: f64,
    pub project_count: i64,
}

impl From<DepartmentStats> for DepartmentStatsResponse {
    fn from(s: DepartmentStats) -> Self {
        Self {
            department_name: s.department_name,
            employee_count: s.employee_count,
            avg_salary: s.avg_salary.map(money).unwrap_or(0.0),
            project_count: s.project_count,
        }
    }
}

/// Stats of a department, or `{}` when it does not exist
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DepartmentStatsBody {
    Found(DepartmentStatsResponse),
    Missing {},
}

#[derive(Debug, Serialize)]
pub struct SalaryChangeResponse {
    pub change_date: String,
    pub old_salary: f64,
    pub new_salary: f64,
    pub reason: Option<String>,
}

impl From<SalaryChange> for SalaryChangeResponse {
    fn from(c: SalaryChange) -> Self {
        Self {
            change_date: c.change_date.format("%Y-%m-%d").to_string(),
            old_salary: money(c.old_salary),
            new_salary: money(c.new_salary),
            reason: c.reason,
        }
    }
}

/// Create all HR tables, dropping existing ones
///
/// POST /api/s5/db/init
pub async fn init_database(State(state): State<AppState>) -> Result<Json<&'static str>, ApiError> {
    state.hr.init_schema().await?;
    tracing::info!("HR schema initialized");
    Ok(Json("OK"))
}

/// Load the sample company into the HR tables
///
/// POST /api/s5/db/seed
pub async fn seed_database(State(state): State<AppState>) -> Result<Json<&'static str>, ApiError> {
    state.hr.seed().await?;
    tracing::info!("HR sample data seeded");
    Ok(Json("OK"))
}

/// List every department
///
/// GET /api/s5/departments/
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = state.hr.list_departments().await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

/// List employees with their department, paginated
///
/// GET /api/s5/employees/?page=1&per_page=10
pub async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<EmployeeListQuery>, QueryRejection>,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    let Query(query) = query?;
    let page =
        PageRequest::new(query.page, query.per_page).map_err(ApiError::unprocessable_entity)?;

    let employees = state.hr.list_employees(page).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

/// List employees of one department
///
/// GET /api/s5/departments/:dept_id/employees
pub async fn list_department_employees(
    State(state): State<AppState>,
    dept_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<DepartmentEmployeeResponse>>, ApiError> {
    let Path(dept_id) = dept_id?;
    let employees = state.hr.list_department_employees(dept_id).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

/// KPIs of one department, `{}` for an unknown department
///
/// GET /api/s5/departments/:dept_id/stats
pub async fn department_stats(
    State(state): State<AppState>,
    dept_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DepartmentStatsBody>, ApiError> {
    let Path(dept_id) = dept_id?;
    let body = match state.hr.department_stats(dept_id).await? {
        Some(stats) => DepartmentStatsBody::Found(stats.into()),
        None => {
            tracing::debug!(dept_id, "Stats requested for unknown department");
            DepartmentStatsBody::Missing {}
        }
    };
    Ok(Json(body))
}

/// Salary evolution of one employee
///
/// GET /api/s5/employees/:emp_id/salary-history
pub async fn salary_history(
    State(state): State<AppState>,
    emp_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<SalaryChangeResponse>>, ApiError> {
    let Path(emp_id) = emp_id?;
    let history = state.hr.salary_history(emp_id).await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}
