use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool};

use crate::domain::hr::{
    Department, DepartmentMember, DepartmentStats, EmployeeSummary, SalaryChange,
};
use crate::domain::pagination::PageRequest;
use crate::domain::repositories::{HrRepository, RepositoryResult};

const HR_SCHEMA_SQL: &str = include_str!("../sql/hr_schema.sql");
const HR_SEED_SQL: &str = include_str!("../sql/hr_seed.sql");

/// PostgreSQL implementation of HrRepository
///
/// Queries are checked at runtime so the crate builds without a live
/// database.
pub struct PostgresHrRepository {
    pool: PgPool,
}

impl PostgresHrRepository {
    /// Creates a new PostgresHrRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct DepartmentRow {
    id: i32,
    name: String,
    location: Option<String>,
}

#[derive(FromRow)]
struct EmployeeSummaryRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    salary: Decimal,
    department_name: Option<String>,
}

#[derive(FromRow)]
struct DepartmentMemberRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    salary: Decimal,
    hire_date: NaiveDate,
}

#[derive(FromRow)]
struct DepartmentStatsRow {
    department_name: String,
    employee_count: i64,
    avg_salary: Option<Decimal>,
    project_count: i64,
}

#[derive(FromRow)]
struct SalaryChangeRow {
    change_date: NaiveDate,
    old_salary: Decimal,
    new_salary: Decimal,
    reason: Option<String>,
}

#[async_trait]
impl HrRepository for PostgresHrRepository {
    async fn init_schema(&self) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        (&mut *tx).execute(HR_SCHEMA_SQL).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn seed(&self) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        (&mut *tx).execute(HR_SEED_SQL).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(
            "SELECT id, name, location FROM department ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Department {
                id: r.id,
                name: r.name,
                location: r.location,
            })
            .collect())
    }

    async fn list_employees(&self, page: PageRequest) -> RepositoryResult<Vec<EmployeeSummary>> {
        let rows = sqlx::query_as::<_, EmployeeSummaryRow>(
            r#"
            SELECT e.id, e.first_name, e.last_name, e.email,
                   e.salary, d.name AS department_name
            FROM employee e
            LEFT JOIN department d ON e.department_id = d.id
            ORDER BY e.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| EmployeeSummary {
                id: r.id,
                first_name: r.first_name,
                last_name: r.last_name,
                email: r.email,
                salary: r.salary,
                department_name: r.department_name,
            })
            .collect())
    }

    async fn list_department_employees(
        &self,
        department_id: i32,
    ) -> RepositoryResult<Vec<DepartmentMember>> {
        let rows = sqlx::query_as::<_, DepartmentMemberRow>(
            r#"
            SELECT id, first_name, last_name, email, salary, hire_date
            FROM employee
            WHERE department_id = $1
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DepartmentMember {
                id: r.id,
                first_name: r.first_name,
                last_name: r.last_name,
                email: r.email,
                salary: r.salary,
                hire_date: r.hire_date,
            })
            .collect())
    }

    async fn department_stats(
        &self,
        department_id: i32,
    ) -> RepositoryResult<Option<DepartmentStats>> {
        let row = sqlx::query_as::<_, DepartmentStatsRow>(
            r#"
            SELECT
                d.name AS department_name,
                COUNT(DISTINCT e.id) AS employee_count,
                AVG(e.salary) AS avg_salary,
                COUNT(DISTINCT p.id) AS project_count
            FROM department d
            LEFT JOIN employee e ON e.department_id = d.id
            LEFT JOIN project p ON p.department_id = d.id
            WHERE d.id = $1
            GROUP BY d.name
            "#,
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DepartmentStats {
            department_name: r.department_name,
            employee_count: r.employee_count,
            avg_salary: r.avg_salary,
            project_count: r.project_count,
        }))
    }

    async fn salary_history(&self, employee_id: i32) -> RepositoryResult<Vec<SalaryChange>> {
        let rows = sqlx::query_as::<_, SalaryChangeRow>(
            r#"
            SELECT change_date, old_salary, new_salary, reason
            FROM salary_history
            WHERE employee_id = $1
            ORDER BY change_date ASC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SalaryChange {
                change_date: r.change_date,
                old_salary: r.old_salary,
                new_salary: r.new_salary,
                reason: r.reason,
            })
            .collect())
    }
}
