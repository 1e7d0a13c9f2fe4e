use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::hr::{
    Department, DepartmentMember, DepartmentStats, EmployeeSummary, SalaryChange,
};
use crate::domain::pagination::PageRequest;

/// Repository for the HR database
///
/// Implementations own the schema: `init_schema` drops and recreates every
/// HR table, `seed` loads the sample company.
#[async_trait]
pub trait HrRepository: Send + Sync {
    /// Drop and recreate all HR tables and indexes
    async fn init_schema(&self) -> RepositoryResult<()>;

    /// Insert the sample departments, employees, projects and salary history
    async fn seed(&self) -> RepositoryResult<()>;

    /// All departments ordered by id
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// One page of employees ordered by id, with their department name
    async fn list_employees(&self, page: PageRequest) -> RepositoryResult<Vec<EmployeeSummary>>;

    /// Employees of a department ordered by id
    async fn list_department_employees(
        &self,
        department_id: i32,
    ) -> RepositoryResult<Vec<DepartmentMember>>;

    /// KPIs of a department, `None` if it does not exist
    async fn department_stats(&self, department_id: i32)
        -> RepositoryResult<Option<DepartmentStats>>;

    /// Salary changes of an employee ordered by change date
    async fn salary_history(&self, employee_id: i32) -> RepositoryResult<Vec<SalaryChange>>;
}
