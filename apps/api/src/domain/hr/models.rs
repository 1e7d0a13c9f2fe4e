use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A department of the company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
}

/// Employee row as shown in the paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// As stored, not re-validated on read
    pub email: String,
    pub salary: Decimal,
    /// `None` when the employee has no department
    pub department_name: Option<String>,
}

/// Employee as listed under a department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentMember {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
}

/// Headcount, payroll and project KPIs for one department
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentStats {
    pub department_name: String,
    pub employee_count: i64,
    /// `None` when the department has no employees
    pub avg_salary: Option<Decimal>,
    pub project_count: i64,
}

/// One salary change of an employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryChange {
    pub change_date: NaiveDate,
    pub old_salary: Decimal,
    pub new_salary: Decimal,
    pub reason: Option<String>,
}
