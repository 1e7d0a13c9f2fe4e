// HR domain module
// Departments, employees, projects and salary history of hr_database

pub mod models;

pub use models::{Department, DepartmentMember, DepartmentStats, EmployeeSummary, SalaryChange};
