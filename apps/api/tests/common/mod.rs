//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use bdi_api::api::{router, AppState};
use bdi_api::config::Settings;
use bdi_api::domain::hr::{
    Department, DepartmentMember, DepartmentStats, EmployeeSummary, SalaryChange,
};
use bdi_api::domain::pagination::PageRequest;
use bdi_api::domain::aircraft::{Aircraft, TrackedPosition, TypeCount};
use bdi_api::domain::repositories::{HrRepository, PositionStore, RepositoryResult};
use bdi_api::infrastructure::raw_store::local_store;
use flate2::{write::GzEncoder, Compression};
use serde_json::Value;
use tower::util::ServiceExt; // for oneshot

/// In-memory HR database with a fixed company
#[derive(Default)]
pub struct InMemoryHr {
    pub departments: Vec<Department>,
    pub employees: Vec<EmployeeSummary>,
    pub members: Vec<(i32, DepartmentMember)>,
    pub stats: Vec<(i32, DepartmentStats)>,
    pub history: Vec<(i32, SalaryChange)>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl InMemoryHr {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HrRepository for InMemoryHr {
    async fn init_schema(&self) -> RepositoryResult<()> {
        self.record("init_schema");
        Ok(())
    }

    async fn seed(&self) -> RepositoryResult<()> {
        self.record("seed");
        Ok(())
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        Ok(self.departments.clone())
    }

    async fn list_employees(&self, page: PageRequest) -> RepositoryResult<Vec<EmployeeSummary>> {
        Ok(self
            .employees
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn list_department_employees(
        &self,
        department_id: i32,
    ) -> RepositoryResult<Vec<DepartmentMember>> {
        Ok(self
            .members
            .iter()
            .filter(|(id, _)| *id == department_id)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn department_stats(
        &self,
        department_id: i32,
    ) -> RepositoryResult<Option<DepartmentStats>> {
        Ok(self
            .stats
            .iter()
            .find(|(id, _)| *id == department_id)
            .map(|(_, s)| s.clone()))
    }

    async fn salary_history(&self, employee_id: i32) -> RepositoryResult<Vec<SalaryChange>> {
        Ok(self
            .history
            .iter()
            .filter(|(id, _)| *id == employee_id)
            .map(|(_, c)| c.clone())
            .collect())
    }
}

/// In-memory position store with the grouping rules of the document store
#[derive(Default)]
pub struct InMemoryPositions {
    pub reports: Mutex<Vec<TrackedPosition>>,
}

#[async_trait]
impl PositionStore for InMemoryPositions {
    async fn insert(&self, position: &TrackedPosition) -> RepositoryResult<()> {
        self.reports.lock().unwrap().push(position.clone());
        Ok(())
    }

    async fn count_by_type(&self) -> RepositoryResult<Vec<TypeCount>> {
        let mut counts: BTreeMap<Option<String>, i64> = BTreeMap::new();
        for report in self.reports.lock().unwrap().iter() {
            *counts.entry(report.aircraft_type.clone()).or_default() += 1;
        }
        let mut counts: Vec<TypeCount> = counts
            .into_iter()
            .map(|(aircraft_type, count)| TypeCount {
                aircraft_type,
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    async fn list_aircraft(&self, page: PageRequest) -> RepositoryResult<Vec<Aircraft>> {
        let mut first_seen: BTreeMap<String, Aircraft> = BTreeMap::new();
        for report in self.reports.lock().unwrap().iter() {
            first_seen.entry(report.icao.clone()).or_insert_with(|| Aircraft {
                icao: report.icao.clone(),
                registration: report.registration.clone(),
                aircraft_type: report.aircraft_type.clone(),
            });
        }
        Ok(first_seen
            .into_values()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn latest(&self, icao: &str) -> RepositoryResult<Option<TrackedPosition>> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.icao == icao)
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
            .cloned())
    }

    async fn delete_aircraft(&self, icao: &str) -> RepositoryResult<u64> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.icao != icao);
        Ok((before - reports.len()) as u64)
    }
}

/// State over the given adapters with local raw/prepared folders under `data_dir`
pub fn app_state(
    hr: Arc<InMemoryHr>,
    positions: Arc<InMemoryPositions>,
    data_dir: &Path,
    source_url: &str,
) -> AppState {
    let settings = Settings {
        source_url: source_url.to_string(),
        raw_dir: data_dir.join("raw"),
        prepared_dir: data_dir.join("prepared"),
        ..Settings::default()
    };
    let raw_store = local_store(&settings);
    AppState::with_parts(settings, hr, positions, raw_store).expect("http client")
}

/// Router over the given HR repository with local raw/prepared folders under `data_dir`
pub fn setup_app(hr: Arc<InMemoryHr>, data_dir: &Path, source_url: &str) -> Router {
    let positions = Arc::new(InMemoryPositions::default());
    router(app_state(hr, positions, data_dir, source_url))
}

/// Sends a JSON body and returns status and JSON body
pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    read_response(app.clone().oneshot(request).await.unwrap()).await
}

/// Sends a request without body and returns status and JSON body
pub async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    read_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn read_response(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, json)
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
