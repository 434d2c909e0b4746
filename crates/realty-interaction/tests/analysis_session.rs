use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use realty_core::derive_columns;
use realty_core::session::{Query, QuerySubmitter, SessionState};
use realty_core::{RealtyError, Result};
use realty_interaction::{AnalysisService, SessionController};

/// Replays one canned body per call and records the queries it saw.
struct CannedService {
    responses: Mutex<Vec<Result<String>>>,
    seen: Mutex<Vec<String>>,
}

impl CannedService {
    fn new(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AnalysisService for CannedService {
    async fn analyze(&self, query: &Query) -> Result<String> {
        self.seen.lock().unwrap().push(query.as_str().to_string());
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(RealtyError::transport("no canned response left")))
    }
}

const WAKAD_RESPONSE: &str = r#"{
    "summary": "Wakad is trending up",
    "chartData": [
        {"year": 2021, "price": 100, "demand": 5},
        {"year": 2022, "price": 120, "demand": 7}
    ],
    "tableData": [{"locality": "Wakad", "price": 120}]
}"#;

#[tokio::test]
async fn test_analyze_wakad_end_to_end() {
    let service = CannedService::new(vec![Ok(WAKAD_RESPONSE.to_string())]);
    let controller = SessionController::new(service.clone(), Duration::from_secs(5));
    let mut submitter = QuerySubmitter::new();
    assert_eq!(controller.snapshot(), SessionState::Idle);

    submitter.set_input("Analyze Wakad");
    let request_id = submitter.submit(&controller).expect("query emitted");
    assert!(controller.snapshot().is_pending_for(request_id));
    assert_eq!(submitter.input(), "");

    let state = controller.wait_settled(request_id).await;

    let result = state.result().expect("success state");
    assert_eq!(result.summary, "Wakad is trending up");
    assert_eq!(result.chart_series.len(), 2);
    assert_eq!(result.table_rows.len(), 1);
    assert_eq!(derive_columns(&result.table_rows), vec!["locality", "price"]);
    assert_eq!(*service.seen.lock().unwrap(), vec!["Analyze Wakad".to_string()]);
}

#[tokio::test]
async fn test_blank_input_never_reaches_the_service() {
    let service = CannedService::new(vec![]);
    let controller = SessionController::new(service.clone(), Duration::from_secs(5));
    let mut submitter = QuerySubmitter::new();

    submitter.set_input("   ");

    assert!(submitter.submit(&controller).is_none());
    assert_eq!(controller.snapshot(), SessionState::Idle);
    assert!(service.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failure_then_success_session() {
    let service = CannedService::new(vec![
        Ok("\"just a string\"".to_string()),
        Err(RealtyError::http_status(500, "HTTP 500: Internal server error")),
        Ok(r#"{"summary": "No data found for requested area(s): ['Nowhere']."}"#.to_string()),
    ]);
    let controller = SessionController::new(service, Duration::from_secs(5));

    let malformed = controller.analyze(Query::parse("Wakad").unwrap()).await;
    assert!(matches!(malformed, SessionState::Error(_)));

    let failed = controller.analyze(Query::parse("Wakad").unwrap()).await;
    assert!(failed.error_message().unwrap().contains("Internal server error"));

    let recovered = controller.analyze(Query::parse("Nowhere").unwrap()).await;
    let result = recovered.result().expect("success state");
    assert!(result.chart_series.is_empty());
    assert!(result.table_rows.is_empty());
    assert!(derive_columns(&result.table_rows).is_empty());
}
