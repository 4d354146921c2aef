pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::selection::handlers;
use crate::state::AppState;
use crate::tracking::handlers as tracking_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes/:user/document",
            get(handlers::handle_get_document).put(handlers::handle_put_document),
        )
        .route(
            "/api/v1/resumes/:user/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/resumes/:user/validate",
            post(handlers::handle_validate),
        )
        .route("/api/v1/resumes/:user/render", post(handlers::handle_render))
        // Applications API
        .route(
            "/api/v1/applications/:user",
            get(tracking_handlers::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:user/:id",
            patch(tracking_handlers::handle_update_heard_back),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::models::resume::{Bounds, ResumeDocument, TotalBullets};
    use crate::render::{JsonArtifactRenderer, ARTIFACT_FILE};
    use crate::store::ResumeStore;
    use crate::test_support::{sample_document, valid_selection, valid_selection_json, ScriptedGenerator};

    struct Harness {
        router: Router,
        store: ResumeStore,
        llm: Arc<ScriptedGenerator>,
        _dir: TempDir,
    }

    async fn harness(llm: ScriptedGenerator, doc: Option<ResumeDocument>) -> Harness {
        let dir = TempDir::new().unwrap();
        let store = ResumeStore::new(dir.path().join("data"));
        if let Some(doc) = doc {
            store.save("jane", &doc).await.unwrap();
        }
        let llm = Arc::new(llm);
        let state = AppState {
            store: store.clone(),
            llm: llm.clone(),
            renderer: Arc::new(JsonArtifactRenderer::new(dir.path().join("out"))),
        };
        Harness {
            router: build_router(state),
            store,
            llm,
            _dir: dir,
        }
    }

    fn satisfiable_document() -> ResumeDocument {
        let mut doc = sample_document();
        doc.config.bullets = TotalBullets {
            total_min: 8,
            total_max: 10,
        };
        doc
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedGenerator::reply(String::new()), None).await;
        let (status, body) = send(&h.router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tailor-api");
    }

    #[tokio::test]
    async fn test_put_then_get_document() {
        let h = harness(ScriptedGenerator::reply(String::new()), None).await;
        let doc = serde_json::to_value(sample_document()).unwrap();

        let (status, _) = send(&h.router, "PUT", "/api/v1/resumes/jane/document", Some(doc)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&h.router, "GET", "/api/v1/resumes/jane/document", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["companies"][0]["id"], "slice");
        assert_eq!(h.store.load("jane").await.unwrap(), sample_document());
    }

    #[tokio::test]
    async fn test_get_missing_document_is_404() {
        let h = harness(ScriptedGenerator::reply(String::new()), None).await;
        let (status, body) = send(&h.router, "GET", "/api/v1/resumes/nobody/document", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_put_rejects_malformed_config() {
        let h = harness(ScriptedGenerator::reply(String::new()), None).await;
        let mut doc = sample_document();
        doc.config.projects = Bounds::new(3, 1);

        let (status, body) = send(
            &h.router,
            "PUT",
            "/api/v1/resumes/jane/document",
            Some(serde_json::to_value(doc).unwrap()),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
        assert_eq!(
            body["error"]["details"]["violations"][0]["kind"],
            "configuration_error"
        );
        assert!(h.store.load("jane").await.is_err());
    }

    #[tokio::test]
    async fn test_generate_writes_artifact_and_records_application() {
        let h = harness(
            ScriptedGenerator::reply(format!("Here you go:\n{}\nGood luck!", valid_selection_json())),
            Some(satisfiable_document()),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Senior Android engineer", "company_name": "Globex"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["selection"]["companies"][0]["id"], "slice");
        assert_eq!(body["application"]["company_name"], "Globex");
        let path = body["artifact"]["path"].as_str().unwrap();
        assert!(path.ends_with(ARTIFACT_FILE));
        assert!(std::path::Path::new(path).exists());

        let (status, body) = send(&h.router, "GET", "/api/v1/applications/jane", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["total"], 1);
        assert_eq!(body["applications"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_generate_without_company_skips_tracking() {
        let h = harness(
            ScriptedGenerator::reply(valid_selection_json()),
            Some(satisfiable_document()),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Senior Android engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("application").is_none());
        let (_, body) = send(&h.router, "GET", "/api/v1/applications/jane", None).await;
        assert_eq!(body["stats"]["total"], 0);
    }

    #[tokio::test]
    async fn test_generate_invalid_selection_is_422_with_violations() {
        // Sample totals are 16..20; the scripted selection has 9 bullets.
        let h = harness(
            ScriptedGenerator::reply(valid_selection_json()),
            Some(sample_document()),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Senior Android engineer", "company_name": "Globex"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "SELECTION_INVALID");
        let violation = &body["error"]["details"]["violations"][0];
        assert_eq!(violation["kind"], "bullet_count_violation");
        assert_eq!(violation["total"], 9);
        assert_eq!(h.llm.calls(), 1);

        // Nothing is tracked for a failed generation.
        let (_, body) = send(&h.router, "GET", "/api/v1/applications/jane", None).await;
        assert_eq!(body["stats"]["total"], 0);
    }

    #[tokio::test]
    async fn test_generate_unparseable_reply_is_502() {
        let h = harness(
            ScriptedGenerator::reply("Sorry, I cannot help with that.".to_string()),
            Some(satisfiable_document()),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Senior Android engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SELECTION_PARSE_ERROR");
        assert_eq!(
            body["error"]["details"]["raw_reply"],
            "Sorry, I cannot help with that."
        );
    }

    #[tokio::test]
    async fn test_generate_timeout_is_502() {
        let h = harness(ScriptedGenerator::fail_with_timeout(), Some(satisfiable_document())).await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Senior Android engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SELECTION_REQUEST_ERROR");
        assert_eq!(h.llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_job_description() {
        let h = harness(
            ScriptedGenerator::reply(valid_selection_json()),
            Some(satisfiable_document()),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let h = harness(ScriptedGenerator::reply(String::new()), Some(satisfiable_document())).await;
        let selection = serde_json::to_value(valid_selection()).unwrap();

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/validate",
            Some(json!({ "selection": selection })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "valid");

        let mut selection = valid_selection();
        selection.projects.clear();
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/validate",
            Some(json!({ "selection": selection })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "invalid");
        assert_eq!(body["violations"][0]["kind"], "project_count_violation");
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_edited_selection_skips_llm() {
        let h = harness(ScriptedGenerator::reply(String::new()), Some(satisfiable_document())).await;
        let selection = serde_json::to_value(valid_selection()).unwrap();

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/render",
            Some(json!({ "selection": selection })),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        let path = body["artifact"]["path"].as_str().unwrap();
        assert!(std::path::Path::new(path).exists());
        assert!(body.get("application").is_none());
        assert_eq!(h.llm.calls(), 0);

        // Rendering is not an application; nothing is tracked.
        let (_, body) = send(&h.router, "GET", "/api/v1/applications/jane", None).await;
        assert_eq!(body["stats"]["total"], 0);
    }

    #[tokio::test]
    async fn test_render_rejects_duplicated_bullets() {
        let h = harness(ScriptedGenerator::reply(String::new()), Some(satisfiable_document())).await;
        let mut selection = valid_selection();
        let first = selection.companies[0].bullets[0].clone();
        selection.companies[0].bullets[1] = first;

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/render",
            Some(json!({ "selection": selection })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "SELECTION_INVALID");
        assert_eq!(
            body["error"]["details"]["violations"][0]["kind"],
            "duplicate_bullet"
        );
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_heard_back() {
        let h = harness(
            ScriptedGenerator::reply(valid_selection_json()),
            Some(satisfiable_document()),
        )
        .await;
        send(
            &h.router,
            "POST",
            "/api/v1/resumes/jane/generate",
            Some(json!({"job_description": "Android", "company_name": "Globex"})),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "PATCH",
            "/api/v1/applications/jane/1",
            Some(json!({"heard_back": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["heard_back"], true);

        let (status, _) = send(
            &h.router,
            "PATCH",
            "/api/v1/applications/jane/99",
            Some(json!({"heard_back": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
