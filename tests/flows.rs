// End-to-end flows against a mocked Candidate Service

use cv_search::config::ClientConfig;
use cv_search::core::query_builder::{FilterState, ProfessionalArea};
use cv_search::core::service_client::CandidateServiceClient;
use cv_search::core::upload::{
    FileOutcome, PendingFile, UploadFlow, UploadObserver, BATCH_DONE_MESSAGE,
};
use cv_search::ui::detail::{DetailTab, LoadState};
use cv_search::ui::shell::{App, SearchStatus, SearchView, View};
use mockito::Matcher;

fn client_for(server: &mockito::ServerGuard) -> CandidateServiceClient {
    let config = ClientConfig::default().with_service_url(&server.url());
    CandidateServiceClient::new(&config).unwrap()
}

#[tokio::test]
async fn search_then_open_detail() {
    let mut server = mockito::Server::new_async().await;
    let _search = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("industry_filter".into(), "Tecnología".into()),
            Matcher::UrlEncoded("min_score".into(), "70".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"matches": [
                {"candidate_id": "17", "name": "Marta Gil", "role": "Backend", "score": 88,
                 "match_strength": "Excelente"},
                {"cvId": "cv-2", "name": "Pablo Ruiz"}
            ]}"#,
        )
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/cv/17/analysis")
        .with_status(200)
        .with_body(
            r#"{
                "personal_info": {"nombre": "Marta Gil", "email": "marta@example.com"},
                "professional_info": {"industria": "Tecnología", "rol": "Backend", "anhos_experiencia": 7},
                "skills_and_languages": {"habilidades": ["Rust", "Go"], "idiomas": ["Inglés"]},
                "cv_info": {"id": "17", "overall_score": 88, "processed_status": "completed"}
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let filters = FilterState::new()
        .with_area(ProfessionalArea::Tecnologia)
        .with_years(5);
    let mut search = SearchView::new(filters);
    search.search(&client).await;

    assert_eq!(search.status(), &SearchStatus::Ready);
    assert_eq!(search.results().len(), 2);
    let rendered = search.render();
    assert!(rendered.contains("#1 Marta Gil"));
    assert!(rendered.contains("#2 Pablo Ruiz"));

    let mut app = App::new(search);
    app.open_result(1).unwrap();
    let view = app.detail_view().unwrap();
    view.load(&client).await;
    detail.assert_async().await;

    assert!(matches!(view.state(), LoadState::Ready(_)));
    assert!(view.render().contains("Marta Gil"));
    view.select_tab(DetailTab::Contact);
    assert!(view.render().contains("marta@example.com"));

    assert!(app.back());
    match app.view() {
        View::Search(search) => assert_eq!(search.results().len(), 2),
        View::Detail { .. } => panic!("Expected the search view after going back"),
    }
}

#[tokio::test]
async fn missing_candidate_shows_error_and_returns() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/cv/99/analysis")
        .with_status(404)
        .with_body(r#"{"detail": "CV not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut app = App::default();
    app.open_candidate("99");
    let view = app.detail_view().unwrap();
    view.load(&client).await;

    match view.state() {
        LoadState::Error(message) => assert!(message.contains("99")),
        other => panic!("Expected an error state, got {:?}", other),
    }
    assert!(view.render().contains("Volver"));

    assert!(app.back());
    assert!(matches!(app.view(), View::Search(_)));
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl UploadObserver for Recorder {
    fn started(&mut self, index: usize, total: usize, file: &PendingFile) {
        self.events.push(format!("start {}/{} {}", index + 1, total, file.name));
    }

    fn finished(&mut self, _index: usize, file: &PendingFile, outcome: &FileOutcome) {
        let state = if outcome.is_success() { "ok" } else { "failed" };
        self.events.push(format!("end {} {}", file.name, state));
    }
}

#[tokio::test]
async fn upload_batch_continues_after_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (name, status, body) in [
        ("uno.pdf", 200, r#"{"status": "ok", "id": 1}"#),
        ("dos.docx", 422, r#"{"detail": "Formato no soportado"}"#),
        ("tres.txt", 200, r#"{"status": "ok", "id": 3}"#),
    ] {
        let mock = server
            .mock("POST", "/documents/upload")
            .match_body(Matcher::Regex(format!(r#"filename="{}""#, name)))
            .with_status(status)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = ["uno.pdf", "dos.docx", "tres.txt"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"contenido").unwrap();
            path
        })
        .collect();

    let client = client_for(&server);
    let mut flow = UploadFlow::new();
    flow.select_files(&paths);
    let mut recorder = Recorder::default();
    let report = flow.upload_all(&client, &mut recorder).await.unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(report.summary, BATCH_DONE_MESSAGE);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    match &report.results[1].outcome {
        FileOutcome::Failed(message) => {
            assert_eq!(message, "Error al subir dos.docx: Formato no soportado")
        }
        other => panic!("Expected a failure for the second file, got {:?}", other),
    }
    assert!(flow.pending().is_empty());
    assert_eq!(
        recorder.events,
        vec![
            "start 1/3 uno.pdf",
            "end uno.pdf ok",
            "start 2/3 dos.docx",
            "end dos.docx failed",
            "start 3/3 tres.txt",
            "end tres.txt ok",
        ]
    );
}
