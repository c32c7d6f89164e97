// src/ui/shell.rs
//! Navigation between the search screen and a candidate's detail

use tracing::{info, warn};

use crate::core::query_builder::{
    build_context_filters, build_prompt, build_search_params, AskContext, FilterState,
};
use crate::core::service_client::CandidateServiceClient;
use crate::core::view_task::ViewScope;
use crate::error::ServiceError;
use crate::ui::detail::DetailView;
use crate::ui::results::{ResultList, SelectionError};

pub const EMPTY_CHAT_MESSAGE: &str = "Escribe una consulta antes de preguntar";
pub const ASK_FAILED_MESSAGE: &str = "❌ Error al consultar al modelo.";

/// Static navigation bar: (label, CLI subcommand)
pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("Buscar", "search"),
    ("Subir CVs", "upload"),
    ("Chat", "ask"),
];

pub fn render_navbar() -> String {
    let items: Vec<String> = NAV_ITEMS
        .iter()
        .map(|(label, command)| format!("{} ({})", label, command))
        .collect();
    format!("CV Search | {}", items.join(" · "))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Which half of the search screen has focus. Searches never move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPanel {
    #[default]
    Results,
    Chat,
}

#[derive(Debug, Default)]
pub struct SearchView {
    pub filters: FilterState,
    pub chat_input: String,
    results: ResultList,
    answer: Option<String>,
    status: SearchStatus,
    panel: SearchPanel,
    scope: ViewScope,
}

impl SearchView {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn results(&self) -> &ResultList {
        &self.results
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn panel(&self) -> SearchPanel {
        self.panel
    }

    pub fn focus(&mut self, panel: SearchPanel) {
        self.panel = panel;
    }

    /// Run the search built from the current filters
    pub async fn search(&mut self, client: &CandidateServiceClient) {
        let query = self.filters.search_query();
        let params = build_search_params(&self.filters);
        self.status = SearchStatus::Loading;

        match self.scope.run(client.search(&query, &params)).await {
            Some(Ok(response)) => {
                self.results = ResultList::new(response.matches);
                self.status = SearchStatus::Ready;
            }
            Some(Err(e)) => {
                warn!("Search failed: {}", e);
                self.status = SearchStatus::Error(e.user_message());
            }
            None => self.status = SearchStatus::Idle,
        }
    }

    /// Ask the model with the prompt built from the filters
    pub async fn ask_with_filters(&mut self, client: &CandidateServiceClient) {
        let prompt = build_prompt(&self.filters);
        let context = build_context_filters(&self.filters);
        self.consult(client, &prompt, &context).await;
    }

    /// Ask the model with the free chat input
    pub async fn ask_chat(&mut self, client: &CandidateServiceClient) -> Result<(), ServiceError> {
        let question = self.chat_input.trim().to_string();
        if question.is_empty() {
            return Err(ServiceError::Validation(EMPTY_CHAT_MESSAGE.to_string()));
        }
        self.consult(client, &question, &AskContext::default()).await;
        Ok(())
    }

    async fn consult(&mut self, client: &CandidateServiceClient, prompt: &str, context: &AskContext) {
        self.status = SearchStatus::Loading;

        match self.scope.run(client.ask(prompt, context)).await {
            Some(Ok(response)) => {
                self.answer = Some(response.answer);
                self.status = SearchStatus::Ready;
            }
            Some(Err(e)) => {
                warn!("Model query failed: {}", e);
                self.answer = Some(ASK_FAILED_MESSAGE.to_string());
                self.status = SearchStatus::Error(e.user_message());
            }
            None => self.status = SearchStatus::Idle,
        }
    }

    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if let SearchStatus::Error(message) = &self.status {
            sections.push(message.clone());
        }
        match self.panel {
            SearchPanel::Results => {
                if self.status != SearchStatus::Idle || !self.results.is_empty() {
                    sections.push(self.results.render());
                }
            }
            SearchPanel::Chat => {
                if let Some(answer) = &self.answer {
                    sections.push(answer.clone());
                }
            }
        }
        sections.join("\n\n")
    }
}

#[derive(Debug)]
pub enum View {
    Search(SearchView),
    Detail {
        detail: DetailView,
        previous: Box<SearchView>,
    },
}

#[derive(Debug)]
pub struct App {
    view: View,
}

impl Default for App {
    fn default() -> Self {
        Self::new(SearchView::default())
    }
}

impl App {
    pub fn new(search: SearchView) -> Self {
        Self {
            view: View::Search(search),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn search_view(&mut self) -> Option<&mut SearchView> {
        match &mut self.view {
            View::Search(search) => Some(search),
            View::Detail { .. } => None,
        }
    }

    pub fn detail_view(&mut self) -> Option<&mut DetailView> {
        match &mut self.view {
            View::Detail { detail, .. } => Some(detail),
            View::Search(_) => None,
        }
    }

    /// Open the detail of the result shown at `position` (1-based)
    pub fn open_result(&mut self, position: usize) -> Result<(), SelectionError> {
        let View::Search(search) = &self.view else {
            return Err(SelectionError::NotSearching);
        };

        let results = search.results();
        let canonical = results.select(position, str::to_string)?;
        let mut ids = results.matches()[position - 1].alternate_ids.clone();
        if ids.first() != Some(&canonical) {
            ids.retain(|id| *id != canonical);
            ids.insert(0, canonical);
        }

        self.show_detail(DetailView::new(ids));
        Ok(())
    }

    /// Open a candidate directly by identifier
    pub fn open_candidate(&mut self, candidate_id: &str) {
        self.show_detail(DetailView::for_id(candidate_id));
    }

    fn show_detail(&mut self, detail: DetailView) {
        info!("Opening candidate detail {:?}", detail.candidate_ids());
        let previous = match std::mem::replace(&mut self.view, View::Search(SearchView::default())) {
            View::Search(search) => Box::new(search),
            View::Detail { previous, .. } => previous,
        };
        self.view = View::Detail { detail, previous };
    }

    /// Return to the previous view. The detail view is dropped with any request in flight.
    pub fn back(&mut self) -> bool {
        if matches!(self.view, View::Search(_)) {
            return false;
        }
        if let View::Detail { previous, .. } =
            std::mem::replace(&mut self.view, View::Search(SearchView::default()))
        {
            self.view = View::Search(*previous);
        }
        true
    }

    pub fn render(&self) -> String {
        let body = match &self.view {
            View::Search(search) => search.render(),
            View::Detail { detail, .. } => detail.render(),
        };
        format!("{}\n\n{}", render_navbar(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CandidateMatch;

    fn search_with(json: &str) -> SearchView {
        let matches: Vec<CandidateMatch> = serde_json::from_str(json).unwrap();
        let mut search = SearchView::default();
        search.results = ResultList::new(matches);
        search.status = SearchStatus::Ready;
        search
    }

    #[test]
    fn test_open_result_and_back() {
        let mut search = search_with(r#"[{"candidateId": "x1", "cv_id": 5}]"#);
        search.filters.required_languages = "Inglés".to_string();
        let mut app = App::new(search);

        app.open_result(1).unwrap();
        let detail = app.detail_view().unwrap();
        assert_eq!(detail.candidate_ids(), &["5".to_string(), "x1".to_string()]);
        let token = detail.scope().token();

        assert!(app.back());
        assert!(token.is_cancelled());
        let search = app.search_view().unwrap();
        assert_eq!(search.filters.required_languages, "Inglés");
        assert_eq!(search.results().len(), 1);
        assert!(!app.back());
    }

    #[test]
    fn test_open_result_without_id_stays_on_search() {
        let mut app = App::new(search_with(r#"[{"name": "Anónimo"}]"#));
        assert_eq!(app.open_result(1), Err(SelectionError::MissingIdentifier));
        assert!(matches!(app.view(), View::Search(_)));
    }

    #[test]
    fn test_empty_results_keep_panel() {
        let mut search = search_with("[]");
        search.focus(SearchPanel::Results);
        assert_eq!(search.panel(), SearchPanel::Results);
        assert!(search.render().contains("No se encontraron candidatos"));
    }

    #[tokio::test]
    async fn test_search_without_matches_keeps_chat_panel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"matches": []}"#)
            .create_async()
            .await;
        let config = crate::config::ClientConfig::default().with_service_url(&server.url());
        let client = CandidateServiceClient::new(&config).unwrap();

        let mut search = SearchView::default();
        search.focus(SearchPanel::Chat);
        search.search(&client).await;

        assert_eq!(search.status(), &SearchStatus::Ready);
        assert!(search.results().is_empty());
        assert_eq!(search.panel(), SearchPanel::Chat);
        search.focus(SearchPanel::Results);
        assert!(search.render().contains("No se encontraron candidatos"));
    }

    #[tokio::test]
    async fn test_blank_chat_is_rejected() {
        let client =
            CandidateServiceClient::new(&crate::config::ClientConfig::default()).unwrap();
        let mut search = SearchView::default();
        search.chat_input = "   ".to_string();
        match search.ask_chat(&client).await {
            Err(ServiceError::Validation(message)) => assert_eq!(message, EMPTY_CHAT_MESSAGE),
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(search.status(), &SearchStatus::Idle);
    }

    #[test]
    fn test_navbar_lists_commands() {
        let navbar = render_navbar();
        assert!(navbar.contains("Buscar (search)"));
        assert!(navbar.contains("Subir CVs (upload)"));
    }
}
