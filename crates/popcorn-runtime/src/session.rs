//! Application state, driven by [`Message`]s.
//!
//! Owns the search query, the open movie (detail, rating input and its
//! Escape binding), the watched list, and the global key bindings.

use std::sync::Arc;

use popcorn_api::MovieService;
use popcorn_core::error::PopcornError;
use popcorn_core::keymap::{Key, KeyBinding, Keymap};
use popcorn_core::models::WatchedEntry;
use popcorn_core::rating::RatingCapture;
use popcorn_core::storage::KeyValueStore;
use popcorn_core::watched::{AddOutcome, WatchedList};

use crate::details::{DetailLoader, DetailState};
use crate::resolver::{SearchResolver, SearchState};

/// Window title when no movie is open.
pub const APP_TITLE: &str = "usePopcorn";

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    QueryChanged(String),
    /// Open a movie, or close it if it is already open.
    SelectMovie(String),
    CloseMovie,
    Rate(u8),
    /// Commit the rating and add the open movie to the watched list.
    AddWatched,
    DeleteWatched(String),
    /// The search input gained or lost focus.
    SearchFocus(bool),
    /// Focus the search input and clear it, unless it already has focus.
    FocusSearch,
    KeyPressed(Key),
}

struct OpenMovie {
    imdb_id: String,
    rating: RatingCapture,
    _escape: KeyBinding,
}

pub struct Session<S> {
    resolver: SearchResolver<S>,
    details: DetailLoader<S>,
    watched: WatchedList,
    open: Option<OpenMovie>,
    search_focused: bool,
    keymap: Keymap<Message>,
    _enter: KeyBinding,
}

impl<S: MovieService + 'static> Session<S> {
    pub fn new(
        service: Arc<S>,
        store: Arc<dyn KeyValueStore>,
        min_query_len: usize,
    ) -> Result<Self, PopcornError> {
        let watched = WatchedList::load(store)?;
        let keymap = Keymap::new();
        let enter = keymap.bind(Key::Enter, Message::FocusSearch);

        Ok(Self {
            resolver: SearchResolver::new(Arc::clone(&service)).with_min_query_len(min_query_len),
            details: DetailLoader::new(service),
            watched,
            open: None,
            search_focused: false,
            keymap,
            _enter: enter,
        })
    }

    pub fn update(&mut self, message: Message) -> Result<(), PopcornError> {
        match message {
            Message::QueryChanged(query) => {
                self.resolver.set_query(query);
            }
            Message::SelectMovie(imdb_id) => {
                if self.selected_id() == Some(imdb_id.as_str()) {
                    self.close_movie();
                } else {
                    self.open_movie(imdb_id);
                }
            }
            Message::CloseMovie => self.close_movie(),
            Message::Rate(rating) => {
                let Some(open) = self.open.as_mut() else {
                    return Ok(());
                };
                if self.watched.contains(&open.imdb_id) {
                    tracing::debug!(imdb_id = %open.imdb_id, "Already rated, ignoring");
                    return Ok(());
                }
                open.rating.select(rating)?;
            }
            Message::AddWatched => self.add_watched()?,
            Message::DeleteWatched(imdb_id) => {
                if self.watched.remove(&imdb_id)? {
                    tracing::info!(imdb_id = %imdb_id, "Removed from watched list");
                }
            }
            Message::SearchFocus(focused) => self.search_focused = focused,
            Message::FocusSearch => {
                if !self.search_focused {
                    self.search_focused = true;
                    self.resolver.set_query(String::new());
                }
            }
            Message::KeyPressed(key) => {
                for message in self.keymap.dispatch(&key) {
                    self.update(message)?;
                }
            }
        }
        Ok(())
    }

    fn open_movie(&mut self, imdb_id: String) {
        tracing::debug!(imdb_id = %imdb_id, "Opening movie");
        let escape = self.keymap.bind(Key::Escape, Message::CloseMovie);
        self.details.load(imdb_id.clone());
        self.open = Some(OpenMovie {
            imdb_id,
            rating: RatingCapture::new(),
            _escape: escape,
        });
    }

    fn close_movie(&mut self) {
        if self.open.take().is_some() {
            self.details.clear();
        }
    }

    fn add_watched(&mut self) -> Result<(), PopcornError> {
        let Some(open) = self.open.as_ref() else {
            return Ok(());
        };
        let Some(committed) = open.rating.commit() else {
            tracing::debug!("No rating selected, nothing to add");
            return Ok(());
        };
        let Some(detail) = self.details.state().movie else {
            tracing::debug!(imdb_id = %open.imdb_id, "Details not loaded yet");
            return Ok(());
        };

        let entry = WatchedEntry {
            imdb_id: open.imdb_id.clone(),
            runtime: detail.runtime_minutes(),
            title: detail.title,
            poster: detail.poster,
            imdb_rating: detail.imdb_rating,
            user_rating: committed.rating,
            count_rating_decisions: committed.decisions,
        };
        if self.watched.add(entry)? == AddOutcome::Added {
            tracing::info!(
                imdb_id = %open.imdb_id,
                rating = committed.rating,
                "Added to watched list"
            );
        }
        self.close_movie();
        Ok(())
    }

    /// Wait for in-flight search and detail requests to settle.
    pub async fn settled(&mut self) {
        self.resolver.settled().await;
        self.details.settled().await;
    }

    pub fn query(&self) -> &str {
        self.resolver.query()
    }

    pub fn search(&self) -> SearchState {
        self.resolver.state()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.imdb_id.as_str())
    }

    pub fn detail(&self) -> DetailState {
        self.details.state()
    }

    /// Rating currently chosen for the open movie.
    pub fn pending_rating(&self) -> Option<u8> {
        self.open.as_ref().and_then(|o| o.rating.selected())
    }

    pub fn watched(&self) -> &WatchedList {
        &self.watched
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn title(&self) -> String {
        if self.open.is_some() {
            if let Some(movie) = self.details.state().movie {
                if !movie.title.is_empty() {
                    return format!("Movie: {}", movie.title);
                }
            }
        }
        APP_TITLE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_core::storage::MemoryStore;
    use popcorn_core::watched::WATCHED_KEY;

    use crate::testing::FakeService;

    fn session() -> (Session<FakeService>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(Arc::new(FakeService::new()), store.clone(), 3).unwrap();
        (session, store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_and_add() {
        let (mut session, store) = session();
        session.update(Message::QueryChanged("batman".into())).unwrap();
        session.settled().await;
        assert_eq!(session.search().results.len(), 2);

        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.settled().await;
        assert_eq!(session.title(), "Movie: Title tt001");

        session.update(Message::Rate(6)).unwrap();
        session.update(Message::Rate(8)).unwrap();
        session.update(Message::AddWatched).unwrap();

        assert!(session.selected_id().is_none());
        assert_eq!(session.title(), APP_TITLE);
        let entry = session.watched().get("tt001").unwrap();
        assert_eq!(entry.user_rating, 8);
        assert_eq!(entry.count_rating_decisions, 2);
        assert_eq!(entry.runtime, Some(120));
        assert_eq!(entry.imdb_rating, Some(7.5));

        let raw = store.get(WATCHED_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""imdbID":"tt001""#));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_requires_rating() {
        let (mut session, _store) = session();
        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.settled().await;
        session.update(Message::AddWatched).unwrap();

        assert!(session.watched().is_empty());
        assert_eq!(session.selected_id(), Some("tt001"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_watched_ignores_rating() {
        let (mut session, _store) = session();
        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.settled().await;
        session.update(Message::Rate(9)).unwrap();
        session.update(Message::AddWatched).unwrap();

        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.settled().await;
        session.update(Message::Rate(2)).unwrap();
        assert!(session.pending_rating().is_none());
        session.update(Message::AddWatched).unwrap();

        assert_eq!(session.watched().len(), 1);
        assert_eq!(session.watched().user_rating("tt001"), Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_rating_is_an_error() {
        let (mut session, _store) = session();
        session.update(Message::SelectMovie("tt001".into())).unwrap();
        assert!(matches!(
            session.update(Message::Rate(11)),
            Err(PopcornError::InvalidRating(11))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_toggles() {
        let (mut session, _store) = session();
        session.update(Message::SelectMovie("tt001".into())).unwrap();
        assert_eq!(session.selected_id(), Some("tt001"));
        session.update(Message::SelectMovie("tt002".into())).unwrap();
        assert_eq!(session.selected_id(), Some("tt002"));
        session.update(Message::SelectMovie("tt002".into())).unwrap();
        assert!(session.selected_id().is_none());
        assert_eq!(session.detail(), DetailState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_closes_open_movie_only() {
        let (mut session, _store) = session();
        assert!(session.keymap.dispatch(&Key::Escape).is_empty());

        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.update(Message::SelectMovie("tt002".into())).unwrap();
        assert_eq!(session.keymap.dispatch(&Key::Escape).len(), 1);

        session.update(Message::KeyPressed(Key::parse("ESCAPE"))).unwrap();
        assert!(session.selected_id().is_none());
        assert!(session.keymap.dispatch(&Key::Escape).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_focuses_and_clears_search() {
        let (mut session, _store) = session();
        session.update(Message::QueryChanged("batman".into())).unwrap();
        session.settled().await;

        session.update(Message::KeyPressed(Key::Enter)).unwrap();
        assert!(session.is_search_focused());
        assert_eq!(session.query(), "");
        assert!(session.search().results.is_empty());

        // Enter while typing in the input leaves the query alone.
        session.update(Message::QueryChanged("robin".into())).unwrap();
        session.update(Message::KeyPressed(Key::Enter)).unwrap();
        assert_eq!(session.query(), "robin");

        session.update(Message::SearchFocus(false)).unwrap();
        session.update(Message::KeyPressed(Key::Enter)).unwrap();
        assert_eq!(session.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_watched() {
        let (mut session, store) = session();
        session.update(Message::SelectMovie("tt001".into())).unwrap();
        session.settled().await;
        session.update(Message::Rate(8)).unwrap();
        session.update(Message::AddWatched).unwrap();

        session.update(Message::DeleteWatched("tt999".into())).unwrap();
        assert_eq!(session.watched().len(), 1);
        session.update(Message::DeleteWatched("tt001".into())).unwrap();
        assert!(session.watched().is_empty());
        assert_eq!(store.get(WATCHED_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watched_survives_new_session() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut session = Session::new(Arc::new(FakeService::new()), store.clone(), 3).unwrap();
            session.update(Message::SelectMovie("tt001".into())).unwrap();
            session.settled().await;
            session.update(Message::Rate(7)).unwrap();
            session.update(Message::AddWatched).unwrap();
        }
        let session = Session::new(Arc::new(FakeService::new()), store, 3).unwrap();
        assert_eq!(session.watched().user_rating("tt001"), Some(7));
    }
}
