use std::collections::HashMap;

use jiff::Timestamp;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::models::{Movie, MoviePage, NewMovie, NewUser, User};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Both values are clamped to at least 1.
    pub fn new(number: u32, size: u32) -> Self {
        Self { number: number.max(1), size: size.max(1) }
    }

    fn offset(self) -> usize {
        (self.number.saturating_sub(1) as usize).saturating_mul(self.size as usize)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MovieFilter {
    All,
    Category(String),
    Genre(String),
    Search(String),
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        match self {
            MovieFilter::All => true,
            MovieFilter::Category(category) => {
                movie.category.as_str().eq_ignore_ascii_case(category.trim())
            },
            MovieFilter::Genre(genre) => {
                let genre = genre.to_lowercase();
                movie.genres.iter().any(|g| g.to_lowercase() == genre)
            },
            MovieFilter::Search(query) => {
                let query = query.to_lowercase();
                movie.title.to_lowercase().contains(&query)
                    || movie.genres.iter().any(|g| g.to_lowercase().contains(&query))
                    || movie.category.as_str().contains(&query)
            },
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("username `{0}` is already taken")]
    UsernameTaken(String),
    #[error("email `{0}` is already registered")]
    EmailTaken(String),
}

/// In-memory catalog. Movies are kept in insertion order, which is also
/// creation order; listings walk it backwards for latest-first results.
pub struct MovieStore {
    state: RwLock<State>,
    ready: watch::Sender<bool>,
}

#[derive(Default)]
struct State {
    movies: Vec<Movie>,
    index: HashMap<Uuid, usize>,
    users: HashMap<Uuid, User>,
    last_created: Option<Timestamp>,
}

impl State {
    /// Never earlier than the previous insert, even if the clock steps back.
    fn next_created_at(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let created_at = match self.last_created {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created = Some(created_at);
        created_at
    }

    fn insert(&mut self, new: NewMovie) -> &Movie {
        let mut id = Uuid::new_v4();
        while self.index.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let created_at = self.next_created_at();
        self.index.insert(id, self.movies.len());
        self.movies.push(Movie::from_new(id, created_at, new));
        &self.movies[self.movies.len() - 1]
    }

    fn latest_first(&self, filter: &MovieFilter) -> Vec<&Movie> {
        // Insertion order is creation order, so reversing is enough.
        self.movies.iter().rev().filter(|m| filter.matches(m)).collect()
    }
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore {
    /// A store that serves reads immediately.
    pub fn new() -> Self {
        Self::with_readiness(true)
    }

    /// A store whose reads wait until `mark_ready` is called.
    pub fn loading() -> Self {
        Self::with_readiness(false)
    }

    fn with_readiness(ready: bool) -> Self {
        let (ready, _) = watch::channel(ready);
        Self { state: RwLock::new(State::default()), ready }
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as the store, so this only returns once ready.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    pub async fn query(&self, filter: &MovieFilter, page: Page) -> MoviePage {
        self.wait_ready().await;
        let state = self.state.read().await;

        let matches = state.latest_first(filter);
        let total = matches.len();
        let movies = matches
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .cloned()
            .collect();

        MoviePage { movies, total }
    }

    pub async fn all_movies(&self, page: Page) -> MoviePage {
        self.query(&MovieFilter::All, page).await
    }

    pub async fn movies_by_category(&self, category: &str, page: Page) -> MoviePage {
        self.query(&MovieFilter::Category(category.to_string()), page).await
    }

    pub async fn movies_by_genre(&self, genre: &str, page: Page) -> MoviePage {
        self.query(&MovieFilter::Genre(genre.to_string()), page).await
    }

    pub async fn search_movies(&self, query: &str, page: Page) -> MoviePage {
        self.query(&MovieFilter::Search(query.to_string()), page).await
    }

    pub async fn featured_movies(&self) -> Vec<Movie> {
        self.wait_ready().await;
        let state = self.state.read().await;
        state.latest_first(&MovieFilter::All).into_iter().filter(|m| m.featured).cloned().collect()
    }

    /// Ids that are not UUIDs are simply absent.
    pub async fn movie_by_id(&self, id: &str) -> Option<Movie> {
        let id = Uuid::parse_str(id).ok()?;
        self.wait_ready().await;
        let state = self.state.read().await;
        state.index.get(&id).map(|&i| state.movies[i].clone())
    }

    pub async fn create_movie(&self, new: NewMovie) -> Movie {
        self.wait_ready().await;
        self.state.write().await.insert(new).clone()
    }

    /// Bulk insert used by ingestion; does not wait for readiness.
    pub async fn insert_many(&self, movies: Vec<NewMovie>) -> usize {
        let mut state = self.state.write().await;
        let count = movies.len();
        for new in movies {
            state.insert(new);
        }
        count
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.movies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.state.read().await.users.values().find(|u| u.username == username).cloned()
    }

    /// Usernames and emails are unique, compared case-insensitively.
    pub async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username.eq_ignore_ascii_case(&new.username)) {
            return Err(StoreError::UsernameTaken(new.username));
        }
        if state.users.values().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
            return Err(StoreError::EmailTaken(new.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Timestamp::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}
