use crate::{
    db::{GenreStore, MovieStore},
    error::{AppError, AppResult},
    models::{Genre, Movie, NewMovie},
};

pub async fn list_movies(movies: &dyn MovieStore) -> AppResult<Vec<Movie>> {
    movies.list_movies().await
}

pub async fn get_movie(movies: &dyn MovieStore, imdb_id: &str) -> AppResult<Movie> {
    if imdb_id.trim().is_empty() {
        return Err(AppError::InvalidInput("Movie ID is required".to_string()));
    }

    movies
        .find_movie(imdb_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}

/// Validates and inserts a new movie, which starts without review or ranking
pub async fn add_movie(movies: &dyn MovieStore, new_movie: NewMovie) -> AppResult<Movie> {
    new_movie.validate()?;

    let movie = new_movie.into_movie();
    movies.insert_movie(&movie).await?;

    tracing::info!(imdb_id = %movie.imdb_id, title = %movie.title, "Movie added");

    Ok(movie)
}

pub async fn list_genres(genres: &dyn GenreStore) -> AppResult<Vec<Genre>> {
    genres.list_genres().await
}
