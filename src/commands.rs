//! Terminal front end for the use cases.
//!
//! Each handler writes human-readable lines to `out` and returns an error
//! only for failures the user should see in the exit status.

use std::io::Write;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use cs_app::{SearchUpdate, ToggleOutcome};
use cs_core::movie::{MediaType, MovieDetail, MovieSummary, QueryResult, SearchResult};
use cs_core::ports::MovieCachePort;
use cs_core::MovieId;

use crate::bootstrap::AppServices;

/// One debounced search; prints the final state.
pub async fn search(services: &AppServices, term: &str, out: &mut impl Write) -> Result<()> {
    let outcome = services
        .orchestrator
        .search(term)
        .finished()
        .await
        .context("search was interrupted")?;
    tracing::debug!(?outcome, "search command finished");

    let update = services.search_state.current();
    write_search_result(out, &update.result)?;
    if let QueryResult::Failed(reason) = update.result {
        bail!("search failed: {reason}");
    }
    Ok(())
}

/// Each input line replaces the current search, as if typed into a box.
///
/// Prints every state the search passes through. Lines arriving within
/// the debounce window supersede each other without touching the network.
/// `:select <id>` highlights a cached title in later listings and `:toggle`
/// flips the favorite flag of the selection.
pub async fn watch<R>(services: &AppServices, input: R, out: &mut impl Write) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut updates = services.search_state.subscribe();
    updates.borrow_and_update();
    let mut last_ticket = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("failed to read input")? {
                Some(line) => match line.trim().strip_prefix(':') {
                    Some(command) => watch_command(services, command, out).await?,
                    None => last_ticket = Some(services.orchestrator.search(line.trim())),
                },
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = updates.borrow_and_update().clone();
                write_update(services, out, update)?;
            }
        }
    }

    if let Some(ticket) = last_ticket {
        ticket.finished().await;
    }
    if updates.has_changed().unwrap_or(false) {
        let update = updates.borrow_and_update().clone();
        write_update(services, out, update)?;
    }
    Ok(())
}

async fn watch_command(services: &AppServices, command: &str, out: &mut impl Write) -> Result<()> {
    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("select"), Some(id)) => {
            let id = MovieId::from(id);
            match services.cache.find_by_id(&id).await? {
                Some(movie) => {
                    services.toggler.select(Some(movie));
                    writeln!(out, "selected {id}")?;
                }
                None => writeln!(out, "{id} is not cached yet")?,
            }
        }
        (Some("toggle"), None) => {
            let outcome = services.toggler.toggle(None).outcome().await;
            writeln!(out, "toggle: {outcome:?}")?;
        }
        _ => writeln!(out, "unknown command :{command}")?,
    }
    Ok(())
}

pub async fn details(services: &AppServices, id: &str, out: &mut impl Write) -> Result<()> {
    let id = MovieId::from(id);
    let movie = match services.cache.find_by_id(&id).await? {
        Some(movie) => movie,
        // Lookup key only; uncached titles are not stored.
        None => MovieSummary::new(id.clone(), id.as_str(), "", MediaType::Movie, "N/A"),
    };

    let mut emitted = Vec::new();
    services
        .details
        .execute(&movie, |result| emitted.push(result))
        .await;

    let mut final_state = None;
    for result in emitted {
        match &result {
            QueryResult::Pending => writeln!(out, "loading {id}...")?,
            QueryResult::Ready(detail) => write_detail(out, detail)?,
            QueryResult::Failed(reason) => writeln!(out, "error: {reason}")?,
        }
        final_state = Some(result);
    }
    if let Some(QueryResult::Failed(reason)) = final_state {
        bail!("details failed: {reason}");
    }
    Ok(())
}

pub async fn favorites(services: &AppServices, out: &mut impl Write) -> Result<()> {
    let favorites = services.favorites.snapshot().await?;
    if favorites.is_empty() {
        writeln!(out, "no favorites yet")?;
    }
    for movie in &favorites {
        writeln!(out, "{}", format_summary(movie))?;
    }
    Ok(())
}

/// Flip the favorite flag of a cached title.
pub async fn toggle(services: &AppServices, id: &str, out: &mut impl Write) -> Result<()> {
    let id = MovieId::from(id);
    let Some(movie) = services.cache.find_by_id(&id).await? else {
        bail!("{id} is not cached yet, search for it first");
    };

    services.toggler.select(Some(movie));
    match services.toggler.toggle(None).outcome().await {
        ToggleOutcome::Committed(true) => writeln!(out, "{id} added to favorites")?,
        ToggleOutcome::Committed(false) => writeln!(out, "{id} removed from favorites")?,
        ToggleOutcome::FailedSilently => bail!("could not save favorite for {id}"),
        outcome @ (ToggleOutcome::Cancelled | ToggleOutcome::Skipped) => {
            writeln!(out, "{id}: nothing changed ({outcome:?})")?
        }
    }
    Ok(())
}

pub async fn set_favorite(
    services: &AppServices,
    id: &str,
    favorite: bool,
    out: &mut impl Write,
) -> Result<()> {
    let id = MovieId::from(id);
    if !services.set_favorite.execute(&id, favorite).await {
        bail!("could not update {id}; is it cached?");
    }
    writeln!(out, "{id} favorite = {favorite}")?;
    Ok(())
}

fn write_update(
    services: &AppServices,
    out: &mut impl Write,
    mut update: SearchUpdate,
) -> std::io::Result<()> {
    if let QueryResult::Ready(movies) = &mut update.result {
        services.toggler.restore_selection(movies);
    }
    if !update.term.is_empty() {
        writeln!(out, "[{}] {}", update.generation, update.term)?;
    }
    write_search_result(out, &update.result)
}

pub fn write_search_result(out: &mut impl Write, result: &SearchResult) -> std::io::Result<()> {
    match result {
        QueryResult::Pending => writeln!(out, "searching..."),
        QueryResult::Ready(movies) if movies.is_empty() => writeln!(out, "no results"),
        QueryResult::Ready(movies) => {
            for movie in movies {
                writeln!(out, "{}", format_summary(movie))?;
            }
            Ok(())
        }
        QueryResult::Failed(reason) => writeln!(out, "error: {reason}"),
    }
}

pub fn format_summary(movie: &MovieSummary) -> String {
    let cursor = if movie.is_selected { "> " } else { "" };
    let marker = if movie.is_favorite { " *" } else { "" };
    format!(
        "{}{:<10} {:<9} {:<7} {}{}",
        cursor,
        movie.id().as_str(),
        movie.year,
        movie.media_type.as_str(),
        movie.title,
        marker
    )
}

fn write_detail(out: &mut impl Write, detail: &MovieDetail) -> std::io::Result<()> {
    writeln!(out, "{} ({})", detail.title, detail.year)?;
    let fields = [
        ("Rated", &detail.rated),
        ("Released", &detail.released),
        ("Runtime", &detail.runtime),
        ("Genre", &detail.genre),
        ("Director", &detail.director),
        ("Writer", &detail.writer),
        ("Actors", &detail.actors),
        ("Language", &detail.language),
        ("Country", &detail.country),
        ("Awards", &detail.awards),
        ("IMDb", &detail.imdb_rating),
    ];
    for (label, value) in fields {
        if !value.is_empty() && value != "N/A" {
            writeln!(out, "  {label:<9} {value}")?;
        }
    }
    for rating in &detail.ratings {
        writeln!(out, "  {:<9} {} ({})", "Rating", rating.value, rating.source)?;
    }
    if !detail.plot.is_empty() {
        writeln!(out, "\n  {}", detail.plot)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> MovieSummary {
        MovieSummary::new(MovieId::from(id), "Alien", "1979", MediaType::Movie, "N/A")
    }

    #[test]
    fn test_format_summary_marks_favorites() {
        let plain = format_summary(&movie("tt0078748"));
        let starred = format_summary(&movie("tt0078748").with_favorite(true));

        assert!(plain.starts_with("tt0078748"));
        assert!(plain.ends_with("Alien"));
        assert!(starred.ends_with("Alien *"));

        let mut selected = movie("tt0078748");
        selected.is_selected = true;
        assert!(format_summary(&selected).starts_with("> tt0078748"));
    }

    #[test]
    fn test_write_search_result_states() {
        let mut out = Vec::new();
        write_search_result(&mut out, &QueryResult::Pending).unwrap();
        write_search_result(&mut out, &QueryResult::Ready(Vec::new())).unwrap();
        write_search_result(&mut out, &QueryResult::Failed("Movie not found!".into())).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "searching...\nno results\nerror: Movie not found!\n"
        );
    }

    #[test]
    fn test_write_detail_skips_empty_fields() {
        let mut detail = MovieDetail::new(MovieId::from("tt1"), "Alien", "1979");
        detail.director = "Ridley Scott".into();
        detail.rated = "N/A".into();
        let mut out = Vec::new();

        write_detail(&mut out, &detail).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Alien (1979)\n"));
        assert!(text.contains("Director  Ridley Scott"));
        assert!(!text.contains("Rated"));
    }
}
