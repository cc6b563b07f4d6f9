mod list_favorites;
mod set_favorite;
mod toggle_favorite;

pub use list_favorites::ListFavorites;
pub use set_favorite::SetFavorite;
pub use toggle_favorite::{FavoriteToggleCoordinator, ToggleOutcome, ToggleTicket};
