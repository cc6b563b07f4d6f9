use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Catalogue identifier of a title (`imdbID` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl_id!(MovieId);
