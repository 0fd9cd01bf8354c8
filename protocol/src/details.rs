use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// Number of billed cast members kept for the details view.
pub const TOP_CAST_LIMIT: usize = 6;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub adult: bool,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Credits {
    pub id: u64,
    pub cast: Vec<CastMember>,
}

impl Credits {
    /// First `limit` cast members in billing order.
    pub fn top_cast(mut self, limit: usize) -> Vec<CastMember> {
        self.cast.truncate(limit);
        self.cast
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieWithCast {
    pub movie: MovieDetails,
    pub cast: Vec<CastMember>,
}
