pub mod api_base;
pub mod artist;
pub mod artwork;
pub mod authorship;
pub mod credential;
pub mod ids;
pub mod route;
pub mod upload;

pub use api_base::ApiBase;
pub use artist::{Artist, ArtistKey, ArtistPatch, Credentials, RegisterData};
pub use artwork::{ArtistObject, ArtistRef, Artwork, ArtworkPatch, NestedArtist, NewArtwork};
pub use authorship::{ArtistDisplay, ArtistIdentity, ArtistQuery, NavTarget, resolve_artist_display};
pub use ids::{ArtistId, ArtworkId};
pub use route::Route;
pub use upload::UploadFile;
