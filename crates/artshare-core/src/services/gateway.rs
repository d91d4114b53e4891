use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::domain::artist::{Artist, ArtistKey, ArtistPatch, Credentials, RegisterData};
use crate::domain::artwork::{Artwork, ArtworkPatch, NewArtwork};
use crate::domain::credential::{authorization_header, extract_artist, extract_credential};
use crate::domain::ids::{ArtistId, ArtworkId};
use crate::domain::route::Route;
use crate::domain::upload::UploadFile;
use crate::domain::ApiBase;
use crate::errors::ApiError;
use crate::ports::{
  ApiRequest, ApiResponse, FormField, HttpTransport, Method, RequestBody, TransportError,
  UploadProgress,
};
use crate::services::session::SessionStore;

/// How the backend authenticated the login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
  /// Normalized `<Scheme> <value>`, already stored in the session.
  Token(String),
  /// No credential in the response; the cookie jar carries the session.
  SessionCookie,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
  pub credential: Credential,
  pub artist: Option<Artist>,
}

/// Typed access to the REST backend.
///
/// Every request carries the session token as `Authorization` when there is
/// one. A 401 expires the session before the error is returned.
pub struct ApiGateway<T>
where
  T: HttpTransport,
{
  transport: T,
  session: Arc<SessionStore>,
  base: ApiBase,
}

impl<T> ApiGateway<T>
where
  T: HttpTransport,
{
  pub fn new(transport: T, session: Arc<SessionStore>, base: ApiBase) -> Self {
    Self { transport, session, base }
  }

  pub fn base(&self) -> &ApiBase {
    &self.base
  }

  pub fn session(&self) -> &Arc<SessionStore> {
    &self.session
  }

  pub fn resolve_media_url(&self, url: Option<&str>) -> Option<String> {
    self.base.resolve_media_url(url)
  }

  // ---- artists ----

  pub async fn register(&self, data: &RegisterData) -> Result<Artist, ApiError> {
    let mut form = vec![
      FormField::text("username", data.username.as_str()),
      FormField::text("email", data.email.as_str()),
      FormField::text("password", data.password.as_str()),
    ];
    push_text(&mut form, "bio", data.bio.as_deref());
    push_file(&mut form, "profile_picture", data.profile_picture.as_ref());

    let artist: Artist =
      self.fetch(Method::Post, "/api/register/", RequestBody::Multipart(form)).await?;
    info!(artist = %artist.id, "registered {}", artist.username);
    Ok(artist)
  }

  /// Signs in and updates the session.
  ///
  /// A response without any credential is accepted only when the follow-up
  /// `artists/me` probe succeeds, which means the backend uses cookies.
  pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, ApiError> {
    let body = serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
    let response = self.send(Method::Post, "/api/login/", RequestBody::Json(body)).await?;

    let payload = response.json_value();
    let token = extract_credential(&payload, response.header("authorization"));
    let artist = extract_artist(&payload);

    if let Some(token) = token {
      self.session.set_token(Some(token.clone()))?;
      self.session.set_cookie_session(false)?;
      if artist.is_some() {
        self.session.set_artist(artist.clone())?;
      }
      info!(username = %credentials.username, "logged in");
      self.session.navigate(Route::Profile);
      return Ok(LoginOutcome { credential: Credential::Token(token), artist });
    }

    if artist.is_some() {
      self.session.set_artist(artist.clone())?;
    }

    debug!("login response carried no credential, probing for a session cookie");
    match self.current_artist().await {
      Ok(me) => {
        self.session.set_cookie_session(true)?;
        self.session.set_artist(Some(me.clone()))?;
        info!(username = %me.username, "logged in with session cookie");
        self.session.navigate(Route::Profile);
        Ok(LoginOutcome { credential: Credential::SessionCookie, artist: Some(me) })
      }
      Err(e) => {
        warn!("session cookie probe failed: {e}");
        Err(ApiError::MissingCredential)
      }
    }
  }

  pub async fn current_artist(&self) -> Result<Artist, ApiError> {
    self.fetch(Method::Get, "/api/artists/me/", RequestBody::Empty).await
  }

  pub async fn get_artist(&self, id: ArtistId) -> Result<Artist, ApiError> {
    self.fetch(Method::Get, &format!("/api/artists/{id}/"), RequestBody::Empty).await
  }

  /// Sends the non-empty fields of `patch`. The cached session artist is
  /// replaced when it is absent or is the same account.
  pub async fn update_artist(&self, id: ArtistId, patch: &ArtistPatch) -> Result<Artist, ApiError> {
    let mut form = Vec::new();
    push_text(&mut form, "username", patch.username.as_deref());
    push_text(&mut form, "email", patch.email.as_deref());
    push_text(&mut form, "password", patch.password.as_deref());
    push_text(&mut form, "bio", patch.bio.as_deref());
    push_file(&mut form, "profile_picture", patch.profile_picture.as_ref());

    let updated: Artist = self
      .fetch(Method::Patch, &format!("/api/artists/{id}/"), RequestBody::Multipart(form))
      .await?;

    let cached = self.session.artist();
    if cached.is_none_or(|a| a.id == updated.id) {
      self.session.set_artist(Some(updated.clone()))?;
    }
    Ok(updated)
  }

  pub async fn delete_artist(&self, key: &ArtistKey) -> Result<(), ApiError> {
    self.execute(Method::Delete, &format!("/api/artists/{key}/"), RequestBody::Empty).await?;
    info!(artist = %key, "artist deleted");
    Ok(())
  }

  // ---- artworks ----

  pub async fn list_artworks(&self) -> Result<Vec<Artwork>, ApiError> {
    self.fetch(Method::Get, "/api/artworks/", RequestBody::Empty).await
  }

  pub async fn get_artwork(&self, id: ArtworkId) -> Result<Artwork, ApiError> {
    self.fetch(Method::Get, &format!("/api/artworks/{id}/"), RequestBody::Empty).await
  }

  pub async fn create_artwork(&self, artwork: &NewArtwork) -> Result<Artwork, ApiError> {
    self.upload_artwork(artwork, None).await
  }

  /// Same as [`create_artwork`](Self::create_artwork), reporting how much of
  /// the image has been sent.
  pub async fn create_artwork_with_progress(
    &self,
    artwork: &NewArtwork,
    progress: Arc<dyn UploadProgress>,
  ) -> Result<Artwork, ApiError> {
    self.upload_artwork(artwork, Some(progress)).await
  }

  async fn upload_artwork(
    &self,
    artwork: &NewArtwork,
    progress: Option<Arc<dyn UploadProgress>>,
  ) -> Result<Artwork, ApiError> {
    let mut form = vec![
      FormField::text("title", artwork.title.as_str()),
      FormField::file("image", artwork.image.clone()),
    ];
    push_text(&mut form, "description", artwork.description.as_deref());

    let path = "/api/artworks/";
    let response = self.dispatch(Method::Post, path, RequestBody::Multipart(form), progress).await?;
    let created: Artwork = decode(Method::Post, path, &response)?;
    info!(artwork = %created.id, "artwork uploaded");
    Ok(created)
  }

  pub async fn update_artwork(&self, id: ArtworkId, patch: &ArtworkPatch) -> Result<Artwork, ApiError> {
    let mut form = Vec::new();
    push_text(&mut form, "title", patch.title.as_deref());
    push_file(&mut form, "image", patch.image.as_ref());
    push_text(&mut form, "description", patch.description.as_deref());

    self.fetch(Method::Patch, &format!("/api/artworks/{id}/"), RequestBody::Multipart(form)).await
  }

  pub async fn delete_artwork(&self, id: ArtworkId) -> Result<(), ApiError> {
    self.execute(Method::Delete, &format!("/api/artworks/{id}/"), RequestBody::Empty).await?;
    info!(artwork = %id, "artwork deleted");
    Ok(())
  }

  // ---- plumbing ----

  async fn fetch<R>(&self, method: Method, path: &str, body: RequestBody) -> Result<R, ApiError>
  where
    R: DeserializeOwned,
  {
    let response = self.send(method, path, body).await?;
    decode(method, path, &response)
  }

  async fn execute(&self, method: Method, path: &str, body: RequestBody) -> Result<(), ApiError> {
    self.send(method, path, body).await.map(|_| ())
  }

  async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
    self.dispatch(method, path, body, None).await
  }

  async fn dispatch(
    &self,
    method: Method,
    path: &str,
    body: RequestBody,
    progress: Option<Arc<dyn UploadProgress>>,
  ) -> Result<ApiResponse, ApiError> {
    let request = ApiRequest {
      method,
      url: self.base.endpoint(path),
      authorization: self.session.token().as_deref().map(authorization_header),
      body,
      progress,
    };

    debug!(method = method.as_str(), url = %request.url, auth = request.authorization.is_some(), "request");

    let response = match self.transport.send(request).await {
      Ok(response) => response,
      Err(TransportError::Unreachable(detail)) => {
        let err = ApiError::Network { base: self.base.describe().to_string(), detail };
        error!("API network error: {err}");
        return Err(err);
      }
      Err(TransportError::Request(detail)) => {
        warn!("{} {path}: {detail}", method.as_str());
        return Err(ApiError::Transport(detail));
      }
    };

    if response.is_success() {
      return Ok(response);
    }

    let err = ApiError::from_response(response.status, &response.body);
    if response.status == 401 {
      self.session.expire();
    } else {
      warn!(status = response.status, "{} {path}: {err}", method.as_str());
    }
    Err(err)
  }
}

fn decode<R>(method: Method, path: &str, response: &ApiResponse) -> Result<R, ApiError>
where
  R: DeserializeOwned,
{
  response.json().map_err(|e| {
    warn!("{} {path}: could not decode response: {e}", method.as_str());
    ApiError::Decode(e.to_string())
  })
}

fn push_text(form: &mut Vec<FormField>, name: &str, value: Option<&str>) {
  if let Some(value) = value.filter(|v| !v.is_empty()) {
    form.push(FormField::text(name, value));
  }
}

fn push_file(form: &mut Vec<FormField>, name: &str, file: Option<&UploadFile>) {
  if let Some(file) = file.filter(|f| !f.is_empty()) {
    form.push(FormField::file(name, file.clone()));
  }
}
