//! Sign-up, sign-in and upload forms.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::artist::{Artist, Credentials, RegisterData};
use crate::domain::artwork::{Artwork, NewArtwork};
use crate::domain::route::Route;
use crate::domain::upload::UploadFile;
use crate::errors::{ApiError, FieldErrors};
use crate::ports::{HttpTransport, UploadProgress};
use crate::services::{ApiGateway, LoginOutcome};

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful!";
pub const UPLOAD_REQUIRED_FIELDS: &str = "Title and image are required.";
pub const UPLOAD_SUCCESSFUL: &str = "Upload successful!";

fn blank_to_none(value: &str) -> Option<String> {
  let value = value.trim();
  (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
  /// Username, email and password with confirmation.
  Account,
  /// Optional bio and profile picture.
  Details,
}

/// Two-step registration.
pub struct SignupForm<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  step: SignupStep,
  pub username: String,
  pub email: String,
  pub password: String,
  pub confirm_password: String,
  pub bio: String,
  pub profile_picture: Option<UploadFile>,
  message: Option<String>,
  field_errors: FieldErrors,
}

impl<T> SignupForm<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self {
      gateway,
      step: SignupStep::Account,
      username: String::new(),
      email: String::new(),
      password: String::new(),
      confirm_password: String::new(),
      bio: String::new(),
      profile_picture: None,
      message: None,
      field_errors: FieldErrors::default(),
    }
  }

  pub fn step(&self) -> SignupStep {
    self.step
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn field_errors(&self) -> &FieldErrors {
    &self.field_errors
  }

  /// Leaves the account step once both passwords agree. No request is made.
  pub fn next(&mut self) -> Result<(), ApiError> {
    if self.password != self.confirm_password {
      self.message = Some(PASSWORDS_DO_NOT_MATCH.to_string());
      return Err(ApiError::Validation(PASSWORDS_DO_NOT_MATCH.to_string()));
    }
    self.message = None;
    self.step = SignupStep::Details;
    Ok(())
  }

  pub fn back(&mut self) {
    self.step = SignupStep::Account;
  }

  /// Registers the artist and sends the user to sign-in.
  pub async fn submit(&mut self) -> Result<Artist, ApiError> {
    if self.step == SignupStep::Account {
      self.next()?;
    }

    self.field_errors = FieldErrors::default();
    let data = RegisterData {
      username: self.username.trim().to_string(),
      email: self.email.trim().to_string(),
      password: self.password.clone(),
      bio: blank_to_none(&self.bio),
      profile_picture: self.profile_picture.clone(),
    };

    let result = self.gateway.register(&data).await;
    match result {
      Ok(artist) => {
        self.message = Some(REGISTRATION_SUCCESSFUL.to_string());
        self.gateway.session().navigate(Route::SignIn);
        Ok(artist)
      }
      Err(e) => {
        if let Some(fields) = e.field_errors() {
          self.field_errors = fields.clone();
        }
        self.message = Some(e.to_string());
        Err(e)
      }
    }
  }
}

pub struct SignInForm<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  pub username: String,
  pub password: String,
  message: Option<String>,
}

impl<T> SignInForm<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self { gateway, username: String::new(), password: String::new(), message: None }
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub async fn submit(&mut self) -> Result<LoginOutcome, ApiError> {
    let credentials =
      Credentials { username: self.username.trim().to_string(), password: self.password.clone() };

    self.message = None;
    let result = self.gateway.login(&credentials).await;
    if let Err(e) = &result {
      warn!(username = %credentials.username, "sign-in failed: {e}");
      self.message = Some(e.to_string());
    }
    result
  }
}

pub struct UploadForm<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  pub title: String,
  pub image: Option<UploadFile>,
  pub description: String,
  message: Option<String>,
  progress: Option<Arc<dyn UploadProgress>>,
}

impl<T> UploadForm<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self {
      gateway,
      title: String::new(),
      image: None,
      description: String::new(),
      message: None,
      progress: None,
    }
  }

  /// Reports upload progress of every submit to `progress`.
  pub fn with_progress(mut self, progress: Arc<dyn UploadProgress>) -> Self {
    self.progress = Some(progress);
    self
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  /// Uploads the artwork and clears the form on success.
  pub async fn submit(&mut self) -> Result<Artwork, ApiError> {
    let title = self.title.trim().to_string();
    let image = match self.image.clone() {
      Some(image) if !title.is_empty() && !image.is_empty() => image,
      _ => {
        self.message = Some(UPLOAD_REQUIRED_FIELDS.to_string());
        return Err(ApiError::Validation(UPLOAD_REQUIRED_FIELDS.to_string()));
      }
    };

    self.message = None;
    let artwork = NewArtwork { title, image, description: blank_to_none(&self.description) };
    let result = match &self.progress {
      Some(progress) => self.gateway.create_artwork_with_progress(&artwork, progress.clone()).await,
      None => self.gateway.create_artwork(&artwork).await,
    };
    match result {
      Ok(created) => {
        info!(artwork = %created.id, "upload form submitted");
        self.message = Some(UPLOAD_SUCCESSFUL.to_string());
        self.title.clear();
        self.image = None;
        self.description.clear();
        Ok(created)
      }
      Err(e) => {
        self.message = Some(e.to_string());
        Err(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ApiBase;
  use crate::services::SessionStore;
  use crate::testing::{RecordingNavigator, RecordingProgress, ScriptedTransport, SharedStorage};
  use serde_json::json;

  fn gateway(transport: &ScriptedTransport) -> (Arc<ApiGateway<ScriptedTransport>>, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let session =
      Arc::new(SessionStore::restore(Box::new(SharedStorage::default()), navigator.clone()));
    (Arc::new(ApiGateway::new(transport.clone(), session, ApiBase::new("http://h"))), navigator)
  }

  fn filled_signup(gateway: Arc<ApiGateway<ScriptedTransport>>) -> SignupForm<ScriptedTransport> {
    let mut form = SignupForm::new(gateway);
    form.username = "mika".into();
    form.email = "mika@example.com".into();
    form.password = "pw1".into();
    form.confirm_password = "pw1".into();
    form
  }

  #[tokio::test]
  async fn mismatched_passwords_never_reach_the_backend() {
    let transport = ScriptedTransport::default();
    let (gateway, _) = gateway(&transport);
    let mut form = filled_signup(gateway);
    form.confirm_password = "pw2".into();

    assert!(form.next().is_err());
    assert_eq!(form.message(), Some(PASSWORDS_DO_NOT_MATCH));
    assert_eq!(form.step(), SignupStep::Account);

    assert!(matches!(form.submit().await, Err(ApiError::Validation(_))));
    assert!(transport.sent().is_empty());
  }

  #[tokio::test]
  async fn successful_signup_goes_to_sign_in() {
    let transport = ScriptedTransport::default();
    transport.respond(201, json!({ "id": 1, "username": "mika", "email": "mika@example.com" }));
    let (gateway, navigator) = gateway(&transport);
    let mut form = filled_signup(gateway);

    form.next().unwrap();
    assert_eq!(form.step(), SignupStep::Details);
    let artist = form.submit().await.unwrap();

    assert_eq!(artist.username, "mika");
    assert_eq!(form.message(), Some(REGISTRATION_SUCCESSFUL));
    assert_eq!(navigator.routes(), vec![Route::SignIn]);
  }

  #[tokio::test]
  async fn signup_field_errors_are_exposed() {
    let transport = ScriptedTransport::default();
    transport.respond(
      400,
      json!({ "email": ["Enter a valid email address."], "username": ["Already taken."] }),
    );
    let (gateway, navigator) = gateway(&transport);
    let mut form = filled_signup(gateway);

    assert!(form.submit().await.is_err());

    assert_eq!(form.field_errors().get("username"), Some(&["Already taken.".to_string()][..]));
    assert_eq!(form.message(), Some("Enter a valid email address."));
    assert!(navigator.routes().is_empty());
  }

  #[tokio::test]
  async fn sign_in_failure_sets_message() {
    let transport = ScriptedTransport::default();
    transport.respond(400, json!({ "detail": "Invalid credentials" }));
    let (gateway, _) = gateway(&transport);
    let mut form = SignInForm::new(gateway);
    form.username = "mika".into();
    form.password = "bad".into();

    assert!(form.submit().await.is_err());
    assert_eq!(form.message(), Some("Invalid credentials"));
  }

  #[tokio::test]
  async fn upload_requires_title_and_image() {
    let transport = ScriptedTransport::default();
    let (gateway, _) = gateway(&transport);
    let mut form = UploadForm::new(gateway);
    form.title = "Dawn".into();

    assert!(form.submit().await.is_err());
    assert_eq!(form.message(), Some(UPLOAD_REQUIRED_FIELDS));
    assert!(transport.sent().is_empty());
  }

  #[tokio::test]
  async fn upload_success_resets_form() {
    let transport = ScriptedTransport::default();
    transport.respond(201, json!({ "id": 3, "title": "Dawn", "image": "/m/d.png" }));
    let (gateway, _) = gateway(&transport);
    let mut form = UploadForm::new(gateway);
    form.title = "Dawn".into();
    form.image = Some(UploadFile::new("d.png", vec![0; 4]));

    form.submit().await.unwrap();

    assert_eq!(form.message(), Some(UPLOAD_SUCCESSFUL));
    assert!(form.title.is_empty());
    assert!(form.image.is_none());
    assert!(transport.sent()[0].progress.is_none());
  }

  #[tokio::test]
  async fn upload_forwards_the_progress_reporter() {
    let transport = ScriptedTransport::default();
    transport.respond(201, json!({ "id": 4, "title": "Noon", "image": "/m/n.png" }));
    let (gateway, _) = gateway(&transport);
    let progress = Arc::new(RecordingProgress::default());
    let mut form = UploadForm::new(gateway).with_progress(progress.clone());
    form.title = "Noon".into();
    form.image = Some(UploadFile::new("n.png", vec![1; 8]));

    form.submit().await.unwrap();

    assert!(transport.sent()[0].progress.is_some());
    // The scripted transport never streams a body, so nothing is reported.
    assert!(progress.events().is_empty());
  }
}
