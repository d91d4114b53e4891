use std::sync::Arc;

use artshare_core::domain::ApiBase;
use artshare_core::services::SessionStore;
use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};

/// Cookie jar backed by the [`SessionStore`], so a login the backend
/// authenticated with a cookie outlives the process and is dropped by
/// logout. Only cookies of the API host are kept and sent.
pub struct SessionCookieJar {
  session: Arc<SessionStore>,
  host: Option<String>,
}

impl SessionCookieJar {
  pub fn new(session: Arc<SessionStore>, base: &ApiBase) -> Self {
    let host = Url::parse(base.as_str()).ok().and_then(|url| url.host_str().map(str::to_string));
    if host.is_none() {
      warn!(base = base.describe(), "api base has no host, cookies will not be kept");
    }
    Self { session, host }
  }

  fn serves(&self, url: &Url) -> bool {
    match (self.host.as_deref(), url.host_str()) {
      (Some(host), Some(other)) => host.eq_ignore_ascii_case(other),
      _ => false,
    }
  }
}

impl CookieStore for SessionCookieJar {
  fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
    if !self.serves(url) {
      return;
    }

    let updates: Vec<CookieUpdate> =
      cookie_headers.filter_map(|h| h.to_str().ok()).filter_map(parse_set_cookie).collect();
    if updates.is_empty() {
      return;
    }

    debug!(count = updates.len(), "storing backend cookies");
    let result = self.session.update_cookies(|jar| {
      for update in updates {
        match update {
          CookieUpdate::Set(name, value) => {
            jar.insert(name, value);
          }
          CookieUpdate::Remove(name) => {
            jar.remove(&name);
          }
        }
      }
    });
    if let Err(e) = result {
      warn!("backend cookies kept in memory only: {e}");
    }
  }

  fn cookies(&self, url: &Url) -> Option<HeaderValue> {
    if !self.serves(url) {
      return None;
    }

    let cookies = self.session.cookies();
    if cookies.is_empty() {
      return None;
    }

    let header = cookies.iter().map(|(name, value)| format!("{name}={value}")).collect::<Vec<_>>();
    HeaderValue::from_str(&header.join("; ")).ok()
  }
}

#[derive(Debug, PartialEq, Eq)]
enum CookieUpdate {
  Set(String, String),
  Remove(String),
}

/// Reads the `name=value` pair of a `Set-Cookie` header. An empty value or a
/// `Max-Age` of zero or less deletes the cookie. Other attributes are ignored.
fn parse_set_cookie(header: &str) -> Option<CookieUpdate> {
  let mut parts = header.split(';');
  let (name, value) = parts.next()?.split_once('=')?;
  let (name, value) = (name.trim(), value.trim());
  if name.is_empty() {
    return None;
  }

  let expired = parts.filter_map(|attr| attr.split_once('=')).any(|(key, age)| {
    key.trim().eq_ignore_ascii_case("max-age") && age.trim().parse::<i64>().is_ok_and(|age| age <= 0)
  });

  if expired || value.is_empty() || value == "\"\"" {
    Some(CookieUpdate::Remove(name.to_string()))
  } else {
    Some(CookieUpdate::Set(name.to_string(), value.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use artshare_core::ports::{MemorySessionStorage, NoopNavigator};

  fn jar() -> SessionCookieJar {
    let session = SessionStore::restore(Box::new(MemorySessionStorage::new()), Arc::new(NoopNavigator));
    SessionCookieJar::new(Arc::new(session), &ApiBase::new("http://api.test:8000/api"))
  }

  fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
  }

  fn set(jar: &SessionCookieJar, at: &str, headers: &[&str]) {
    let values: Vec<HeaderValue> = headers.iter().map(|h| HeaderValue::from_str(h).unwrap()).collect();
    jar.set_cookies(&mut values.iter(), &url(at));
  }

  #[test]
  fn set_cookie_pairs_and_deletions() {
    assert_eq!(
      parse_set_cookie("sessionid=abc; Path=/; HttpOnly"),
      Some(CookieUpdate::Set("sessionid".into(), "abc".into()))
    );
    assert_eq!(
      parse_set_cookie("sessionid=\"\"; expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/"),
      Some(CookieUpdate::Remove("sessionid".into()))
    );
    assert_eq!(parse_set_cookie("a=b; max-age=-1"), Some(CookieUpdate::Remove("a".into())));
    assert_eq!(parse_set_cookie("=orphan"), None);
    assert_eq!(parse_set_cookie("garbage"), None);
  }

  #[test]
  fn cookies_of_the_api_host_are_stored_and_sent() {
    let jar = jar();
    set(&jar, "http://api.test:8000/api/login/", &["sessionid=s1; Path=/", "csrftoken=c1"]);

    assert_eq!(jar.session.cookies().len(), 2);
    let header = jar.cookies(&url("http://API.test:8000/api/artists/me/")).unwrap();
    assert_eq!(header.to_str().unwrap(), "csrftoken=c1; sessionid=s1");
  }

  #[test]
  fn other_hosts_are_ignored() {
    let jar = jar();
    set(&jar, "http://cdn.test/media/a.png", &["tracker=x"]);

    assert!(jar.session.cookies().is_empty());
    set(&jar, "http://api.test:8000/api/login/", &["sessionid=s1"]);
    assert_eq!(jar.cookies(&url("http://cdn.test/media/a.png")), None);
  }

  #[test]
  fn deletion_and_logout_empty_the_jar() {
    let jar = jar();
    set(&jar, "http://api.test:8000/api/login/", &["sessionid=s1", "csrftoken=c1"]);
    set(&jar, "http://api.test:8000/api/logout/", &["sessionid=; Max-Age=0"]);
    assert_eq!(
      jar.cookies(&url("http://api.test:8000/")).map(|h| h.to_str().unwrap().to_string()),
      Some("csrftoken=c1".to_string())
    );

    jar.session.logout().unwrap();
    assert_eq!(jar.cookies(&url("http://api.test:8000/")), None);
  }
}
