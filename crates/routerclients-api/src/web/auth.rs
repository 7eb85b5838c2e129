// Web API authentication
//
// `login.cgi` takes base64("user:pass") as a form field and answers with
// an `asus_token` cookie. A wrong password still returns HTTP 200, just
// without the cookie -- that case must not pass as a login.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, REFERER};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::web::client::{AsusWebClient, SESSION_COOKIE, SessionToken};

impl AsusWebClient {
    /// Authenticate and return the session token.
    ///
    /// Logging in evicts any other admin session on the router.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let url = self.page_url("login.cgi")?;
        debug!("logging in at {}", url);

        let authorization = STANDARD.encode(format!("{username}:{}", password.expose_secret()));

        let resp = self
            .http()
            .post(url)
            .header(REFERER, self.page_url("Main_Login.asp")?.as_str())
            .form(&[("login_authorization", authorization.as_str())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let token = resp
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| SessionToken::new(cookie.value()))
            .ok_or(Error::MissingSessionCookie {
                cookie: SESSION_COOKIE,
            })?;

        debug!("login successful");
        Ok(token)
    }

    /// End the session so the router's single admin slot is released.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        let url = self.page_url("Logout.asp")?;
        debug!("logging out at {}", url);

        let resp = self
            .http()
            .get(url)
            .header(COOKIE, token.cookie_header())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Http {
                status: status.as_u16(),
                endpoint: "Logout.asp".into(),
            });
        }

        debug!("logout complete");
        Ok(())
    }
}
