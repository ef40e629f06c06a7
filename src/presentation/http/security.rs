use poem::{Error as PoemError, Request, Result as PoemResult, http::StatusCode};
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

/// Static key guarding the dispatch endpoints. With no key configured every
/// request is allowed.
#[derive(Clone, Default)]
pub struct ApiKey(Option<String>);

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|key| !key.is_empty()))
    }

    pub fn is_open(&self) -> bool {
        self.0.is_none()
    }

    fn accepts(&self, presented: &str) -> bool {
        match self.0.as_deref() {
            Some(expected) => expected == presented,
            None => true,
        }
    }
}

#[derive(SecurityScheme)]
#[oai(ty = "bearer", checker = "check_api_key")]
pub struct ApiKeyAuth(Bearer);

async fn check_api_key(req: &Request, bearer: Bearer) -> Option<Bearer> {
    let key = req.data::<ApiKey>()?;
    key.accepts(&bearer.token).then_some(bearer)
}

/// A request either carries the configured key or no usable credentials.
#[derive(SecurityScheme)]
pub enum ApiAccess {
    Key(ApiKeyAuth),
    #[oai(fallback)]
    Anonymous,
}

impl ApiAccess {
    pub fn authorize(&self, key: &ApiKey) -> PoemResult<()> {
        match self {
            ApiAccess::Key(_) => Ok(()),
            ApiAccess::Anonymous if key.is_open() => Ok(()),
            ApiAccess::Anonymous => Err(PoemError::from_string(
                "missing or invalid api token",
                StatusCode::UNAUTHORIZED,
            )),
        }
    }
}
