use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};

use crate::error::AppError;

/// Raw bearer token pulled from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthToken, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    Ok(AuthToken {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;

    use super::AuthToken;

    #[actix_web::test]
    async fn extracts_bearer_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        let token = AuthToken::extract(&req).await.unwrap();
        assert_eq!(token.token, "abc.def.ghi");
    }

    #[actix_web::test]
    async fn rejects_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthToken::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn rejects_non_bearer_scheme() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(AuthToken::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn rejects_empty_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(AuthToken::extract(&req).await.is_err());
    }
}
