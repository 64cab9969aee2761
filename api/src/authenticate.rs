use rocket::http::Status;
use rocket::request::{self, FromRequest};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use service::error::GenericError;
use uuid::Uuid;

/// Header set by the authentication layer in front of this service.
pub const USER_HEADER: &str = "X-User-Id";

/// The caller, as identified upstream. Only profile routes need one.
#[derive(OpenApiFromRequest, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileUser(pub Uuid);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ProfileUser {
    type Error = GenericError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(header) = request.headers().get_one(USER_HEADER) else {
            return request::Outcome::Error((
                Status::Unauthorized,
                GenericError::Unauthorized(format!("{USER_HEADER} header missing")),
            ));
        };
        match Uuid::parse_str(header.trim()) {
            Ok(id) => request::Outcome::Success(ProfileUser(id)),
            Err(_) => request::Outcome::Error((
                Status::Unauthorized,
                GenericError::Unauthorized(format!("{USER_HEADER} is not a valid id")),
            )),
        }
    }
}
