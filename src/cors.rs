use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Status},
    Request, Response, Route,
};

use crate::Config;

const ALLOW_HEADERS: &str = "Content-Type,Authorization,true";
const ALLOW_METHODS: &str = "GET,PUT,POST,DELETE,PATCH";

/// A fairing that adds CORS headers to every response, so the quiz frontend
/// can be served from a different origin.
#[derive(Debug, Copy, Clone)]
pub struct CorsFairing;

#[rocket::async_trait]
impl Fairing for CorsFairing {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let origin = req
            .rocket()
            .state::<Config>()
            .map(|config| config.cors_origin().to_string())
            .unwrap_or_else(|| "*".to_string());
        res.set_header(Header::new("Access-Control-Allow-Origin", origin));
        res.set_header(Header::new("Access-Control-Allow-Headers", ALLOW_HEADERS));
        res.set_header(Header::new("Access-Control-Allow-Methods", ALLOW_METHODS));
    }
}

pub fn routes() -> Vec<Route> {
    routes![preflight]
}

/// Answer CORS preflight requests for any path; the headers themselves are
/// added by [`CorsFairing`].
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}
