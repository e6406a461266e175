use std::net::IpAddr;

use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::{json, Json, Value};
use rocket::{Request, State};

use crate::error::SignError;
use crate::models::{PetitionCount, RecentSignature, SignReceipt, SignatureForm};
use crate::petition::Petition;
use crate::rate_limit::Admitted;

#[get("/count")]
pub async fn count(_admitted: Admitted, petition: &State<Petition>) -> Json<PetitionCount> {
    Json(petition.current_count().await)
}

#[get("/recent")]
pub async fn recent(_admitted: Admitted, petition: &State<Petition>) -> Json<Vec<RecentSignature>> {
    Json(petition.recent().await)
}

#[post("/sign", data = "<form>")]
pub async fn sign(
    _admitted: Admitted,
    petition: &State<Petition>,
    client_ip: Option<IpAddr>,
    form: Json<SignatureForm>,
) -> Result<(Status, Json<SignReceipt>), SignError> {
    let receipt = petition.sign(&form, client_ip).await?;
    Ok((Status::Created, Json(receipt)))
}

#[get("/health")]
pub fn health(_admitted: Admitted) -> Value {
    json!({ "status": "ok", "timestamp": Utc::now() })
}

fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

#[catch(400)]
pub fn bad_request() -> Value {
    failure("Malformed request")
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Value {
    failure(&format!("No route for {}", req.uri().path()))
}

#[catch(422)]
pub fn unprocessable() -> Value {
    failure("Request body could not be understood")
}

#[catch(429)]
pub fn too_many_requests() -> Value {
    failure("Too many requests, please try again later.")
}

#[catch(500)]
pub fn internal_error() -> Value {
    failure("Something went wrong. Please try again.")
}
