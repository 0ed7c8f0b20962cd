use axum::{
    Extension, Router,
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header::LOCATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer};

use crate::errors::AppError;
use crate::logging::SanitizedName;
use crate::models::{Color, NewPerson, PersonView, validate_person};
use crate::response::PrettyJson;
use crate::security::json::ValidatedJson;
use crate::store::SharedStore;
use crate::validator::Validator;

pub fn router() -> Router {
    Router::new()
        .route(
            "/persons",
            get(list_persons)
                .post(create_person)
                .fallback(super::method_not_allowed),
        )
        .route(
            "/persons/*path",
            get(persons_path).fallback(super::method_not_allowed),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct PersonPayload {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    lastname: String,
    #[serde(deserialize_with = "null_as_default")]
    zipcode: String,
    #[serde(deserialize_with = "null_as_default")]
    city: String,
    #[serde(deserialize_with = "null_as_default")]
    color: i64,
}

// A JSON `null` leaves the field at its zero value, like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PersonPayload {
    fn into_new_person(self) -> Result<NewPerson, AppError> {
        let person = NewPerson {
            name: self.name,
            lastname: self.lastname,
            zipcode: self.zipcode,
            city: self.city,
            // Codes beyond i32 map to 0, which fails the colour range rule.
            color: i32::try_from(self.color).unwrap_or_default(),
        };

        let mut v = Validator::new();
        validate_person(&mut v, &person);
        if !v.is_valid() {
            return Err(AppError::FailedValidation(v.into_errors()));
        }

        Ok(person)
    }
}

/// Sub-resources reachable below `/persons/`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PersonsPath<'a> {
    Person(&'a str),
    Color(&'a str),
    Unmatched,
}

impl<'a> PersonsPath<'a> {
    pub(crate) fn parse(rest: &'a str) -> Self {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [""] => PersonsPath::Unmatched,
            [id] => PersonsPath::Person(id),
            ["color", id] => PersonsPath::Color(id),
            _ => PersonsPath::Unmatched,
        }
    }
}

/// Parses a positive base-10 id.
pub(crate) fn read_id_param(param: &str) -> Option<i64> {
    param.parse::<i64>().ok().filter(|id| *id >= 1)
}

const INVALID_ID: &str = "invalid id parameter";

pub async fn create_person(
    Extension(store): Extension<SharedStore>,
    ValidatedJson(payload): ValidatedJson<PersonPayload>,
) -> Result<PrettyJson<PersonView>, AppError> {
    let new_person = payload.into_new_person()?;
    let person = store.insert(new_person).await?;

    tracing::info!(
        person_id = person.id,
        lastname = %SanitizedName::new(&person.lastname),
        "Person created"
    );

    let mut headers = HeaderMap::new();
    let location = HeaderValue::try_from(format!("/persons/{}", person.id))
        .map_err(|err| AppError::Internal(err.to_string()))?;
    headers.insert(LOCATION, location);

    Ok(PrettyJson::new(StatusCode::CREATED, PersonView::from(person)).with_headers(headers))
}

pub async fn list_persons(
    Extension(store): Extension<SharedStore>,
) -> Result<PrettyJson<Vec<PersonView>>, AppError> {
    let persons = store.get_all().await?;
    Ok(PrettyJson::list(
        StatusCode::OK,
        persons.into_iter().map(PersonView::from),
    ))
}

pub async fn persons_path(
    Extension(store): Extension<SharedStore>,
    uri: Uri,
) -> Result<Response, AppError> {
    // Split the raw path: ids are never percent-decoded, so `%FF` is just an
    // invalid id rather than a URL error.
    let rest = uri.path().strip_prefix("/persons").unwrap_or_default();
    match PersonsPath::parse(rest) {
        PersonsPath::Person(param) => Ok(show_person(&store, param).await?.into_response()),
        PersonsPath::Color(param) => Ok(list_persons_by_color(&store, param).await?.into_response()),
        PersonsPath::Unmatched => Err(AppError::NotFound),
    }
}

async fn show_person(store: &SharedStore, param: &str) -> Result<PrettyJson<PersonView>, AppError> {
    let id = read_id_param(param).ok_or_else(|| AppError::field("personID", INVALID_ID))?;
    let person = store.get(id).await?;
    Ok(PrettyJson::ok(PersonView::from(person)))
}

async fn list_persons_by_color(
    store: &SharedStore,
    param: &str,
) -> Result<PrettyJson<Vec<PersonView>>, AppError> {
    let id = read_id_param(param).ok_or_else(|| AppError::field("colorID", INVALID_ID))?;
    let color = Color::from_code(id).ok_or_else(|| AppError::field("colorID", "out of range"))?;

    let persons = store.get_all_by_color(color).await?;
    Ok(PrettyJson::list(
        StatusCode::OK,
        persons.into_iter().map(PersonView::from),
    ))
}
