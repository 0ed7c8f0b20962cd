use diesel::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::color::Color;
use crate::schema::persons;
use crate::validator::Validator;

pub const MAX_FIELD_BYTES: usize = 250;

static ZIP_CODE_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("zip code pattern must compile"));

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = persons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub zipcode: String,
    pub city: String,
    pub color: i32,
}

/// A person that has not been stored yet and therefore has no id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Insertable)]
#[diesel(table_name = persons)]
pub struct NewPerson {
    pub name: String,
    pub lastname: String,
    pub zipcode: String,
    pub city: String,
    pub color: i32,
}

impl NewPerson {
    pub fn into_person(self, id: i64) -> Person {
        Person {
            id,
            name: self.name,
            lastname: self.lastname,
            zipcode: self.zipcode,
            city: self.city,
            color: self.color,
        }
    }
}

/// Runs every person rule against `person`, recording failures in `v`.
///
/// Rules are not short-circuited. The lastname length rule reports under the
/// `name` key; clients already match on that key.
pub fn validate_person(v: &mut Validator, person: &NewPerson) {
    v.check(!person.name.is_empty(), "name", "must be provided");
    v.check(
        person.name.len() <= MAX_FIELD_BYTES,
        "name",
        "must not be more than 250 bytes long",
    );
    v.check(!person.lastname.is_empty(), "lastname", "must be provided");
    v.check(
        person.lastname.len() <= MAX_FIELD_BYTES,
        "name",
        "must not be more than 250 bytes long",
    );
    v.check(!person.zipcode.is_empty(), "zipcode", "must be provided");
    v.check(
        ZIP_CODE_RX.is_match(&person.zipcode),
        "zipcode",
        "invalid zip code",
    );
    v.check(!person.city.is_empty(), "city", "must be provided");
    v.check(
        person.city.len() <= MAX_FIELD_BYTES,
        "city",
        "must not be more than 250 bytes long",
    );
    v.check(
        Color::is_valid_code(i64::from(person.color)),
        "color",
        "id out of range",
    );
}

/// Outbound representation: the colour code is replaced by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonView {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub zipcode: String,
    pub city: String,
    pub color: &'static str,
}

impl From<Person> for PersonView {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            color: Color::name_of(person.color),
            name: person.name,
            lastname: person.lastname,
            zipcode: person.zipcode,
            city: person.city,
        }
    }
}
