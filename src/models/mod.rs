pub mod color;
pub mod person;

pub use color::Color;
pub use person::{NewPerson, Person, PersonView, validate_person};
