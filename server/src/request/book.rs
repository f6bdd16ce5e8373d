use application::transfer::{CreateBookDto, DeleteBookDto, GetBookDto, PatchBookDto};
use error_stack::{Report, ResultExt};
use kernel::prelude::entity::{BookField, BookId, BookName, BookPatch, PublishDate};
use kernel::KernelError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use time::PrimitiveDateTime;

use crate::controller::{Intake, TryIntake};

/// Body of `POST /books`. An `id` member is ignored, the store assigns one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    name: Option<BookName>,
    publish_date: Option<PublishDate>,
}

/// Body of `PATCH /books/:id`, field names as they appear in a book.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct PatchBookRequest(Map<String, Value>);

#[derive(Debug)]
pub struct GetBookRequest {
    id: i64,
}

impl GetBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i64,
}

impl DeleteBookRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<()> for BookTransformer {
    type To = ();
    fn emit(&self, input: ()) -> Self::To {
        input
    }
}

impl Intake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateBookRequest) -> Self::To {
        CreateBookDto {
            name: input.name.map(String::from),
            publish_date: input.publish_date.map(PrimitiveDateTime::from),
        }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto {
            id: BookId::new(input.id),
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto {
            id: BookId::new(input.id),
        }
    }
}

impl TryIntake<(i64, PatchBookRequest)> for BookTransformer {
    type To = PatchBookDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: (i64, PatchBookRequest)) -> Result<Self::To, Self::Error> {
        let (id, PatchBookRequest(fields)) = input;
        let patch = fields
            .into_iter()
            .filter_map(|(key, value)| book_field(id, &key, value).transpose())
            .collect::<Result<BookPatch, _>>()?;
        Ok(PatchBookDto {
            id: BookId::new(id),
            patch,
        })
    }
}

/// Maps one member of a patch body onto the field it replaces.
///
/// `id` is accepted only when it names the book being patched, and contributes nothing.
fn book_field(
    id: i64,
    key: &str,
    value: Value,
) -> error_stack::Result<Option<BookField>, KernelError> {
    match key {
        "name" => decode(key, value).map(|name| Some(BookField::Name(name))),
        "publishDate" => decode(key, value).map(|date| Some(BookField::PublishDate(date))),
        "id" => match decode::<Option<i64>>(key, value)? {
            Some(requested) if requested != id => Err(Report::new(KernelError::Invalid)
                .attach_printable(format!(
                    "Field id cannot be changed from {id} to {requested}"
                ))),
            _ => Ok(None),
        },
        unknown => Err(Report::new(KernelError::Invalid)
            .attach_printable(format!("Book has no field named {unknown}"))),
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> error_stack::Result<T, KernelError> {
    serde_json::from_value(value)
        .change_context_lazy(|| KernelError::Invalid)
        .attach_printable_lazy(|| format!("Invalid value for field {key}"))
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{BookField, BookId, BookName, BookPatch, PublishDate};
    use kernel::KernelError;
    use serde_json::json;
    use time::macros::datetime;

    use crate::controller::{Intake, TryIntake};
    use crate::request::{BookTransformer, CreateBookRequest, PatchBookRequest};

    fn patch(id: i64, body: serde_json::Value) -> error_stack::Result<BookPatch, KernelError> {
        let request: PatchBookRequest = serde_json::from_value(body).unwrap();
        TryIntake::emit(&BookTransformer, (id, request)).map(|dto| {
            assert_eq!(dto.id, BookId::new(id));
            dto.patch
        })
    }

    fn reason(report: &error_stack::Report<KernelError>) -> String {
        report.downcast_ref::<String>().cloned().unwrap_or_default()
    }

    #[test]
    fn known_fields_become_typed_assignments() {
        let patch = patch(
            1,
            json!({"name": "philosopher's stone", "publishDate": "1997-06-26 10:30"}),
        )
        .unwrap();
        assert_eq!(patch.fields().len(), 2);
        assert!(patch.fields().contains(&BookField::Name(Some(BookName::new(
            "philosopher's stone"
        )))));
        assert!(patch
            .fields()
            .contains(&BookField::PublishDate(Some(PublishDate::new(datetime!(
                1997-06-26 10:30
            ))))));
    }

    #[test]
    fn null_clears_a_field() {
        let patch = patch(1, json!({"name": null})).unwrap();
        assert_eq!(patch.fields(), &[BookField::Name(None)]);
    }

    #[test]
    fn matching_id_is_ignored() {
        let patch = patch(3, json!({"id": 3, "name": "x"})).unwrap();
        assert_eq!(patch.fields(), &[BookField::Name(Some(BookName::new("x")))]);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = patch(1, json!({"title": "x"})).unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Invalid));
        assert_eq!(reason(&error), "Book has no field named title");
    }

    #[test]
    fn epoch_millis_date_is_accepted() {
        let patch = patch(20, json!({"publishDate": 867321000000_i64})).unwrap();
        assert_eq!(
            patch.fields(),
            &[BookField::PublishDate(Some(PublishDate::new(datetime!(
                1997-06-26 10:30
            ))))]
        );
    }

    #[test]
    fn wrongly_typed_value_is_rejected() {
        let error = patch(1, json!({"publishDate": true})).unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Invalid));
        assert_eq!(reason(&error), "Invalid value for field publishDate");
    }

    #[test]
    fn different_id_is_rejected() {
        let error = patch(1, json!({"id": 2})).unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Invalid));
        assert_eq!(reason(&error), "Field id cannot be changed from 1 to 2");
    }

    #[test]
    fn create_ignores_supplied_id() {
        let request: CreateBookRequest = serde_json::from_value(json!({
            "id": 9,
            "name": "chamber of secrets",
            "publishDate": "1998-07-02 00:00"
        }))
        .unwrap();
        let dto = Intake::emit(&BookTransformer, request);
        assert_eq!(dto.name.as_deref(), Some("chamber of secrets"));
        assert_eq!(dto.publish_date, Some(datetime!(1998-07-02 00:00)));
    }
}
