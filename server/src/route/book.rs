use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRequest, PatchBookRequest,
};
use crate::response::BookPresenter;
use application::service::{
    CreateBookService, DeleteBookService, GetAllBookService, GetBookService, PatchBookService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(|State(module): State<AppModule>| async move {
                Controller::new(BookTransformer, BookPresenter)
                    .intake(())
                    .handle(|()| async move { module.database().get_all_books().await })
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateBookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 Json(req): Json<PatchBookRequest>| async move {
                    let transformed = Controller::new(BookTransformer, BookPresenter)
                        .try_intake((id, req))
                        .map_err(ErrorStatus::from)?;
                    transformed
                        .handle(|dto| async move { module.database().patch_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::handler::AppModule;
    use crate::route::BookRouter;

    async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    fn listed_ids(body: &[u8]) -> Vec<i64> {
        json(body)
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|book| book["id"].as_i64())
            .collect()
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn book_lifecycle() {
        let module = AppModule::new().await.unwrap();
        let router = Router::new().route_book().with_state(module);

        let (status, body) = call(
            &router,
            Method::POST,
            "/books",
            Some(json!({"name": "sorcerer's stone", "publishDate": "1997-06-26 10:30"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created = json(&body);
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "sorcerer's stone");

        let (status, body) = call(&router, Method::GET, &format!("/books/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), created);

        let (status, body) = call(
            &router,
            Method::PATCH,
            &format!("/books/{id}"),
            Some(json!({"name": "philosopher's stone"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let patched = json(&body);
        assert_eq!(patched["id"], id);
        assert_eq!(patched["name"], "philosopher's stone");
        assert_eq!(patched["publishDate"], "1997-06-26 10:30");

        let (status, body) = call(
            &router,
            Method::PATCH,
            &format!("/books/{id}"),
            Some(json!({"title": "philosopher's stone"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"Book has no field named title");

        let (_, body) = call(&router, Method::GET, &format!("/books/{id}"), None).await;
        assert_eq!(json(&body), patched);

        let (_, body) = call(&router, Method::GET, "/books", None).await;
        assert!(listed_ids(&body).contains(&id));

        let (status, body) = call(&router, Method::DELETE, &format!("/books/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let message = String::from_utf8(body).unwrap();
        assert!(message.starts_with(&format!("Book {id} has been deleted - ")));
        assert!(message.ends_with(" remaining"));

        let (_, body) = call(&router, Method::GET, "/books", None).await;
        assert!(!listed_ids(&body).contains(&id));

        let (status, body) = call(&router, Method::GET, &format!("/books/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            format!("There is no book with id {id}")
        );

        let (status, body) = call(&router, Method::DELETE, &format!("/books/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            format!("There is no book with id {id}")
        );
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn patch_of_missing_book_creates_it() {
        let module = AppModule::new().await.unwrap();
        let router = Router::new().route_book().with_state(module);

        let (status, body) = call(
            &router,
            Method::PATCH,
            &format!("/books/{}", i64::MAX),
            Some(json!({"name": "goblet of fire", "publishDate": 963014400000_i64})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let upserted = json(&body);
        assert_eq!(upserted["name"], "goblet of fire");
        assert_eq!(upserted["publishDate"], "2000-07-08 00:00");
        let id = upserted["id"].as_i64().unwrap();

        assert_ne!(id, i64::MAX);

        let (_, body) = call(&router, Method::GET, "/books", None).await;
        assert!(listed_ids(&body).contains(&id));

        call(&router, Method::DELETE, &format!("/books/{id}"), None).await;
    }
}
