#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    use crate::api;
    use crate::data::import::{ColumnLayout, Importer};
    use crate::data::models::{NewPostcode, Postcode};
    use crate::data::repo::{MemoryStore, PostcodeStore, StoreError};
    use crate::query::QueryEngine;

    const COMPACT: ColumnLayout = ColumnLayout { postcode: 0, latitude: 1, longitude: 2 };

    struct DownStore;

    impl PostcodeStore for DownStore {
        fn insert(&self, _record: &NewPostcode<'_>) -> Result<i32, StoreError> {
            Err(StoreError::Unavailable(Box::new("connection refused")))
        }

        fn find_by_prefix(&self, _prefix: &str, _limit: usize) -> Result<Vec<Postcode>, StoreError> {
            Err(StoreError::Unavailable(Box::new("connection refused")))
        }

        fn scan(&self, _visit: &mut dyn FnMut(Postcode)) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(Box::new("connection refused")))
        }

        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn create_test_set() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        let data = "AB1 2CD,51.5,-0.1\n\
                    XY9 9ZZ,bad,-0.2\n\
                    AB1 2EF,52.0,-0.2\n\
                    AB1 2CE,51.505,-0.1\n";
        Importer::new(&store)
            .with_layout(COMPACT)
            .import(data.as_bytes())
            .expect("Error creating tests data");
        Arc::new(store)
    }

    macro_rules! init_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(QueryEngine::new($store)))
                    .configure(api::configure)
            )
            .await
        };
    }

    fn ids(body: &Value) -> Vec<&str> {
        body["data"]
            .as_array()
            .expect("data should be an array")
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect()
    }

    #[actix_rt::test]
    async fn test_search_by_partial() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcodes/search/ignored?partial=AB1")
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["AB1 2CD", "AB1 2CE", "AB1 2EF"]);
        assert_eq!(
            body["data"][0],
            json!({ "type": "postcode", "id": "AB1 2CD", "attributes": { "latitude": 51.5, "longitude": -0.1 } })
        );
    }

    #[actix_rt::test]
    async fn test_search_falls_back_to_path() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcodes/search/AB1%202E")
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["AB1 2EF"]);
    }

    #[actix_rt::test]
    async fn test_search_limit() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcodes/search/AB1?partial=AB1&limit=1")
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["AB1 2CD"]);
    }

    #[actix_rt::test]
    async fn test_search_no_results() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcodes/search/ZZ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "data": [] }));
    }

    #[actix_rt::test]
    async fn test_search_invalid_limit() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcodes/search/AB1?limit=many")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["status"], "400");
    }

    #[actix_rt::test]
    async fn test_nearby_defaults() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcode/nearby/51.5/-0.1")
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        // AB1 2CE is about a third of a mile north, AB1 2EF about 35 miles
        assert_eq!(ids(&body), vec!["AB1 2CD", "AB1 2CE"]);
    }

    #[actix_rt::test]
    async fn test_nearby_distance_and_limit() {
        let app = init_app!(create_test_set());

        let req = test::TestRequest::get()
            .uri("/postcode/nearby/51.5/-0.1?distance=50&limit=10")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["AB1 2CD", "AB1 2CE", "AB1 2EF"]);

        let req = test::TestRequest::get()
            .uri("/postcode/nearby/52.0/-0.2?distance=50&limit=1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&body), vec!["AB1 2EF"]);
    }

    #[actix_rt::test]
    async fn test_nearby_invalid_coordinates() {
        let app = init_app!(create_test_set());

        for uri in &[
            "/postcode/nearby/north/-0.1",
            "/postcode/nearby/51.5/west",
            "/postcode/nearby/51.5/-0.1?distance=far",
            "/postcode/nearby/51.5/-0.1?limit=-3",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_rt::test]
    async fn test_store_unavailable() {
        let app = init_app!(Arc::new(DownStore));

        let req = test::TestRequest::get()
            .uri("/postcodes/search/AB1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::get()
            .uri("/postcode/nearby/51.5/-0.1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
