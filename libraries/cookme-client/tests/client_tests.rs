//! Tests for the Cook Me HTTP client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real server connection.

use cookme_client::{ClientConfig, ClientError, CookMeClient, CreateRecipeRequest};
use cookme_core::{Category, ImageAsset, Ingredient, ProfileUpdate, RecipeId, RecipeMethod, UserId};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok123";

async fn authed_client(server: &MockServer) -> CookMeClient {
    CookMeClient::new(ClientConfig::with_token(server.uri(), TOKEN)).unwrap()
}

fn recipe_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "info": "",
        "ingredients": [{"value": "salt", "isSection": false}],
        "methods": [],
        "categories": ["Dinner"]
    })
}

fn temp_image(contents: &[u8]) -> (NamedTempFile, ImageAsset) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    let asset = ImageAsset::new(file.path().to_string_lossy(), "image/jpeg", "photo.jpg");
    (file, asset)
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        match CookMeClient::new(ClientConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match CookMeClient::new(ClientConfig::new("api.cookme.app")) {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[tokio::test]
    async fn test_multiple_trailing_slashes_removed() {
        let client = CookMeClient::new(ClientConfig::new("https://api.cookme.app///")).unwrap();
        assert_eq!(client.url().await, "https://api.cookme.app");
    }

    #[tokio::test]
    async fn test_with_token_is_authenticated() {
        let client =
            CookMeClient::new(ClientConfig::with_token("https://api.cookme.app", "t")).unwrap();
        assert!(client.is_authenticated().await);
    }
}

// =============================================================================
// Authentication Tests
// =============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_login_reads_token_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .and(body_json(json!({"username": "ana", "password": "secret"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("token", "fresh-token")
                    .set_body_json(json!({"status": true, "message": "Welcome"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let token = client.login("ana", "secret").await.unwrap();

        assert_eq!(token, "fresh-token");
        assert_eq!(client.token().await.as_deref(), Some("fresh-token"));
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": false,
                "message": "Unauthorized"
            })))
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();

        match client.login("ana", "wrong").await {
            Err(ClientError::AuthFailed(msg)) => assert_eq!(msg, "Invalid username or password"),
            other => panic!("Expected AuthFailed, got: {:?}", other),
        }
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_status_false_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": false,
                "message": "Account locked"
            })))
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();

        match client.login("ana", "secret").await {
            Err(ClientError::Rejected(msg)) => assert_eq!(msg, "Account locked"),
            other => panic!("Expected Rejected, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_without_token_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        assert!(matches!(
            client.login("ana", "secret").await,
            Err(ClientError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_register_relays_server_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/register"))
            .and(body_json(json!({
                "firstName": "Ana",
                "lastName": "Cruz",
                "username": "ana",
                "password": "secret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": false,
                "message": "Username already exists"
            })))
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let outcome = client.register("ana", "secret", "Ana", "Cruz").await.unwrap();

        assert!(!outcome.status);
        assert_eq!(outcome.message, "Username already exists");
    }

    #[tokio::test]
    async fn test_verify_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/verify"))
            .and(header("authorization_r", "Bearer good"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/user/verify"))
            .and(header("authorization_r", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = CookMeClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        assert!(!client.verify_token().await.unwrap());

        client.set_token("good").await;
        assert!(client.verify_token().await.unwrap());

        client.set_token("stale").await;
        assert!(!client.verify_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_profile() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/profile"))
            .and(header("authorization_r", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "u1",
                "username": "ana",
                "firstName": "Ana",
                "lastName": "Cruz",
                "favorites_id": ["r1", {"_id": "r2", "title": "Stew"}],
                "recipe_id": []
            })))
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let user = client.get_profile().await.unwrap();

        assert_eq!(user.id, UserId::new("u1"));
        assert_eq!(user.full_name(), "Ana Cruz");
        assert!(user.has_favorite(&RecipeId::new("r2")));
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let client = CookMeClient::new(ClientConfig::new("http://localhost:8080")).unwrap();
        assert!(matches!(
            client.get_profile().await,
            Err(ClientError::AuthRequired)
        ));
    }
}

// =============================================================================
// Recipe Tests
// =============================================================================

mod recipes {
    use super::*;

    #[tokio::test]
    async fn test_list_envelopes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/get/all/recent/recipe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "mostRecentRecipe": [recipe_json("r1", "Soup"), recipe_json("r2", "Bread")]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/get/all/best/recipe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "topLikedRecipes": [recipe_json("r3", "Cake")]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/get/all/my/recipe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "recipe_id": [recipe_json("r4", "Tea")]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/get/all/my/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "favorites_id": []
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/recipes/recommendations"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([recipe_json("r5", "Pie")])),
            )
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let handle = client.recipes().await.unwrap();
        let recipes = handle.client();

        let recent = recipes.recent().await.unwrap();
        assert_eq!(
            recent.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            ["Soup", "Bread"]
        );
        assert_eq!(recipes.trending().await.unwrap()[0].title, "Cake");
        assert_eq!(recipes.mine().await.unwrap()[0].title, "Tea");
        assert!(recipes.favorites().await.unwrap().is_empty());
        assert_eq!(recipes.recommended().await.unwrap()[0].title, "Pie");
    }

    #[tokio::test]
    async fn test_search_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/search/recipes"))
            .and(body_json(json!({"searchText": "pie", "categories": ["Dessert", "Brunch"]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([recipe_json("r5", "Pie")])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let results = client
            .recipes()
            .await
            .unwrap()
            .client()
            .search("pie", &[Category::Dessert, Category::Brunch])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_favorite_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/user/add/favorites"))
            .and(body_json(json!({"_id": "r1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/user/remove/favorites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": false,
                "message": "Not a favorite"
            })))
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let handle = client.recipes().await.unwrap();
        let id = RecipeId::new("r1");

        handle.client().add_favorite(&id).await.unwrap();
        match handle.client().remove_favorite(&id).await {
            Err(ClientError::Rejected(msg)) => assert_eq!(msg, "Not a favorite"),
            other => panic!("Expected Rejected, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comment_and_delete() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/user/recipe/comment"))
            .and(body_json(json!({"comment": "Lovely", "recipe_id": "r1", "user_id": "u1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/delete/recipe"))
            .and(body_json(json!({"_id": "r1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let handle = client.recipes().await.unwrap();
        let recipes = handle.client();

        recipes
            .add_comment(&RecipeId::new("r1"), &UserId::new("u1"), "Lovely")
            .await
            .unwrap();
        recipes.delete_recipe(&RecipeId::new("r1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_recipe_returns_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create/recipe"))
            .and(header("authorization_r", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recipe_id": "new1"})))
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let request = CreateRecipeRequest {
            id: String::new(),
            title: "Soup".into(),
            info: "Warm".into(),
            ingredients: vec![Ingredient::item("water"), Ingredient::item("salt")],
            categories: vec![Category::Lunch],
            methods: vec![RecipeMethod {
                value: "Boil".into(),
                number: 1,
                secure_url: None,
                public_id: None,
            }],
        };

        let id = client
            .recipes()
            .await
            .unwrap()
            .client()
            .create_recipe(&request)
            .await
            .unwrap();
        assert_eq!(id, RecipeId::new("new1"));
    }

    #[tokio::test]
    async fn test_server_error_and_bad_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user/get/all/recent/recipe"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/get/all/best/recipe"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user/get/all/my/recipe"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let handle = client.recipes().await.unwrap();
        let recipes = handle.client();

        match recipes.recent().await {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            other => panic!("Expected ServerError, got: {:?}", other),
        }
        assert!(matches!(
            recipes.trending().await,
            Err(ClientError::ParseError(_))
        ));
        assert!(matches!(
            recipes.mine().await,
            Err(ClientError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client =
            CookMeClient::new(ClientConfig::with_token("http://127.0.0.1:9", TOKEN)).unwrap();
        let result = client.recipes().await.unwrap().client().recent().await;

        match result {
            Err(e) => assert!(e.is_transport(), "Expected transport error, got: {:?}", e),
            Ok(_) => panic!("Expected an error"),
        }
    }
}

// =============================================================================
// Upload and Profile Tests
// =============================================================================

mod uploads {
    use super::*;

    #[tokio::test]
    async fn test_step_image_multipart() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/upload/recipe/methods/image"))
            .and(header("authorization_r", "Bearer tok123"))
            .and(body_string_contains("name=\"image\""))
            .and(body_string_contains("filename=\"photo.jpg\""))
            .and(body_string_contains("step-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://img.example.com/step.jpg",
                "public_id": "steps/abc"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (_file, image) = temp_image(b"step-bytes");
        let client = authed_client(&mock_server).await;
        let hosted = client
            .upload()
            .await
            .unwrap()
            .client()
            .upload_step_image(&image)
            .await
            .unwrap();

        assert_eq!(hosted.secure_url, "https://img.example.com/step.jpg");
        assert_eq!(hosted.public_id.as_deref(), Some("steps/abc"));
    }

    #[tokio::test]
    async fn test_cover_upload_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/upload/recipe/image/r42"))
            .and(body_string_contains("cover-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (_file, image) = temp_image(b"cover-bytes");
        let client = authed_client(&mock_server).await;
        client
            .upload()
            .await
            .unwrap()
            .client()
            .upload_cover_image(&RecipeId::new("r42"), &image)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let image = ImageAsset::from_uri("file:///no/such/photo.jpg");
        let result = client
            .upload()
            .await
            .unwrap()
            .client()
            .upload_step_image(&image)
            .await;

        assert!(matches!(result, Err(ClientError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_update_and_avatar() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/user/update"))
            .and(body_json(json!({"_id": "u1", "bio": "Baker"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/user/delete/profile/avatars%2Fana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "not found"})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/user/upload/profile"))
            .and(body_string_contains("avatar-bytes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let handle = client.profile().await.unwrap();
        let profile = handle.client();

        let update = ProfileUpdate {
            id: Some(UserId::new("u1")),
            bio: Some("Baker".into()),
            ..ProfileUpdate::default()
        };
        profile.update(&update).await.unwrap();

        assert!(!profile.delete_avatar("avatars/ana").await.unwrap());

        let (_file, image) = temp_image(b"avatar-bytes");
        profile.upload_avatar(&image).await.unwrap();
    }
}
