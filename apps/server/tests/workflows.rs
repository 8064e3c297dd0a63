mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use common::TestApp;

async fn first_filter_id(app: &TestApp, token: &str, category: &str) -> String {
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/ad-filters?category={category}"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body[0]["id"].as_str().unwrap().to_string()
}

async fn create_text_node(app: &TestApp, token: &str, canvas_id: &str, text: &str) -> String {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/canvas-nodes",
            Some(token),
            Some(json!({
                "canvasId": canvas_id,
                "payload": { "type": "text", "content": text },
                "position": { "x": 10.0, "y": 20.0 },
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn example_ads_are_listed_for_the_subscriber() {
    let app = TestApp::spawn().await;
    let token = app.token("user-1", None);

    let (status, subscription) = app
        .send(
            Method::POST,
            "/api/v1/subscriptions",
            Some(&token),
            Some(json!({ "platform": "facebook", "searchTerm": "meal kits" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{subscription}");
    let subscription_id = subscription["id"].as_str().unwrap();

    let (status, examples) = app
        .send(
            Method::POST,
            &format!("/api/v1/subscriptions/{subscription_id}/ads/examples"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{examples}");
    assert_eq!(examples.as_array().unwrap().len(), 3);

    let (status, ads) = app.send(Method::GET, "/api/v1/ads", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ads.as_array().unwrap().len(), 3);

    // Another user cannot see or seed them.
    let other = app.token("user-2", None);
    let (_, ads) = app.send(Method::GET, "/api/v1/ads", Some(&other), None).await;
    assert!(ads.as_array().unwrap().is_empty());
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/subscriptions/{subscription_id}/ads/examples"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn created_ad_documents_are_materialized_in_the_background() {
    let app = TestApp::spawn().await;
    let org_id = app.create_organization("user-1", "Acme").await;
    let token = app.token("user-1", Some(&org_id));

    let concept_id = first_filter_id(&app, &token, "concept").await;
    let angle_id = first_filter_id(&app, &token, "angle").await;
    let style_id = first_filter_id(&app, &token, "style").await;
    let hook_id = first_filter_id(&app, &token, "hook").await;

    let (status, created) = app
        .send(
            Method::POST,
            "/api/v1/created-ads",
            Some(&token),
            Some(json!({
                "conceptId": concept_id,
                "angleId": angle_id,
                "styleId": style_id,
                "hookId": hook_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let created_id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/created-ads/{created_id}/documents");

    let mut documents = Value::Null;
    for _ in 0..40 {
        let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        if body.as_array().map(|docs| docs.len()) == Some(4) {
            documents = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let documents = documents.as_array().expect("documents were never created");
    assert!(documents.iter().all(|doc| doc["createdAdId"] == created_id.as_str()));
    assert!(documents.iter().all(|doc| doc["version"] == 1));

    let copy_uri = format!("/api/v1/created-ads/{created_id}/documents/ad_copy");
    let (status, saved) = app
        .send(
            Method::PUT,
            &copy_uri,
            Some(&token),
            Some(json!({ "content": "Fresh dinners, zero planning." })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["version"], 1);

    let (status, saved) = app
        .send(
            Method::PUT,
            &copy_uri,
            Some(&token),
            Some(json!({ "content": "Dinner, solved.", "source": "assistant" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["version"], 2);
    assert_eq!(saved["content"], "Dinner, solved.");
}

#[tokio::test]
async fn canvases_are_isolated_between_organizations() {
    let app = TestApp::spawn().await;
    let org_a = app.create_organization("alice", "Acme").await;
    let org_b = app.create_organization("bob", "Beta").await;
    let alice = app.token("alice", Some(&org_a));
    let bob = app.token("bob", Some(&org_b));

    let (status, canvas) = app
        .send(
            Method::POST,
            "/api/v1/canvases",
            Some(&alice),
            Some(json!({ "name": "Research" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{canvas}");
    let canvas_id = canvas["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/canvases/{canvas_id}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    let (_, listed) = app.send(Method::GET, "/api/v1/canvases", Some(&bob), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = app
        .send(
            Method::GET,
            "/api/v1/canvases/does-not-exist",
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_edges_conflict_and_graph_reflects_edits() {
    let app = TestApp::spawn().await;
    let org_id = app.create_organization("alice", "Acme").await;
    let token = app.token("alice", Some(&org_id));

    let (_, canvas) = app
        .send(
            Method::POST,
            "/api/v1/canvases",
            Some(&token),
            Some(json!({ "name": "Flow" })),
        )
        .await;
    let canvas_id = canvas["id"].as_str().unwrap().to_string();
    let source = create_text_node(&app, &token, &canvas_id, "hook").await;
    let target = create_text_node(&app, &token, &canvas_id, "angle").await;

    let edge = json!({
        "canvasId": canvas_id,
        "sourceNodeId": source,
        "targetNodeId": target,
    });
    let (status, _) = app
        .send(Method::POST, "/api/v1/canvas-edges", Some(&token), Some(edge.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .send(Method::POST, "/api/v1/canvas-edges", Some(&token), Some(edge))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, moved) = app
        .send(
            Method::PUT,
            &format!("/api/v1/canvases/{canvas_id}/positions"),
            Some(&token),
            Some(json!([{ "nodeId": source, "position": { "x": 300.0, "y": 40.0 } }])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["updated"], 1);

    let (status, graph) = app
        .send(
            Method::GET,
            &format!("/api/v1/canvases/{canvas_id}/graph"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{graph}");
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(graph["edges"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/canvas-nodes/{source}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, edges) = app
        .send(
            Method::GET,
            &format!("/api/v1/canvases/{canvas_id}/edges"),
            Some(&token),
            None,
        )
        .await;
    assert!(edges.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn created_ad_documents_arrive_while_another_tenant_drags_nodes() {
    let app = TestApp::spawn().await;
    let org_a = app.create_organization("alice", "Acme").await;
    let org_b = app.create_organization("bob", "Beta").await;
    let alice = app.token("alice", Some(&org_a));
    let bob = app.token("bob", Some(&org_b));

    let (_, canvas) = app
        .send(
            Method::POST,
            "/api/v1/canvases",
            Some(&bob),
            Some(json!({ "name": "Storyboard" })),
        )
        .await;
    let canvas_id = canvas["id"].as_str().unwrap().to_string();
    let node_id = create_text_node(&app, &bob, &canvas_id, "drag me").await;
    let positions_uri = format!("/api/v1/canvases/{canvas_id}/positions");

    let selection = json!({
        "conceptId": first_filter_id(&app, &alice, "concept").await,
        "angleId": first_filter_id(&app, &alice, "angle").await,
        "styleId": first_filter_id(&app, &alice, "style").await,
        "hookId": first_filter_id(&app, &alice, "hook").await,
    });
    let (status, created) = app
        .send(Method::POST, "/api/v1/created-ads", Some(&alice), Some(selection))
        .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    let documents_uri = format!(
        "/api/v1/created-ads/{}/documents",
        created["id"].as_str().unwrap()
    );

    // Bob keeps moving a node every 100ms for the whole wait.
    let mut ready = false;
    for step in 0..40 {
        let (status, _) = app
            .send(
                Method::PUT,
                &positions_uri,
                Some(&bob),
                Some(json!([{ "nodeId": node_id, "position": { "x": step as f64, "y": 0.0 } }])),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, documents) = app.send(Method::GET, &documents_uri, Some(&alice), None).await;
        if documents.as_array().map(|docs| docs.len()) == Some(4) {
            ready = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(ready, "documents were held back by canvas traffic");
}

#[tokio::test]
async fn filter_reseed_is_limited_to_filter_admins() {
    let app = TestApp::spawn_with_filter_admins(&["ops"]).await;
    let org_id = app.create_organization("alice", "Acme").await;
    let alice = app.token("alice", Some(&org_id));
    let hook_before = first_filter_id(&app, &alice, "hook").await;

    let (status, body) = app
        .send(Method::POST, "/api/v1/ad-filters/seed/hook", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    assert_eq!(first_filter_id(&app, &alice, "hook").await, hook_before);

    let ops = app.token("ops", None);
    let (status, body) = app
        .send(Method::POST, "/api/v1/ad-filters/seed/hook", Some(&ops), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["inserted"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn filter_reseed_is_closed_without_configured_admins() {
    let app = TestApp::spawn().await;
    let token = app.token("user-1", None);

    let (status, _) = app
        .send(Method::POST, "/api/v1/ad-filters/seed/concept", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
