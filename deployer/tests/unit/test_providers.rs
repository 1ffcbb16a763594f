//! Provider adapter tests against mocked provider APIs

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deployer::errors::DeployerError;
use deployer::models::deployment::DeploymentStatus;
use deployer::providers::{ProviderFactory, ProviderKind};

use crate::support::{
    adapter, api_key, assert_result_invariants, options, static_spec, web_spec, REPO_URL,
};

// Render

#[tokio::test]
async fn test_render_deploy_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(json!({
            "name": "my-api",
            "type": "web",
            "env": "node",
            "repo": REPO_URL,
            "branch": "main",
            "autoDeploy": true,
            "buildCommand": "npm install",
            "startCommand": "npm start"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "service": {
                "id": "srv-123",
                "serviceDetails": {"url": "https://my-api.onrender.com"}
            },
            "deployId": "dep-456"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Render, &server.uri());
    let result = provider.deploy(&web_spec(), REPO_URL).await;

    assert_eq!(result.status, DeploymentStatus::Success);
    assert_eq!(result.provider, "render");
    assert_eq!(result.service_id, "srv-123");
    assert_eq!(result.deployment_id, "dep-456");
    assert_eq!(result.url, "https://my-api.onrender.com");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_render_deploy_falls_back_to_onrender_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "service": {"id": "srv-123"}
        })))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Render, &server.uri())
        .deploy(&web_spec(), REPO_URL)
        .await;

    assert!(result.is_success());
    assert_eq!(result.url, "https://my-api.onrender.com");
    assert_eq!(result.deployment_id, "");
}

#[tokio::test]
async fn test_render_deploy_rejected_skips_secondary_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid repo"))
        .expect(1)
        .mount(&server)
        .await;

    let spec = web_spec()
        .with_env_var("A", "1")
        .with_custom_domain("api.example.com");
    let result = adapter(ProviderKind::Render, &server.uri())
        .deploy(&spec, REPO_URL)
        .await;

    assert_eq!(result.status, DeploymentStatus::Failed);
    let error = result.error.clone().unwrap();
    assert!(error.contains("422"), "{error}");
    assert!(error.contains("invalid repo"), "{error}");
    assert_result_invariants(&result);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_render_deploy_sets_env_vars_and_domains() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "service": {"id": "srv-1", "serviceDetails": {"url": "https://my-api.onrender.com"}},
            "deployId": "dep-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/srv-1/env-vars"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;
    // a rejected domain must not fail the deployment
    Mock::given(method("POST"))
        .and(path("/services/srv-1/custom-domains"))
        .respond_with(ResponseTemplate::new(409).set_body_string("domain taken"))
        .expect(1)
        .mount(&server)
        .await;

    let spec = web_spec()
        .with_env_var("NODE_ENV", "production")
        .with_env_var("PORT", "8080")
        .with_custom_domain("api.example.com");
    let result = adapter(ProviderKind::Render, &server.uri())
        .deploy(&spec, REPO_URL)
        .await;

    assert!(result.is_success());
    assert_result_invariants(&result);
}

#[tokio::test]
async fn test_render_status_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/srv-1/deploys/dep-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "dep-live", "status": "live"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/srv-1/deploys/dep-odd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "dep-odd", "status": "hibernating"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/srv-1/deploys/dep-down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Render, &server.uri());
    assert_eq!(provider.get_status("srv-1", "dep-live").await, DeploymentStatus::Success);
    assert_eq!(provider.get_status("srv-1", "dep-odd").await, DeploymentStatus::Failed);
    assert_eq!(provider.get_status("srv-1", "dep-down").await, DeploymentStatus::Failed);
}

#[tokio::test]
async fn test_render_list_deployments_swallows_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/srv-1/deploys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "a"}, {"id": "b"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/srv-2/deploys"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Render, &server.uri());
    assert_eq!(provider.list_deployments("srv-1").await.len(), 2);
    assert!(provider.list_deployments("srv-2").await.is_empty());
}

#[tokio::test]
async fn test_render_add_custom_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/srv-1/custom-domains"))
        .and(body_partial_json(json!({"name": "api.example.com"})))
        .respond_with(ResponseTemplate::new(409).set_body_string("already exists"))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Render, &server.uri())
        .add_custom_domain("srv-1", "api.example.com")
        .await;

    match result {
        Err(DeployerError::Api { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "already exists");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_render_deploy_reads_latest_deploy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "service": {"id": "srv-1", "serviceDetails": {"url": "https://my-api.onrender.com"}},
            "latestDeploy": {"id": "dep-9"}
        })))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Render, &server.uri())
        .deploy(&web_spec(), REPO_URL)
        .await;

    assert!(result.is_success());
    assert_eq!(result.service_id, "srv-1");
    assert_eq!(result.deployment_id, "dep-9");
}

#[tokio::test]
async fn test_render_create_failure_names_the_step() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Render, &server.uri())
        .deploy(&web_spec(), REPO_URL)
        .await;

    let error = result.error.unwrap();
    assert!(error.starts_with("Failed to create Render service: "), "{error}");
    assert!(error.contains("401 - unauthorized"), "{error}");
}

// Vercel

#[tokio::test]
async fn test_vercel_deploy_two_steps() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects"))
        .and(body_partial_json(json!({
            "name": "my-site",
            "gitRepository": {"type": "github", "repo": "u/my-api"},
            "framework": "other",
            "outputDirectory": "dist"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "prj_1", "name": "my-site"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/prj_1/env"))
        .and(body_partial_json(json!({"key": "API_URL", "type": "encrypted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/prj_1/deployments"))
        .and(body_partial_json(json!({"target": "production"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "dpl_1",
            "url": "my-site.vercel.app",
            "readyState": "QUEUED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = static_spec().with_env_var("API_URL", "https://api.example.com");
    let result = adapter(ProviderKind::Vercel, &server.uri())
        .deploy(&spec, REPO_URL)
        .await;

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.service_id, "prj_1");
    assert_eq!(result.deployment_id, "dpl_1");
    assert_eq!(result.url, "https://my-site.vercel.app");
}

#[tokio::test]
async fn test_vercel_trigger_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "prj_1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects/prj_1/deployments"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad target"))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Vercel, &server.uri())
        .deploy(&static_spec(), REPO_URL)
        .await;

    assert_eq!(result.status, DeploymentStatus::Failed);
    let error = result.error.clone().unwrap();
    assert!(error.contains("Failed to trigger Vercel deployment"), "{error}");
    assert!(error.contains("bad target"), "{error}");
    assert_result_invariants(&result);
}

#[tokio::test]
async fn test_vercel_status_reads_ready_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deployments/dpl_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "dpl_1", "readyState": "READY"})))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Vercel, &server.uri());
    assert_eq!(provider.get_status("prj_1", "dpl_1").await, DeploymentStatus::Success);
}

// Netlify

#[tokio::test]
async fn test_netlify_deploy_merges_env_vars() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sites"))
        .and(body_partial_json(json!({
            "name": "my-site",
            "repo": {"provider": "github", "repo": "u/my-api", "cmd": "npm run build", "dir": "dist"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "site-1",
            "url": "http://my-site.netlify.app",
            "ssl_url": "https://my-site.netlify.app"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/sites/site-1"))
        .and(body_partial_json(json!({"build_settings": {"env": {"A": "1"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "site-1"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sites/site-1/deploys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "deploy-1", "state": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = static_spec().with_env_var("A", "1").with_env_var("B", "2");
    let result = adapter(ProviderKind::Netlify, &server.uri())
        .deploy(&spec, REPO_URL)
        .await;

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.service_id, "site-1");
    assert_eq!(result.deployment_id, "deploy-1");
    assert_eq!(result.url, "https://my-site.netlify.app");
}

#[tokio::test]
async fn test_netlify_invalid_repo_url_makes_no_requests() {
    let server = MockServer::start().await;

    let result = adapter(ProviderKind::Netlify, &server.uri())
        .deploy(&static_spec(), "not a repository")
        .await;

    assert_eq!(result.status, DeploymentStatus::Failed);
    assert_result_invariants(&result);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_netlify_test_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "user-1"})))
        .mount(&server)
        .await;

    assert!(adapter(ProviderKind::Netlify, &server.uri()).test_connection().await);

    let rejecting = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&rejecting)
        .await;

    assert!(!adapter(ProviderKind::Netlify, &rejecting.uri()).test_connection().await);
}

#[tokio::test]
async fn test_vercel_add_custom_domain_with_team() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/prj_1/domains"))
        .and(body_partial_json(json!({"name": "www.example.com", "teamId": "team_1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "www.example.com",
            "verified": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ProviderFactory::create(
        ProviderKind::Vercel,
        api_key(),
        &options(&server.uri()).with_team_id("team_1"),
    )
    .unwrap();
    let domain = provider
        .add_custom_domain("prj_1", "www.example.com")
        .await
        .unwrap();

    assert_eq!(domain["name"], "www.example.com");
}

#[tokio::test]
async fn test_vercel_list_deployments_unwraps_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/prj_1/deployments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployments": [{"uid": "dpl_1"}, {"uid": "dpl_2"}],
            "pagination": {"count": 2}
        })))
        .mount(&server)
        .await;

    let deployments = adapter(ProviderKind::Vercel, &server.uri())
        .list_deployments("prj_1")
        .await;

    assert_eq!(deployments.len(), 2);
    assert_eq!(deployments[0]["uid"], "dpl_1");
}

#[tokio::test]
async fn test_netlify_add_custom_domain() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/custom_domains"))
        .and(body_partial_json(json!({"domain": "docs.example.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"domain": "docs.example.com"})))
        .expect(1)
        .mount(&server)
        .await;

    let domain = adapter(ProviderKind::Netlify, &server.uri())
        .add_custom_domain("site-1", "docs.example.com")
        .await
        .unwrap();

    assert_eq!(domain["domain"], "docs.example.com");
}

#[tokio::test]
async fn test_netlify_status_reads_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/deploys/deploy-ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "deploy-ready", "state": "ready"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sites/site-1/deploys/deploy-busy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "deploy-busy", "state": "building"})))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Netlify, &server.uri());
    assert_eq!(provider.get_status("site-1", "deploy-ready").await, DeploymentStatus::Success);
    assert_eq!(provider.get_status("site-1", "deploy-busy").await, DeploymentStatus::Building);
    assert_eq!(provider.get_status("site-1", "missing").await, DeploymentStatus::Failed);
}

// Railway

#[tokio::test]
async fn test_railway_deploy_single_mutation() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("projectCreate"))
        .and(body_partial_json(json!({
            "variables": {"name": "my-api", "repoUrl": REPO_URL, "branch": "main"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "projectCreate": {
                    "project": {
                        "id": "proj-1",
                        "name": "my-api",
                        "deployments": [
                            {"id": "dep-1", "status": "BUILDING", "staticUrl": "my-api.up.railway.app"}
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Railway, &endpoint)
        .deploy(&web_spec(), REPO_URL)
        .await;

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.service_id, "proj-1");
    assert_eq!(result.deployment_id, "dep-1");
    assert_eq!(result.url, "https://my-api.up.railway.app");
}

#[tokio::test]
async fn test_railway_graphql_errors_fail_the_deploy() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Not Authorized"}]
        })))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Railway, &endpoint)
        .deploy(&web_spec(), REPO_URL)
        .await;

    assert_eq!(result.status, DeploymentStatus::Failed);
    let error = result.error.clone().unwrap();
    assert!(error.contains("Not Authorized"), "{error}");
    assert_result_invariants(&result);
}

#[tokio::test]
async fn test_railway_status() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"id": "dep-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deployment": {"status": "SUCCESS"}}
        })))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Railway, &endpoint);
    assert_eq!(provider.get_status("proj-1", "dep-1").await, DeploymentStatus::Success);
}

#[tokio::test]
async fn test_railway_deploy_sets_variables_and_falls_back_to_dashboard() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("projectCreate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"projectCreate": {"project": {"id": "proj-1", "deployments": []}}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("variableUpsert"))
        .and(body_partial_json(json!({"variables": {"projectId": "proj-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"variableUpsert": true}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let spec = web_spec().with_env_var("A", "1").with_env_var("B", "2");
    let result = adapter(ProviderKind::Railway, &endpoint)
        .deploy(&spec, REPO_URL)
        .await;

    assert!(result.is_success(), "{result:?}");
    assert_eq!(result.deployment_id, "");
    assert_eq!(result.url, "https://railway.app/project/proj-1");
}

#[tokio::test]
async fn test_railway_deploy_uses_deployment_url_without_static_url() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "projectCreate": {
                    "project": {
                        "id": "proj-1",
                        "deployments": [{"id": "dep-1", "url": "my-api-production.up.railway.app"}]
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let result = adapter(ProviderKind::Railway, &endpoint)
        .deploy(&web_spec(), REPO_URL)
        .await;

    assert_eq!(result.url, "https://my-api-production.up.railway.app");
    assert_eq!(result.deployment_id, "dep-1");
}

#[tokio::test]
async fn test_railway_add_custom_domain() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("domainCreate"))
        .and(body_partial_json(json!({
            "variables": {"projectId": "proj-1", "domain": "api.example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"domainCreate": {"domain": {"id": "dom-1", "domain": "api.example.com"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let domain = adapter(ProviderKind::Railway, &endpoint)
        .add_custom_domain("proj-1", "api.example.com")
        .await
        .unwrap();

    assert_eq!(domain["id"], "dom-1");
    assert_eq!(domain["domain"], "api.example.com");
}

#[tokio::test]
async fn test_railway_list_deployments() {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"id": "proj-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "project": {
                    "deployments": [
                        {"id": "dep-1", "status": "SUCCESS"},
                        {"id": "dep-2", "status": "BUILDING"}
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let provider = adapter(ProviderKind::Railway, &endpoint);
    let deployments = provider.list_deployments("proj-1").await;

    assert_eq!(deployments.len(), 2);
    assert_eq!(deployments[1]["status"], "BUILDING");
    assert!(provider.list_deployments("proj-unknown").await.is_empty());
}
