use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check() {
    let app = spawn_app("netlify").await;

    let resp = reqwest::Client::new()
        .get(format!("{}/health_check", app.addr))
        .send()
        .await
        .expect("execute request");

    assert!(resp.status().is_success());
    assert_eq!(resp.content_length(), Some(0));
}

#[tokio::test]
async fn health_check_ignores_provider_config() {
    // unknown provider: subscribe is broken, but the server is alive
    let app = spawn_app("sendgrid").await;

    let resp = reqwest::Client::new()
        .get(format!("{}/health_check", app.addr))
        .send()
        .await
        .expect("execute request");

    assert_eq!(resp.status().as_u16(), 200);
}
