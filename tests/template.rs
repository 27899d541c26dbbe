use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web::{self, Data};
use actix_web::App;
use serde_json::{json, Value};

use campaign_hub::campaign::Channel;
use campaign_hub::{
    configure, path_not_found, seed, CampaignBody, Config, Database, MemoryDatabase, NewCampaign,
    TemplateBody,
};

macro_rules! app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new(Box::new(MemoryDatabase::from_seed(
                    seed::embedded().unwrap(),
                    Duration::ZERO,
                )) as Box<dyn Database>))
                .app_data(Data::new($config))
                .configure(configure)
                .default_service(web::to(path_not_found)),
        )
        .await
    };
    () => {
        app!(Config::default())
    };
}

fn names(templates: &[TemplateBody]) -> Vec<&str> {
    templates
        .iter()
        .map(|body| body.template.name.as_str())
        .collect()
}

#[actix_web::test]
async fn featured_templates_follow_configured_names() {
    let app = app!();

    let req = TestRequest::get().uri("/templates/featured").to_request();
    let featured: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        names(&featured),
        vec![
            "Welcome Email Series",
            "E-commerce Black Friday",
            "Google Ads Search Campaign",
        ]
    );
}

#[actix_web::test]
async fn featured_list_can_be_reconfigured() {
    let config = Config {
        featured_templates: vec!["Abandoned Cart Recovery".to_string()],
        ..Config::default()
    };
    let app = app!(config);

    let req = TestRequest::get().uri("/templates/featured").to_request();
    let featured: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(names(&featured), vec!["Abandoned Cart Recovery"]);
}

#[actix_web::test]
async fn categories_are_sorted_and_distinct() {
    let app = app!();

    let req = TestRequest::get().uri("/templates/categories").to_request();
    let categories: Vec<String> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        categories,
        vec![
            "Display Advertising",
            "E-commerce",
            "Email Marketing",
            "Search Marketing",
            "Social Media",
            "Video Marketing",
        ]
    );
}

#[actix_web::test]
async fn templates_can_be_searched_and_filtered() {
    let app = app!();

    let req = TestRequest::get().uri("/templates?search=EMAIL").to_request();
    let found: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        names(&found),
        vec!["Welcome Email Series", "Abandoned Cart Recovery"]
    );

    let req = TestRequest::get()
        .uri("/templates?difficulty=Advanced")
        .to_request();
    let advanced: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        names(&advanced),
        vec!["Instagram Influencer Launch", "YouTube Pre-roll Awareness"]
    );

    let req = TestRequest::get().uri("/templates?search=").to_request();
    let everything: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(everything.len(), 7);
}

#[actix_web::test]
async fn templates_by_time_range() {
    let app = app!();

    let req = TestRequest::get()
        .uri("/templates/time-range?min_hours=1&max_hours=3")
        .to_request();
    let quick: Vec<TemplateBody> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        names(&quick),
        vec![
            "Welcome Email Series",
            "Google Ads Search Campaign",
            "Abandoned Cart Recovery",
        ]
    );
    assert!(quick
        .iter()
        .all(|body| matches!(body.estimated_hours, Some(1..=3))));
}

#[actix_web::test]
async fn template_metrics_and_missing_template() {
    let app = app!();

    let req = TestRequest::get().uri("/templates/1/metrics").to_request();
    let metrics: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(metrics["openRate"], "45%");

    let req = TestRequest::get().uri("/templates/99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error_code"], "E4041002");
    assert_eq!(body["error_meta"]["template_id"], 99);
}

#[actix_web::test]
async fn draft_from_template_is_only_persisted_on_create() {
    let app = app!();

    let req = TestRequest::post()
        .uri("/templates/1/draft")
        .set_json(&json!({}))
        .to_request();
    let draft: NewCampaign = test::call_and_read_body_json(&app, req).await;

    assert_eq!(draft.budget, 1000.0);
    assert_eq!(draft.channel, Some(Channel::Email));
    assert!(draft.start_date.is_some());
    assert!(draft.end_date > draft.start_date);

    let req = TestRequest::get().uri("/campaigns").to_request();
    let campaigns: Vec<CampaignBody> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(campaigns.len(), 8);

    let req = TestRequest::post()
        .uri("/campaigns")
        .set_json(&draft)
        .to_request();
    let created: CampaignBody = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created.campaign.name, "Welcome Email Series");
    assert_eq!(created.campaign.content, draft.content);
}
